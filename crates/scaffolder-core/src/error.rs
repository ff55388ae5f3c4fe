//! Typed errors returned by the scaffolding core
//!
//! The core never prints or exits. Callers decide how each variant is
//! presented: validation and precondition failures are fatal, command
//! failures are downgraded to warnings.

use std::path::PathBuf;
use thiserror::Error;

use crate::runtime::steps::Step;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Bad or missing configuration input
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Target root is already occupied
    #[error("directory {} already exists, choose a different project name", .0.display())]
    AlreadyExists(PathBuf),

    /// Directory or file creation failed mid-run
    #[error("failed to create {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External process failed (spawn error, non-zero exit or timeout)
    #[error("{step} failed{}: {stderr}", exit_suffix(.status))]
    Command {
        step: Step,
        status: Option<i32>,
        stderr: String,
    },

    /// A template still carried a substitution token after rendering
    #[error("unresolved placeholder {token} in {path}")]
    UnresolvedPlaceholder { path: String, token: String },
}

impl ScaffoldError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error should abort the run (everything except command failures)
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Command { .. })
    }
}

fn exit_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit code {code}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = ScaffoldError::validation("jwt_secret", "required when auth is enabled");
        assert_eq!(
            err.to_string(),
            "invalid jwt_secret: required when auth is enabled"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_command_error_is_not_fatal() {
        let err = ScaffoldError::Command {
            step: Step::InstallDependencies,
            status: Some(1),
            stderr: "npm ERR!".to_string(),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("exit code 1"));
    }
}
