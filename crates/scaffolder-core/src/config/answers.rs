//! Raw, unvalidated answers and answers-file parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Port as given by the user: YAML may carry a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortInput {
    Number(i64),
    Text(String),
}

impl From<u16> for PortInput {
    fn from(port: u16) -> Self {
        PortInput::Number(port.into())
    }
}

/// Answers collected before validation
///
/// Every field is optional; `resolve` applies defaults and rejects
/// inconsistent combinations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAnswers {
    pub project_name: Option<String>,
    pub port: Option<PortInput>,
    pub generate_auth: Option<bool>,
    pub jwt_secret: Option<String>,
    pub jwt_expires_in: Option<String>,
    pub database_name: Option<String>,
    pub init_git: Option<bool>,
    pub git_username: Option<String>,
    pub git_repo_name: Option<String>,
}

impl RawAnswers {
    /// Fill every unset field from `fallback` (self takes precedence)
    pub fn or(self, fallback: RawAnswers) -> RawAnswers {
        RawAnswers {
            project_name: self.project_name.or(fallback.project_name),
            port: self.port.or(fallback.port),
            generate_auth: self.generate_auth.or(fallback.generate_auth),
            jwt_secret: self.jwt_secret.or(fallback.jwt_secret),
            jwt_expires_in: self.jwt_expires_in.or(fallback.jwt_expires_in),
            database_name: self.database_name.or(fallback.database_name),
            init_git: self.init_git.or(fallback.init_git),
            git_username: self.git_username.or(fallback.git_username),
            git_repo_name: self.git_repo_name.or(fallback.git_repo_name),
        }
    }
}

/// Read an answers file (YAML)
pub fn load_answers(path: &Path) -> Result<RawAnswers> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_answers(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_answers(content: &str) -> Result<RawAnswers> {
    // An empty document deserializes to unit, not to an empty map
    if content.trim().is_empty() {
        return Ok(RawAnswers::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_answers() {
        let yaml = r#"
project_name: demo
port: 4000
generate_auth: true
jwt_secret: s3cr3t
jwt_expires_in: 1h
database_name: demo_db
"#;
        let answers = parse_answers(yaml).unwrap();
        assert_eq!(answers.project_name.as_deref(), Some("demo"));
        assert_eq!(answers.port, Some(PortInput::Number(4000)));
        assert_eq!(answers.generate_auth, Some(true));
        assert_eq!(answers.init_git, None);
    }

    #[test]
    fn test_parse_port_as_string() {
        let answers = parse_answers("port: \"8080\"").unwrap();
        assert_eq!(answers.port, Some(PortInput::Text("8080".to_string())));
    }

    #[test]
    fn test_parse_empty_document() {
        assert_eq!(parse_answers("  \n").unwrap(), RawAnswers::default());
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(parse_answers("generate_auth: [1, 2]").is_err());
    }

    #[test]
    fn test_or_prefers_self() {
        let flags = RawAnswers {
            port: Some(PortInput::from(5000)),
            ..Default::default()
        };
        let file = RawAnswers {
            project_name: Some("from-file".to_string()),
            port: Some(PortInput::from(4000)),
            ..Default::default()
        };

        let merged = flags.or(file);
        assert_eq!(merged.port, Some(PortInput::Number(5000)));
        assert_eq!(merged.project_name.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_load_answers_reports_missing_file() {
        let err = load_answers(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
