//! Validation and normalization of raw answers

use super::answers::{PortInput, RawAnswers};
use crate::error::{Result, ScaffoldError};

/// Port used when none is given
pub const DEFAULT_PORT: u16 = 3000;

/// Characters MongoDB does not accept in database names
const FORBIDDEN_DB_CHARS: &[char] = &['/', '\\', '.', '"', '$'];

/// JWT settings, present only when auth scaffolding is requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_expires_in: String,
}

/// Git metadata, present only when a repository is initialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub username: String,
    pub repo_name: String,
}

impl GitIdentity {
    pub fn repository_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.username, self.repo_name)
    }
}

/// Canonical, validated configuration for one scaffolding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub project_name: String,
    pub port: u16,
    pub database_name: String,
    pub auth: Option<AuthSettings>,
    pub git: Option<GitIdentity>,
}

impl Configuration {
    pub fn generate_auth(&self) -> bool {
        self.auth.is_some()
    }

    pub fn init_git(&self) -> bool {
        self.git.is_some()
    }

    /// Connection URL written into the generated `.env`
    pub fn database_url(&self) -> String {
        format!("mongodb://localhost:27017/{}", self.database_name)
    }
}

/// Validate raw answers and build a `Configuration`
pub fn resolve(raw: &RawAnswers) -> Result<Configuration> {
    let project_name = resolve_project_name(raw.project_name.as_deref())?;
    let port = resolve_port(raw.port.as_ref())?;
    let database_name = resolve_database_name(raw.database_name.as_deref())?;

    let auth = if raw.generate_auth.unwrap_or(false) {
        Some(AuthSettings {
            jwt_secret: required_verbatim(raw.jwt_secret.as_deref(), "jwt_secret", "auth")?,
            jwt_expires_in: required(raw.jwt_expires_in.as_deref(), "jwt_expires_in", "auth")?,
        })
    } else {
        None
    };

    let git = if raw.init_git.unwrap_or(false) {
        Some(GitIdentity {
            username: required(raw.git_username.as_deref(), "git_username", "git")?,
            repo_name: required(raw.git_repo_name.as_deref(), "git_repo_name", "git")?,
        })
    } else {
        None
    };

    Ok(Configuration {
        project_name,
        port,
        database_name,
        auth,
        git,
    })
}

fn resolve_project_name(value: Option<&str>) -> Result<String> {
    let name = value.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ScaffoldError::validation(
            "project_name",
            "please provide a project name",
        ));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ScaffoldError::validation(
            "project_name",
            format!("'{name}' is not a valid directory name"),
        ));
    }
    Ok(name.to_string())
}

fn resolve_port(value: Option<&PortInput>) -> Result<u16> {
    let number = match value {
        None => return Ok(DEFAULT_PORT),
        Some(PortInput::Number(n)) => *n,
        Some(PortInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(DEFAULT_PORT);
            }
            text.parse::<i64>().map_err(|_| {
                ScaffoldError::validation("port", format!("'{text}' is not an integer"))
            })?
        }
    };

    match u16::try_from(number) {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ScaffoldError::validation(
            "port",
            format!("{number} is not a port between 1 and 65535"),
        )),
    }
}

fn resolve_database_name(value: Option<&str>) -> Result<String> {
    let name = value.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ScaffoldError::validation("database_name", "must not be empty"));
    }
    if name.contains(char::is_whitespace) || name.contains(FORBIDDEN_DB_CHARS) {
        return Err(ScaffoldError::validation(
            "database_name",
            format!("'{name}' contains whitespace or one of / \\ . \" $"),
        ));
    }
    Ok(name.to_string())
}

fn required(value: Option<&str>, field: &'static str, feature: &str) -> Result<String> {
    required_verbatim(value.map(str::trim), field, feature)
}

/// Like `required`, but keeps surrounding whitespace (secrets are opaque)
fn required_verbatim(value: Option<&str>, field: &'static str, feature: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(ScaffoldError::validation(
            field,
            format!("required when {feature} is enabled"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RawAnswers {
        RawAnswers {
            project_name: Some("demo".to_string()),
            database_name: Some("demo_db".to_string()),
            ..Default::default()
        }
    }

    fn field_of(err: ScaffoldError) -> &'static str {
        match err {
            ScaffoldError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = resolve(&base()).unwrap();
        assert_eq!(config.project_name, "demo");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.generate_auth());
        assert!(!config.init_git());
        assert_eq!(config.database_url(), "mongodb://localhost:27017/demo_db");
    }

    #[test]
    fn test_project_name_is_trimmed() {
        let raw = RawAnswers {
            project_name: Some("  my-api \n".to_string()),
            ..base()
        };
        assert_eq!(resolve(&raw).unwrap().project_name, "my-api");
    }

    #[test]
    fn test_empty_project_name_rejected() {
        for name in [None, Some("   ".to_string())] {
            let raw = RawAnswers {
                project_name: name,
                ..base()
            };
            assert_eq!(field_of(resolve(&raw).unwrap_err()), "project_name");
        }
    }

    #[test]
    fn test_project_name_with_separator_rejected() {
        for name in ["a/b", "..", "."] {
            let raw = RawAnswers {
                project_name: Some(name.to_string()),
                ..base()
            };
            assert_eq!(field_of(resolve(&raw).unwrap_err()), "project_name");
        }
    }

    #[test]
    fn test_port_parsing() {
        let raw = RawAnswers {
            port: Some(PortInput::Text(" 4000 ".to_string())),
            ..base()
        };
        assert_eq!(resolve(&raw).unwrap().port, 4000);

        for bad in [
            PortInput::Number(0),
            PortInput::Number(-1),
            PortInput::Number(70000),
            PortInput::Text("abc".to_string()),
            PortInput::Text("3.5".to_string()),
        ] {
            let raw = RawAnswers {
                port: Some(bad),
                ..base()
            };
            assert_eq!(field_of(resolve(&raw).unwrap_err()), "port");
        }
    }

    #[test]
    fn test_auth_requires_secret() {
        let raw = RawAnswers {
            generate_auth: Some(true),
            jwt_expires_in: Some("1h".to_string()),
            ..base()
        };
        let err = resolve(&raw).unwrap_err();
        assert!(err.to_string().contains("jwt_secret"));
        assert_eq!(field_of(err), "jwt_secret");
    }

    #[test]
    fn test_auth_requires_expiry() {
        let raw = RawAnswers {
            generate_auth: Some(true),
            jwt_secret: Some("s3cr3t".to_string()),
            jwt_expires_in: Some(" ".to_string()),
            ..base()
        };
        assert_eq!(field_of(resolve(&raw).unwrap_err()), "jwt_expires_in");
    }

    #[test]
    fn test_secret_kept_verbatim() {
        let raw = RawAnswers {
            generate_auth: Some(true),
            jwt_secret: Some(" ab\\cd\"ef ".to_string()),
            jwt_expires_in: Some(" 1h ".to_string()),
            ..base()
        };
        let auth = resolve(&raw).unwrap().auth.unwrap();
        assert_eq!(auth.jwt_secret, " ab\\cd\"ef ");
        assert_eq!(auth.jwt_expires_in, "1h");

        let blank = RawAnswers {
            jwt_secret: Some("   ".to_string()),
            ..raw
        };
        assert_eq!(field_of(resolve(&blank).unwrap_err()), "jwt_secret");
    }

    #[test]
    fn test_auth_fields_dropped_when_disabled() {
        let raw = RawAnswers {
            generate_auth: Some(false),
            jwt_secret: Some("s3cr3t".to_string()),
            jwt_expires_in: Some("1h".to_string()),
            ..base()
        };
        assert_eq!(resolve(&raw).unwrap().auth, None);
    }

    #[test]
    fn test_auth_enabled() {
        let raw = RawAnswers {
            generate_auth: Some(true),
            jwt_secret: Some("s3cr3t".to_string()),
            jwt_expires_in: Some("1h".to_string()),
            ..base()
        };
        let auth = resolve(&raw).unwrap().auth.unwrap();
        assert_eq!(auth.jwt_secret, "s3cr3t");
        assert_eq!(auth.jwt_expires_in, "1h");
    }

    #[test]
    fn test_git_requires_identity() {
        let raw = RawAnswers {
            init_git: Some(true),
            git_username: Some("octocat".to_string()),
            ..base()
        };
        assert_eq!(field_of(resolve(&raw).unwrap_err()), "git_repo_name");

        let raw = RawAnswers {
            init_git: Some(true),
            git_username: Some("octocat".to_string()),
            git_repo_name: Some("demo".to_string()),
            ..base()
        };
        let git = resolve(&raw).unwrap().git.unwrap();
        assert_eq!(git.repository_url(), "https://github.com/octocat/demo.git");
    }

    #[test]
    fn test_database_name_rules() {
        for bad in ["", "my db", "a.b", "a/b", "$x"] {
            let raw = RawAnswers {
                database_name: Some(bad.to_string()),
                ..base()
            };
            assert_eq!(field_of(resolve(&raw).unwrap_err()), "database_name");
        }
    }
}
