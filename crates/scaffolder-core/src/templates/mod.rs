//! Manifest building and materialization
//!
//! This module provides:
//! - The `Manifest` type (directories and file contents for one run)
//! - Fixed file templates and placeholder rendering
//! - The configuration-driven manifest builder
//! - Materialization of a manifest onto disk

mod content;

pub mod builder;
pub mod copier;
pub mod manifest;

use colored::Colorize;
use std::path::Path;

pub use builder::build;
pub use copier::{
    materialize, MaterializeEvent, MaterializeMode, MaterializeReport, NoopObserver,
    ProgressLog, ProgressObserver,
};
pub use manifest::Manifest;

/// Render the manifest as an indented listing (used for dry runs)
pub fn describe(root: &Path, manifest: &Manifest) -> String {
    let mut lines = vec![format!("{}", root.display().to_string().cyan().bold())];
    for dir in manifest.directories() {
        lines.push(format!("  {} {}/", "dir ".dimmed(), dir));
    }
    for (path, content) in manifest.files() {
        lines.push(format!(
            "  {} {} {}",
            "file".green(),
            path,
            format!("({} bytes)", content.len()).dimmed()
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn test_describe_lists_every_entry() {
        colored::control::set_override(false);
        let config = Configuration {
            project_name: "demo".to_string(),
            port: 3000,
            database_name: "demo".to_string(),
            auth: None,
            git: None,
        };
        let manifest = build(&config).unwrap();
        let listing = describe(Path::new("/tmp/demo"), &manifest);

        assert!(listing.starts_with("/tmp/demo"));
        assert!(listing.contains("dir  src/controllers/"));
        assert!(listing.contains("file .env ("));
        assert_eq!(
            listing.lines().count(),
            1 + manifest.directories().len() + manifest.file_count()
        );
    }
}
