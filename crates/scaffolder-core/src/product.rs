//! Product configuration trait for CLI binaries
//!
//! A binary implements this trait to name itself and to describe what the
//! user should do once the project exists.

use crate::config::{Configuration, DEFAULT_PORT};
use crate::runtime::check::PackageManager;
use std::path::Path;

/// Configuration trait for scaffolding products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// URL for documentation of the generated stack
    fn docs_url(&self) -> &'static str;

    /// Port suggested when prompting
    fn default_port(&self) -> u16 {
        DEFAULT_PORT
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(
        &self,
        dir: &Path,
        config: &Configuration,
        package_manager: PackageManager,
        installed: bool,
    ) -> Vec<String>;
}
