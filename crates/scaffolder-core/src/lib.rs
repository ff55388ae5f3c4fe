//! Scaffolder Core - Shared library for the Express/MongoDB project scaffolder
//!
//! Turns a handful of answers into a ready-to-run backend skeleton.
//!
//! # Architecture
//!
//! Data flows one way through four layers:
//!
//! - **Configuration** - `config::resolve` validates raw answers into a `Configuration`
//! - **Manifest** - `templates::build` maps a configuration to directories and file contents
//! - **Materialization** - `templates::materialize` writes a manifest under a root directory
//! - **Steps** - `runtime::run_steps` runs git and package-manager commands afterwards
//!
//! The core never prints or exits: it returns typed results and reports
//! progress to an injected observer. The optional `tui` module is the only
//! place that talks to the terminal.
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{config, templates, runtime};
//!
//! let answers = config::RawAnswers {
//!     project_name: Some("demo".into()),
//!     database_name: Some("demo_db".into()),
//!     ..Default::default()
//! };
//! let configuration = config::resolve(&answers)?;
//! let manifest = templates::build(&configuration)?;
//! templates::materialize(
//!     "demo".as_ref(),
//!     &manifest,
//!     templates::MaterializeMode::Strict,
//!     &mut templates::NoopObserver,
//! )?;
//! ```

pub mod config;
pub mod error;
pub mod product;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{resolve, Configuration, RawAnswers};
pub use error::ScaffoldError;
pub use product::ProductConfig;
pub use runtime::{PackageManager, Step};
pub use templates::{build, materialize, Manifest, MaterializeMode};

#[cfg(feature = "tui")]
pub use tui::run;
