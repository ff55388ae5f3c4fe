//! Answer collection and configuration resolution
//!
//! This module provides:
//! - Raw answer types (from CLI flags, an answers file, or prompts)
//! - Validation and normalization into an immutable `Configuration`

pub mod answers;
pub mod resolver;

pub use answers::{load_answers, PortInput, RawAnswers};
pub use resolver::{resolve, AuthSettings, Configuration, GitIdentity, DEFAULT_PORT};
