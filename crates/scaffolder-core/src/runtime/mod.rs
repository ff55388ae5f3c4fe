//! Tool detection and external steps
//!
//! This module provides:
//! - Detection of git, Node.js and package managers
//! - Post-materialization steps run through a replaceable command runner

pub mod check;
pub mod steps;

pub use check::{
    check_git, check_node, check_package_manager, detect_package_manager, missing_tools,
    PackageManager, RuntimeInfo,
};
pub use steps::{
    plan_steps, run_steps, CommandOutput, CommandRunner, Invocation, ProcessRunner, Step,
    StepOutcome, StepReport,
};
