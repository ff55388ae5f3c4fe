//! Post-materialization steps (git init/commit, dependency installation)
//!
//! Steps run as external processes behind the `CommandRunner` trait so
//! callers can substitute a fake runner. A failed step is reported, never
//! rolled back, and never stops later independent steps.

use crate::config::Configuration;
use crate::error::ScaffoldError;
use crate::runtime::check::PackageManager;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for git invocations
const GIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for dependency installation (10 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// A post-materialization step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    InitRepo,
    CommitInitial,
    InstallDependencies,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::InitRepo => "git init",
            Step::CommitInitial => "initial commit",
            Step::InstallDependencies => "dependency installation",
        };
        write!(f, "{name}")
    }
}

/// One external process to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout: Duration,
}

impl Invocation {
    fn new(program: &str, args: &[&str], cwd: &Path, timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
            timeout,
        }
    }

    /// Command line as typed in a shell
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Executes external processes
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput>;
}

/// Runs invocations as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        tracing::debug!(
            command = %invocation.command_line(),
            cwd = %invocation.cwd.display(),
            "running command"
        );

        let child = TokioCommand::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match timeout(invocation.timeout, child).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!(
                        "`{}` timed out after {} seconds",
                        invocation.command_line(),
                        invocation.timeout.as_secs()
                    ),
                ))
            }
        };

        Ok(CommandOutput {
            success: output.status.success(),
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Outcome of one step
#[derive(Debug)]
pub enum StepOutcome {
    Succeeded,
    Failed(ScaffoldError),
    Skipped(String),
}

#[derive(Debug)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
}

impl StepReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, StepOutcome::Succeeded)
    }
}

/// Steps requested by a configuration, in their fixed order
pub fn plan_steps(config: &Configuration, install: bool) -> Vec<Step> {
    let mut steps = Vec::new();
    if config.init_git() {
        steps.push(Step::InitRepo);
        steps.push(Step::CommitInitial);
    }
    if install {
        steps.push(Step::InstallDependencies);
    }
    steps
}

/// Processes making up a step
pub fn invocations(step: Step, root: &Path, package_manager: PackageManager) -> Vec<Invocation> {
    match step {
        Step::InitRepo => vec![Invocation::new("git", &["init"], root, GIT_TIMEOUT)],
        Step::CommitInitial => vec![
            Invocation::new("git", &["add", "-A"], root, GIT_TIMEOUT),
            Invocation::new("git", &["commit", "-m", "Initial commit"], root, GIT_TIMEOUT),
        ],
        Step::InstallDependencies => vec![Invocation::new(
            package_manager.binary(),
            &["install"],
            root,
            INSTALL_TIMEOUT,
        )],
    }
}

/// Run `steps` in order against `root`
pub async fn run_steps<R: CommandRunner>(
    runner: &R,
    root: &Path,
    steps: &[Step],
    package_manager: PackageManager,
) -> Vec<StepReport> {
    let mut reports = Vec::with_capacity(steps.len());
    let mut repo_failed = false;

    for &step in steps {
        if step == Step::CommitInitial && repo_failed {
            reports.push(StepReport {
                step,
                outcome: StepOutcome::Skipped("repository was not initialized".to_string()),
            });
            continue;
        }

        let outcome = match run_step(runner, root, step, package_manager).await {
            Ok(()) => StepOutcome::Succeeded,
            Err(e) => {
                tracing::warn!(%step, error = %e, "step failed");
                if step == Step::InitRepo {
                    repo_failed = true;
                }
                StepOutcome::Failed(e)
            }
        };
        reports.push(StepReport { step, outcome });
    }

    reports
}

async fn run_step<R: CommandRunner>(
    runner: &R,
    root: &Path,
    step: Step,
    package_manager: PackageManager,
) -> Result<(), ScaffoldError> {
    for invocation in invocations(step, root, package_manager) {
        let output = runner
            .run(&invocation)
            .await
            .map_err(|e| ScaffoldError::Command {
                step,
                status: None,
                stderr: format!("could not run `{}`: {}", invocation.command_line(), e),
            })?;

        if !output.success {
            let diagnostic = if output.stderr.trim().is_empty() {
                output.stdout.trim()
            } else {
                output.stderr.trim()
            };
            return Err(ScaffoldError::Command {
                step,
                status: output.status,
                stderr: diagnostic.to_string(),
            });
        }
    }
    Ok(())
}
