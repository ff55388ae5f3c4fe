//! Charm-style CLI prompts using cliclack

use crate::config::{self, Configuration, PortInput, RawAnswers};
use crate::error::ScaffoldError;
use crate::product::ProductConfig;
use crate::runtime::check::{self, PackageManager};
use crate::runtime::steps::{self, ProcessRunner, Step, StepOutcome};
use crate::templates::{self, Manifest, MaterializeEvent, MaterializeMode, ProgressLog};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Answers given as flags (take precedence over the answers file)
    pub answers: RawAnswers,

    /// YAML file with answers
    pub answers_file: Option<PathBuf>,

    /// Parent directory for the project (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Package manager for dependency installation (detected when absent)
    pub package_manager: Option<PackageManager>,

    /// Skip dependency installation
    pub skip_install: bool,

    /// Re-run against an existing project without overwriting files
    pub preserve: bool,

    /// Print the files that would be created and stop
    pub dry_run: bool,

    /// List every created directory and file
    pub verbose: bool,

    /// Never prompt (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Collect answers (flags, then answers file, then prompts)
    let answers = collect_answers(config, &args)?;

    // Step 2: Validate
    let configuration = config::resolve(&answers)?;

    // Step 3: Resolve target directory
    let project_dir = select_directory(&args, &configuration)?;

    // Step 4: Build the manifest
    let manifest = templates::build(&configuration)?;

    if args.dry_run {
        println!();
        println!("{}", templates::describe(&project_dir, &manifest));
        println!();
        cliclack::outro("Dry run, nothing was written.")?;
        return Ok(());
    }

    // Step 5: Check tools (advisory)
    let package_manager = args
        .package_manager
        .unwrap_or_else(check::detect_package_manager);
    let install = !args.skip_install;
    check_tools(&configuration, install.then_some(package_manager))?;

    // Step 6: Create project
    let mode = if args.preserve {
        MaterializeMode::Preserve
    } else {
        MaterializeMode::Strict
    };
    create_project(&project_dir, &manifest, mode, args.verbose)?;

    // Step 7: git and dependency installation
    let installed =
        run_setup_steps(&project_dir, &configuration, install, package_manager).await?;

    // Step 8: Show next steps
    print_next_steps(config, &project_dir, &configuration, package_manager, installed)?;

    Ok(())
}

fn collect_answers<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<RawAnswers> {
    let mut answers = args.answers.clone();
    if let Some(path) = &args.answers_file {
        cliclack::log::info(format!("Using answers from {}", path.display()))?;
        answers = answers.or(config::load_answers(path)?);
    }

    if args.yes {
        if answers.project_name.is_none() {
            anyhow::bail!("Please provide a project name.");
        }
        if answers.database_name.is_none() {
            answers.database_name = answers.project_name.as_deref().map(default_database_name);
        }
        return Ok(answers);
    }

    if answers.project_name.is_none() {
        let name: String = cliclack::input("Project name")
            .placeholder("my-api")
            .validate(|input: &String| {
                if input.trim().is_empty() {
                    Err("Please provide a project name.")
                } else {
                    Ok(())
                }
            })
            .interact()?;
        answers.project_name = Some(name);
    }

    if answers.port.is_none() {
        let port: String = cliclack::input("Port")
            .default_input(&config.default_port().to_string())
            .validate(|input: &String| match input.trim().parse::<u16>() {
                Ok(p) if p > 0 => Ok(()),
                _ => Err("Enter a port between 1 and 65535"),
            })
            .interact()?;
        answers.port = Some(PortInput::Text(port));
    }

    if answers.database_name.is_none() {
        let suggested = answers
            .project_name
            .as_deref()
            .map(default_database_name)
            .unwrap_or_default();
        let name: String = cliclack::input("Database name")
            .default_input(&suggested)
            .interact()?;
        answers.database_name = Some(name);
    }

    if answers.generate_auth.is_none() {
        let auth: bool = cliclack::confirm("Generate JWT authentication (register/login)?")
            .initial_value(false)
            .interact()?;
        answers.generate_auth = Some(auth);
    }

    if answers.generate_auth == Some(true) {
        if answers.jwt_secret.is_none() {
            let secret: String = cliclack::password("JWT secret")
                .mask('▪')
                .interact()?;
            answers.jwt_secret = Some(secret);
        }
        if answers.jwt_expires_in.is_none() {
            let expires: String = cliclack::input("Token lifetime")
                .default_input("1h")
                .interact()?;
            answers.jwt_expires_in = Some(expires);
        }
    }

    if answers.init_git.is_none() {
        let git: bool = cliclack::confirm("Initialize a git repository?")
            .initial_value(false)
            .interact()?;
        answers.init_git = Some(git);
    }

    if answers.init_git == Some(true) {
        if answers.git_username.is_none() {
            let username: String = cliclack::input("GitHub username").interact()?;
            answers.git_username = Some(username);
        }
        if answers.git_repo_name.is_none() {
            let repo: String = cliclack::input("Repository name")
                .default_input(answers.project_name.as_deref().unwrap_or_default())
                .interact()?;
            answers.git_repo_name = Some(repo);
        }
    }

    Ok(answers)
}

/// `my-api.v2` -> `my_api_v2`
fn default_database_name(project_name: &str) -> String {
    project_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn select_directory(args: &CreateArgs, configuration: &Configuration) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let parent = match &args.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };

    if !parent.is_dir() {
        anyhow::bail!("Parent directory does not exist: {}", parent.display());
    }

    let path = parent.join(&configuration.project_name);
    if path.exists() {
        if !args.preserve {
            return Err(ScaffoldError::AlreadyExists(path).into());
        }
        cliclack::log::info(format!(
            "Updating existing project in {} (existing files are kept)",
            path.display()
        ))?;
    } else {
        cliclack::log::info(format!("Using directory: {}", path.display()))?;
    }

    Ok(path)
}

fn check_tools(configuration: &Configuration, install_with: Option<PackageManager>) -> Result<()> {
    if !configuration.init_git() && install_with.is_none() {
        return Ok(());
    }

    let spinner = cliclack::spinner();
    spinner.start("Checking tools...");
    let missing = check::missing_tools(configuration.init_git(), install_with);

    if missing.is_empty() {
        spinner.stop("Required tools found");
        return Ok(());
    }

    spinner.stop("Some tools are missing");
    for info in &missing {
        cliclack::log::warning(missing_tool_warning(&info.name))?;
    }
    Ok(())
}

fn missing_tool_warning(tool: &str) -> String {
    format!("{tool} is not installed, the steps that need it will fail with a warning")
}

fn create_project(
    project_dir: &Path,
    manifest: &Manifest,
    mode: MaterializeMode,
    verbose: bool,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let mut progress = ProgressLog::default();
    let report = match templates::materialize(project_dir, manifest, mode, &mut progress) {
        Ok(report) => report,
        Err(e) => {
            spinner.stop("Failed to create project");
            return Err(e.into());
        }
    };

    spinner.stop(format!(
        "Created {} directories and {} files in {}",
        report.directories_created.len(),
        report.files_written.len(),
        project_dir.display()
    ));

    if !report.files_skipped.is_empty() {
        cliclack::log::info(format!(
            "Kept {} existing file(s) untouched",
            report.files_skipped.len()
        ))?;
    }

    if verbose {
        for event in &progress.events {
            cliclack::log::step(describe_event(project_dir, event))?;
        }
    }

    Ok(())
}

fn describe_event(root: &Path, event: &MaterializeEvent) -> String {
    let relative = |p: &Path| {
        p.strip_prefix(root)
            .ok()
            .filter(|r| !r.as_os_str().is_empty())
            .unwrap_or(p)
            .display()
            .to_string()
    };
    match event {
        MaterializeEvent::DirectoryCreated(p) => format!("Folder created: {}", relative(p)),
        MaterializeEvent::FileWritten(p) => format!("File created: {}", relative(p)),
        MaterializeEvent::FileSkipped(p) => format!("File kept: {}", relative(p)),
    }
}

async fn run_setup_steps(
    project_dir: &Path,
    configuration: &Configuration,
    install: bool,
    package_manager: PackageManager,
) -> Result<bool> {
    let planned = steps::plan_steps(configuration, install);
    if planned.is_empty() {
        return Ok(false);
    }

    let spinner = cliclack::spinner();
    spinner.start(if install {
        "Setting up repository and installing dependencies..."
    } else {
        "Setting up repository..."
    });

    let reports = steps::run_steps(&ProcessRunner, project_dir, &planned, package_manager).await;

    if reports.iter().all(|r| r.succeeded()) {
        spinner.stop("Setup complete");
    } else {
        spinner.stop("Setup finished with warnings");
    }

    let mut installed = false;
    for report in &reports {
        match &report.outcome {
            StepOutcome::Succeeded => {
                if report.step == Step::InstallDependencies {
                    installed = true;
                }
                cliclack::log::success(format!("Finished {}", report.step))?;
            }
            StepOutcome::Failed(e) => {
                cliclack::log::warning(e.to_string())?;
                if report.step == Step::InstallDependencies {
                    cliclack::log::info(format!(
                        "Install dependencies manually with `{}`",
                        package_manager.install_command()
                    ))?;
                }
            }
            StepOutcome::Skipped(reason) => {
                cliclack::log::info(format!("Skipped {}: {}", report.step, reason))?;
            }
        }
    }

    Ok(installed)
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    configuration: &Configuration,
    package_manager: PackageManager,
    installed: bool,
) -> Result<()> {
    let steps = config.next_steps(project_dir, configuration, package_manager, installed);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro(format!("Happy coding! Docs: {}", config.docs_url()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_warning() {
        let message = missing_tool_warning("git");
        assert!(message.starts_with("git is not installed"));
        assert!(message.contains("will fail with a warning"));
        assert!(!message.contains("skipped"));
    }

    #[test]
    fn test_default_database_name() {
        assert_eq!(default_database_name("my-api.v2"), "my_api_v2");
        assert_eq!(default_database_name(" demo "), "demo");
    }

    #[test]
    fn test_describe_event_is_relative() {
        let root = Path::new("/tmp/demo");
        assert_eq!(
            describe_event(root, &MaterializeEvent::FileWritten(root.join(".env"))),
            "File created: .env"
        );
        assert_eq!(
            describe_event(root, &MaterializeEvent::DirectoryCreated(root.to_path_buf())),
            "Folder created: /tmp/demo"
        );
    }
}
