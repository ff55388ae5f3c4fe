//! create-express-api - Project scaffolding for Express and MongoDB backends

use anyhow::Result;
use clap::{Parser, Subcommand};
use scaffolder_core::config::{Configuration, PortInput, RawAnswers};
use scaffolder_core::tui::CreateArgs;
use scaffolder_core::{PackageManager, ProductConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Express product configuration
#[derive(Clone)]
pub struct ExpressConfig;

impl ProductConfig for ExpressConfig {
    fn name(&self) -> &'static str {
        "create-express-api"
    }

    fn display_name(&self) -> &'static str {
        "Express API"
    }

    fn docs_url(&self) -> &'static str {
        "https://expressjs.com"
    }

    fn next_steps(
        &self,
        dir: &Path,
        config: &Configuration,
        package_manager: PackageManager,
        installed: bool,
    ) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_ref() != Some(&dir.to_path_buf()) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Install dependencies if that did not happen
        if !installed {
            steps.push(package_manager.install_command());
        }

        // Step 3: Point the repository at its remote
        if let Some(git) = &config.git {
            steps.push(format!("git remote add origin {}", git.repository_url()));
        }

        // Step 4: Start MongoDB and the dev server
        steps.push(format!(
            "Make sure MongoDB is reachable at {}",
            config.database_url()
        ));
        steps.push(package_manager.dev_command());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-express-api")]
#[command(about = "CLI for scaffolding Express and MongoDB backend projects")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub create: CliCreateArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Express project
    Create(CliCreateArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliCreateArgs {
    /// Project name (also the directory and package name)
    pub project_name: Option<String>,

    /// Port the generated server listens on
    #[arg(short, long)]
    pub port: Option<String>,

    /// Generate JWT authentication (user model, register/login routes)
    #[arg(long)]
    pub auth: bool,

    /// Secret used to sign tokens (requires --auth)
    #[arg(long = "jwt-secret")]
    pub jwt_secret: Option<String>,

    /// Token lifetime, e.g. 1h or 7d (requires --auth)
    #[arg(long = "jwt-expires-in")]
    pub jwt_expires_in: Option<String>,

    /// MongoDB database name
    #[arg(long = "database")]
    pub database_name: Option<String>,

    /// Initialize a git repository and commit the generated files
    #[arg(long)]
    pub git: bool,

    /// GitHub username recorded in README and package.json (requires --git)
    #[arg(long = "git-username")]
    pub git_username: Option<String>,

    /// Repository name recorded in README and package.json (requires --git)
    #[arg(long = "git-repo")]
    pub git_repo_name: Option<String>,

    /// YAML file with answers (flags take precedence)
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// Parent directory to create the project in
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Package manager used to install dependencies
    #[arg(long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Do not install dependencies
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Re-run against an existing project, keeping files that already exist
    #[arg(long)]
    pub preserve: bool,

    /// Print the files that would be created without writing anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// List every created directory and file, and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        // Boolean flags only count when set, so prompts still ask otherwise
        let answers = RawAnswers {
            project_name: args.project_name,
            port: args.port.map(PortInput::Text),
            generate_auth: args.auth.then_some(true),
            jwt_secret: args.jwt_secret,
            jwt_expires_in: args.jwt_expires_in,
            database_name: args.database_name,
            init_git: args.git.then_some(true),
            git_username: args.git_username,
            git_repo_name: args.git_repo_name,
        };

        CreateArgs {
            answers,
            answers_file: args.answers,
            directory: args.directory,
            package_manager: args.package_manager,
            skip_install: args.skip_install,
            preserve: args.preserve,
            dry_run: args.dry_run,
            verbose: args.verbose,
            yes: args.yes,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = ExpressConfig;

    // No subcommand provided, default to create behavior
    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args,
        None => args.create,
    };

    init_logging(create_args.verbose);
    tracing::debug!(product = config.name(), "starting");

    let result = scaffolder_core::run(&config, create_args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
