//! End-to-end: answers -> configuration -> manifest -> tree -> steps

use scaffolder_core::config::{resolve, PortInput, RawAnswers};
use scaffolder_core::runtime::{
    run_steps, plan_steps, CommandOutput, CommandRunner, Invocation, PackageManager, Step,
    StepOutcome,
};
use scaffolder_core::templates::{build, materialize, MaterializeMode, NoopObserver, ProgressLog};
use scaffolder_core::ScaffoldError;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn demo_answers() -> RawAnswers {
    RawAnswers {
        project_name: Some("demo".to_string()),
        port: Some(PortInput::Number(4000)),
        generate_auth: Some(false),
        database_name: Some("demo_db".to_string()),
        ..Default::default()
    }
}

fn demo_auth_answers() -> RawAnswers {
    RawAnswers {
        generate_auth: Some(true),
        jwt_secret: Some("s3cr3t".to_string()),
        jwt_expires_in: Some("1h".to_string()),
        ..demo_answers()
    }
}

fn tree(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.unwrap().path().to_path_buf())
        .collect()
}

#[test]
fn scenario_without_auth() {
    let config = resolve(&demo_answers()).unwrap();
    let manifest = build(&config).unwrap();

    assert_eq!(
        manifest.file(".env").unwrap(),
        "PORT=4000\nMONGODB_URL=\"mongodb://localhost:27017/demo_db\""
    );
    assert!(!manifest.contains_file("src/utils/jwt.js"));
    assert!(!manifest.contains_file("src/routes/authRoutes.js"));
    assert!(!manifest.file("src/routes/index.js").unwrap().contains("/auth"));
}

#[test]
fn scenario_with_auth() {
    let config = resolve(&demo_auth_answers()).unwrap();
    let manifest = build(&config).unwrap();

    let auth_routes = manifest.file("src/routes/authRoutes.js").unwrap();
    assert!(auth_routes.contains("router.post('/register'"));
    assert!(auth_routes.contains("router.post('/login'"));
    assert!(manifest
        .file("src/routes/index.js")
        .unwrap()
        .contains("router.use('/auth', authRoutes)"));

    let env = manifest.file(".env").unwrap();
    assert!(env.contains("JWT_SECRET"));
    assert!(env.contains("1h"));
}

#[test]
fn scenario_missing_secret() {
    let answers = RawAnswers {
        jwt_secret: None,
        ..demo_auth_answers()
    };

    match resolve(&answers).unwrap_err() {
        ScaffoldError::Validation { field, .. } => assert_eq!(field, "jwt_secret"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn materialized_tree_matches_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("demo");
    let manifest = build(&resolve(&demo_auth_answers()).unwrap()).unwrap();

    let mut progress = ProgressLog::default();
    materialize(&root, &manifest, MaterializeMode::Strict, &mut progress).unwrap();

    for (path, content) in manifest.files() {
        assert_eq!(fs::read_to_string(root.join(path)).unwrap(), content);
    }
    for dir in ["src/controllers", "src/services", "src/middleware", "tests"] {
        assert!(root.join(dir).is_dir(), "{dir} missing");
    }
    // One event per created directory (root included) and per file
    assert_eq!(
        progress.events.len(),
        1 + manifest.directories().len() + manifest.file_count()
    );
}

#[test]
fn strict_mode_leaves_existing_root_alone() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("demo");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("notes.txt"), "mine").unwrap();
    let before = tree(&root);

    let manifest = build(&resolve(&demo_answers()).unwrap()).unwrap();
    let err = materialize(&root, &manifest, MaterializeMode::Strict, &mut NoopObserver)
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::AlreadyExists(_)));
    assert_eq!(tree(&root), before);
}

#[test]
fn preserve_mode_keeps_sentinel() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("demo");
    let manifest = build(&resolve(&demo_answers()).unwrap()).unwrap();

    materialize(&root, &manifest, MaterializeMode::Strict, &mut NoopObserver).unwrap();
    fs::write(root.join("src/routes/index.js"), "SENTINEL").unwrap();
    fs::remove_file(root.join("README.md")).unwrap();

    let report =
        materialize(&root, &manifest, MaterializeMode::Preserve, &mut NoopObserver).unwrap();

    assert_eq!(
        fs::read_to_string(root.join("src/routes/index.js")).unwrap(),
        "SENTINEL"
    );
    assert_eq!(report.files_written, vec![root.join("README.md")]);
    assert_eq!(report.files_skipped.len(), manifest.file_count() - 1);
}

#[test]
fn build_twice_is_byte_identical() {
    let config = resolve(&demo_auth_answers()).unwrap();
    let first = build(&config).unwrap();
    let second = build(&config).unwrap();

    let a: Vec<_> = first.files().collect();
    let b: Vec<_> = second.files().collect();
    assert_eq!(a, b);
    assert_eq!(first.directories(), second.directories());
}

/// Fake runner that only records what it was asked to run
#[derive(Default)]
struct FakeRunner {
    seen: RefCell<Vec<(String, PathBuf)>>,
}

impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        self.seen
            .borrow_mut()
            .push((invocation.command_line(), invocation.cwd.clone()));
        Ok(CommandOutput {
            success: true,
            status: Some(0),
            ..Default::default()
        })
    }
}

#[tokio::test]
async fn steps_run_against_created_root() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("demo");
    let answers = RawAnswers {
        init_git: Some(true),
        git_username: Some("octocat".to_string()),
        git_repo_name: Some("demo".to_string()),
        ..demo_answers()
    };
    let config = resolve(&answers).unwrap();
    let manifest = build(&config).unwrap();
    materialize(&root, &manifest, MaterializeMode::Strict, &mut NoopObserver).unwrap();
    assert!(root.join(".gitignore").is_file());

    let steps = plan_steps(&config, true);
    let runner = FakeRunner::default();
    let reports = run_steps(&runner, &root, &steps, PackageManager::Npm).await;

    assert_eq!(
        reports.iter().map(|r| r.step).collect::<Vec<_>>(),
        vec![Step::InitRepo, Step::CommitInitial, Step::InstallDependencies]
    );
    assert!(reports
        .iter()
        .all(|r| matches!(r.outcome, StepOutcome::Succeeded)));
    let seen = runner.seen.borrow();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|(_, cwd)| *cwd == root));
    assert_eq!(seen[3].0, "npm install");
}
