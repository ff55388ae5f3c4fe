//! Configuration -> manifest
//!
//! One parameterized builder covers every variant of the generated project.
//! Stages run in a fixed order (base, auth, git); when two stages produce
//! the same path the later stage wins.

use super::content::{self, dotenv_quote, render};
use super::manifest::Manifest;
use crate::config::Configuration;
use crate::error::Result;
use serde_json::{json, Map, Value};

/// Layered-architecture skeleton created for every project
pub const BASE_DIRECTORIES: &[&str] = &[
    "src",
    "src/controllers",
    "src/models",
    "src/routes",
    "src/services",
    "src/utils",
    "src/middleware",
    "tests",
];

pub const PACKAGE_JSON: &str = "package.json";
pub const ENTRY_POINT: &str = "index.js";
pub const DOTENV: &str = ".env";
pub const DOTENV_EXAMPLE: &str = ".env.example";
pub const README: &str = "README.md";
pub const ROUTES_INDEX: &str = "src/routes/index.js";
pub const AUTH_ROUTES: &str = "src/routes/authRoutes.js";
pub const USER_MODEL: &str = "src/models/model.js";
pub const JWT_UTILS: &str = "src/utils/jwt.js";
pub const GITIGNORE: &str = ".gitignore";

/// Files emitted only when auth scaffolding is enabled
pub const AUTH_FILES: &[&str] = &[JWT_UTILS, USER_MODEL, AUTH_ROUTES];

const DEPENDENCIES: &[(&str, &str)] = &[
    ("cors", "^2.8.5"),
    ("dotenv", "^16.4.7"),
    ("express", "^4.21.2"),
    ("helmet", "^8.0.0"),
    ("mongoose", "^8.9.5"),
];

const AUTH_DEPENDENCIES: &[(&str, &str)] = &[("bcryptjs", "^2.4.3"), ("jsonwebtoken", "^9.0.2")];

const DEV_DEPENDENCIES: &[(&str, &str)] = &[("nodemon", "^3.1.9")];

/// Build the manifest for a configuration
///
/// Pure and deterministic: the same configuration always yields the same
/// paths and byte-identical contents.
pub fn build(config: &Configuration) -> Result<Manifest> {
    let mut manifest = Manifest::new();
    for dir in BASE_DIRECTORIES {
        manifest.add_directory(*dir);
    }

    add_base_files(&mut manifest, config)?;
    if config.generate_auth() {
        add_auth_files(&mut manifest);
    }
    if config.init_git() {
        manifest.add_file(GITIGNORE, content::GITIGNORE);
    }

    manifest.complete_directories();
    Ok(manifest)
}

fn add_base_files(manifest: &mut Manifest, config: &Configuration) -> Result<()> {
    let port = config.port.to_string();
    let database_url = config.database_url();

    manifest.add_file(PACKAGE_JSON, package_json(config));
    manifest.add_file(
        ENTRY_POINT,
        render(ENTRY_POINT, content::ENTRY_POINT, &[("port", port.as_str())])?,
    );
    manifest.add_file(DOTENV, dotenv(config)?);
    manifest.add_file(DOTENV_EXAMPLE, dotenv_example(config)?);
    manifest.add_file(ROUTES_INDEX, content::ROUTES_INDEX);
    manifest.add_file(README, readme(config, &port, &database_url)?);
    Ok(())
}

fn add_auth_files(manifest: &mut Manifest) {
    manifest.add_file(JWT_UTILS, content::JWT_UTILS);
    manifest.add_file(USER_MODEL, content::USER_MODEL);
    manifest.add_file(AUTH_ROUTES, content::AUTH_ROUTES);
    manifest.add_file(ROUTES_INDEX, content::ROUTES_INDEX_AUTH);
}

fn dotenv(config: &Configuration) -> Result<String> {
    let port = config.port.to_string();
    let database_url = dotenv_quote("database_name", &config.database_url())?;
    let mut out = render(
        DOTENV,
        content::DOTENV,
        &[("port", port.as_str()), ("database_url", database_url.as_str())],
    )?;

    if let Some(auth) = &config.auth {
        let secret = dotenv_quote("jwt_secret", &auth.jwt_secret)?;
        let expires_in = dotenv_quote("jwt_expires_in", &auth.jwt_expires_in)?;
        out.push_str(&render(
            DOTENV,
            content::DOTENV_AUTH,
            &[("jwt_secret", secret.as_str()), ("jwt_expires_in", expires_in.as_str())],
        )?);
    }
    Ok(out)
}

fn dotenv_example(config: &Configuration) -> Result<String> {
    let port = config.port.to_string();
    let mut out = render(
        DOTENV_EXAMPLE,
        content::DOTENV_EXAMPLE,
        &[("port", port.as_str()), ("database_name", config.database_name.as_str())],
    )?;

    if let Some(auth) = &config.auth {
        let expires_in = dotenv_quote("jwt_expires_in", &auth.jwt_expires_in)?;
        out.push_str(&render(
            DOTENV_EXAMPLE,
            content::DOTENV_EXAMPLE_AUTH,
            &[("jwt_expires_in", expires_in.as_str())],
        )?);
    }
    Ok(out)
}

fn readme(config: &Configuration, port: &str, database_url: &str) -> Result<String> {
    let (env_rows, endpoint_rows) = if config.generate_auth() {
        (
            content::README_AUTH_ENV_ROWS,
            content::README_AUTH_ENDPOINT_ROWS,
        )
    } else {
        ("", "")
    };

    let mut out = render(
        README,
        content::README,
        &[
            ("project_name", config.project_name.as_str()),
            ("port", port),
            ("database_url", database_url),
            ("env_rows", env_rows),
            ("endpoint_rows", endpoint_rows),
        ],
    )?;

    if let Some(git) = &config.git {
        let repository_url = git.repository_url();
        out.push_str(&render(
            README,
            content::README_REPOSITORY,
            &[("repository_url", repository_url.as_str())],
        )?);
    }
    Ok(out)
}

fn package_json(config: &Configuration) -> String {
    let mut dependencies: Vec<(&str, &str)> = DEPENDENCIES.to_vec();
    if config.generate_auth() {
        dependencies.extend_from_slice(AUTH_DEPENDENCIES);
        dependencies.sort_by_key(|(name, _)| *name);
    }

    let mut package = json!({
        "name": config.project_name,
        "version": "1.0.0",
        "description": "",
        "main": "index.js",
        "scripts": {
            "start": "node index.js",
            "dev": "nodemon index.js",
            "test": "echo \"Error: no test specified\" && exit 1"
        },
        "dependencies": version_map(&dependencies),
        "devDependencies": version_map(DEV_DEPENDENCIES),
    });

    if let (Some(git), Value::Object(fields)) = (&config.git, &mut package) {
        fields.insert(
            "repository".to_string(),
            json!({ "type": "git", "url": git.repository_url() }),
        );
    }

    // Alternate formatting pretty-prints with two-space indentation
    format!("{package:#}\n")
}

fn version_map(entries: &[(&str, &str)]) -> Value {
    let map: Map<String, Value> = entries
        .iter()
        .map(|(name, version)| (name.to_string(), Value::String(version.to_string())))
        .collect();
    Value::Object(map)
}
