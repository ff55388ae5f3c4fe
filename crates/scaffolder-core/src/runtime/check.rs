//! Detection of git, Node.js and JavaScript package managers

use clap::ValueEnum;
use std::fmt;
use std::process::Command;

/// Package managers able to install the generated project's dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Supported package managers in order of preference
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
    ];

    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    pub fn install_command(&self) -> String {
        format!("{} install", self.binary())
    }

    pub fn dev_command(&self) -> String {
        match self {
            PackageManager::Npm => "npm run dev".to_string(),
            other => format!("{} dev", other.binary()),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

fn check_binary(binary: &str, name: &'static str) -> RuntimeInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if git is available
pub fn check_git() -> RuntimeInfo {
    check_binary("git", "git")
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    check_binary("node", "Node.js")
}

/// Check if a package manager is available
pub fn check_package_manager(pm: PackageManager) -> RuntimeInfo {
    check_binary(pm.binary(), pm.binary())
}

/// Detect the first available package manager
pub fn detect_package_manager() -> PackageManager {
    PackageManager::ALL
        .into_iter()
        .find(|pm| check_package_manager(*pm).available)
        // Default to npm if nothing detected (install will fail with a warning)
        .unwrap_or(PackageManager::Npm)
}

/// Check the tools a run will need; returns the ones that are missing
pub fn missing_tools(needs_git: bool, install_with: Option<PackageManager>) -> Vec<RuntimeInfo> {
    let mut checks = Vec::new();
    if needs_git {
        checks.push(check_git());
    }
    if let Some(pm) = install_with {
        checks.push(check_node());
        checks.push(check_package_manager(pm));
    }
    checks.into_iter().filter(|info| !info.available).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_manager_commands() {
        assert_eq!(PackageManager::Npm.install_command(), "npm install");
        assert_eq!(PackageManager::Npm.dev_command(), "npm run dev");
        assert_eq!(PackageManager::Pnpm.dev_command(), "pnpm dev");
        assert_eq!(PackageManager::Bun.to_string(), "bun");
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let info = check_binary("definitely-not-a-real-binary-1234", "nothing");
        assert!(!info.available);
        assert!(info.version.is_none());
    }

    #[test]
    fn test_detect_returns_supported_manager() {
        let pm = detect_package_manager();
        assert!(PackageManager::ALL.contains(&pm));
    }

    #[test]
    fn test_missing_tools_nothing_requested() {
        assert!(missing_tools(false, None).is_empty());
    }
}
