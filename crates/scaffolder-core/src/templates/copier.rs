//! Manifest materialization onto the filesystem

use crate::error::{Result, ScaffoldError};
use crate::templates::manifest::Manifest;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// How to treat an existing target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeMode {
    /// Root must not exist; every file is written
    Strict,
    /// Root may exist; files already present are left untouched
    Preserve,
}

/// Progress notification emitted for each filesystem action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeEvent {
    DirectoryCreated(PathBuf),
    FileWritten(PathBuf),
    FileSkipped(PathBuf),
}

/// Receives progress notifications during materialization
pub trait ProgressObserver {
    fn notify(&mut self, event: &MaterializeEvent);
}

/// Observer that discards every event
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn notify(&mut self, _event: &MaterializeEvent) {}
}

/// Observer that keeps every event in order
#[derive(Debug, Default)]
pub struct ProgressLog {
    pub events: Vec<MaterializeEvent>,
}

impl ProgressObserver for ProgressLog {
    fn notify(&mut self, event: &MaterializeEvent) {
        self.events.push(event.clone());
    }
}

/// What a materialization run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub directories_created: Vec<PathBuf>,
    pub files_written: Vec<PathBuf>,
    pub files_skipped: Vec<PathBuf>,
}

impl MaterializeReport {
    fn record(&mut self, event: MaterializeEvent, observer: &mut dyn ProgressObserver) {
        observer.notify(&event);
        match event {
            MaterializeEvent::DirectoryCreated(p) => self.directories_created.push(p),
            MaterializeEvent::FileWritten(p) => self.files_written.push(p),
            MaterializeEvent::FileSkipped(p) => self.files_skipped.push(p),
        }
    }
}

/// Create `root` and write every directory and file of `manifest` beneath it
///
/// In strict mode an existing root fails before anything is touched. A
/// failure part-way leaves what was already created in place.
pub fn materialize(
    root: &Path,
    manifest: &Manifest,
    mode: MaterializeMode,
    observer: &mut dyn ProgressObserver,
) -> Result<MaterializeReport> {
    let mut report = MaterializeReport::default();

    match mode {
        MaterializeMode::Strict => {
            if root.exists() {
                return Err(ScaffoldError::AlreadyExists(root.to_path_buf()));
            }
            fs::create_dir(root).map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => ScaffoldError::AlreadyExists(root.to_path_buf()),
                _ => ScaffoldError::io(root, e),
            })?;
            tracing::debug!(root = %root.display(), "created project root");
            report.record(MaterializeEvent::DirectoryCreated(root.to_path_buf()), observer);
        }
        MaterializeMode::Preserve => {
            if ensure_dir(root)? {
                report.record(MaterializeEvent::DirectoryCreated(root.to_path_buf()), observer);
            }
        }
    }

    for dir in manifest.directories() {
        let path = root.join(dir);
        if ensure_dir(&path)? {
            report.record(MaterializeEvent::DirectoryCreated(path), observer);
        }
    }

    for (file_path, content) in manifest.files() {
        let target_path = root.join(file_path);
        if let Some(parent) = target_path.parent() {
            ensure_dir(parent)?;
        }

        let written = match mode {
            MaterializeMode::Strict => {
                fs::write(&target_path, content)
                    .map_err(|e| ScaffoldError::io(&target_path, e))?;
                true
            }
            MaterializeMode::Preserve => write_if_absent(&target_path, content)?,
        };

        if written {
            tracing::debug!(path = %target_path.display(), "wrote file");
            report.record(MaterializeEvent::FileWritten(target_path), observer);
        } else {
            tracing::debug!(path = %target_path.display(), "kept existing file");
            report.record(MaterializeEvent::FileSkipped(target_path), observer);
        }
    }

    Ok(report)
}

/// Create a directory (and missing parents); returns whether it was new
fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|e| ScaffoldError::io(path, e))?;
    tracing::debug!(path = %path.display(), "created directory");
    Ok(true)
}

/// Write only when nothing exists at `path`; returns whether it wrote
fn write_if_absent(path: &Path, content: &str) -> Result<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(ScaffoldError::io(path, e)),
    };
    write_or_remove(path, file, content.as_bytes())?;
    Ok(true)
}

/// Write `content` to the freshly created `path`, deleting it on failure so a
/// truncated file is never mistaken for an existing one
fn write_or_remove(path: &Path, mut out: impl Write, content: &[u8]) -> Result<()> {
    if let Err(e) = out.write_all(content).and_then(|()| out.flush()) {
        drop(out);
        if let Err(cleanup) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %cleanup, "failed to remove partial file");
        }
        return Err(ScaffoldError::io(path, e));
    }
    Ok(())
}
