//! Manifest: the resolved set of directories and file contents for one run

/// Directories to ensure and files to write, relative to the project root
///
/// Directories keep insertion order (creation order) without duplicates.
/// Files keep the order in which they were first added; re-adding a path
/// replaces its content in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    directories: Vec<String>,
    files: Vec<(String, String)>,
}

impl Manifest {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a directory if not already present
    pub(crate) fn add_directory(&mut self, path: impl Into<String>) {
        let path = path.into();
        if !self.directories.contains(&path) {
            self.directories.push(path);
        }
    }

    /// Add a file, replacing earlier content for the same path
    pub(crate) fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        match self.files.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => *existing = content,
            None => self.files.push((path, content)),
        }
    }

    /// Add the ancestors of every file path, outermost first
    pub(crate) fn complete_directories(&mut self) {
        let parents: Vec<String> = self
            .files
            .iter()
            .flat_map(|(path, _)| ancestors(path))
            .collect();
        for parent in parents {
            self.add_directory(parent);
        }
    }

    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    /// Iterate over `(path, content)` pairs
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.as_str())
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.file(path).is_some()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// `src/routes/index.js` -> [`src`, `src/routes`]
fn ancestors(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path.split('/').collect();
    (1..segments.len())
        .map(|n| segments[..n].join("/"))
        .collect()
}
