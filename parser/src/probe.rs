//! File existence checks for `path:line: message` decoding.
//!
//! A line only counts as a located diagnostic when its prefix names a file
//! that exists. The check is a trait so callers can resolve paths against
//! the compiler's working directory, or answer from memory in tests.

use std::path::{Path, PathBuf};

pub trait FileProbe {
    /// Whether `path` (forward slashes) names an existing file.
    fn exists(&self, path: &str) -> bool;
}

impl<F: Fn(&str) -> bool> FileProbe for F {
    fn exists(&self, path: &str) -> bool {
        self(path)
    }
}

/// Filesystem probe. Relative paths resolve against `root` when set,
/// otherwise against the current directory.
#[derive(Debug, Clone, Default)]
pub struct FsProbe {
    root: Option<PathBuf>,
}

impl FsProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root` (the compiler's working directory).
    #[must_use]
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

impl FileProbe for FsProbe {
    fn exists(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let path = Path::new(path);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path).exists(),
            _ => path.exists(),
        }
    }
}
