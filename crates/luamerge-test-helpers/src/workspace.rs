//! Throwaway workspaces, on disk or in memory

use luamerge_core::fs::MockFileSystem;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A workspace in a temporary directory, removed on drop
pub struct TempWorkspace {
    dir: TempDir,
}

impl TempWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories
    pub fn file(&self, relative: impl AsRef<Path>, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        fs::read_to_string(self.dir.path().join(relative)).expect("Failed to read file")
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an in-memory filesystem from `(path, content)` pairs
pub fn mock_fs(files: &[(&str, &str)]) -> Arc<MockFileSystem> {
    let mut fs = MockFileSystem::new();
    for (path, content) in files {
        fs.add_file(path, *content);
    }
    Arc::new(fs)
}
