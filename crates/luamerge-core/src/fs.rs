//! Filesystem access behind a trait so the preprocessor can run against an
//! in-memory tree in tests.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use walkdir::WalkDir;

pub trait FileSystem: Send + Sync {
    /// Read a whole file into a string. The file is closed before returning.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Create or truncate `path` and write `content` to it.
    fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;

    /// True if `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// True if `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Every regular file below `root`, recursively, in enumeration order.
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

/// In-memory filesystem for tests.
///
/// Files are kept in a sorted map, so `walk_files` enumerates in path order.
#[derive(Debug, Default)]
pub struct MockFileSystem {
    files: RwLock<BTreeMap<PathBuf, String>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        self.dirs
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.as_ref().to_path_buf());
    }

    /// Current content of `path`, if present.
    pub fn file_content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path.as_ref())
            .cloned()
    }
}

impl FileSystem for MockFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.file_content(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.is_dir(parent) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Directory not found: {}", parent.display()),
                ));
            }
        }

        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let explicit = self
            .dirs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|dir| dir.starts_with(path));
        explicit
            || self
                .files
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .keys()
                .any(|file| file != path && file.starts_with(path))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.dirs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf());
        Ok(())
    }

    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.is_dir(root) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", root.display()),
            ));
        }

        Ok(self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .filter(|file| file.starts_with(root))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_read_write() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/ws/main.lua", "print(1)");

        assert_eq!(fs.read_file(Path::new("/ws/main.lua")).unwrap(), "print(1)");
        assert!(fs.read_file(Path::new("/ws/other.lua")).is_err());

        fs.write_file(Path::new("/ws/main.lua"), "print(2)").unwrap();
        assert_eq!(fs.file_content("/ws/main.lua").unwrap(), "print(2)");
    }

    #[test]
    fn test_mock_directories_are_implied_by_files() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/ws/lib/util.lua", "");

        assert!(fs.is_dir(Path::new("/ws")));
        assert!(fs.is_dir(Path::new("/ws/lib")));
        assert!(!fs.is_dir(Path::new("/ws/lib/util.lua")));
        assert!(fs.is_file(Path::new("/ws/lib/util.lua")));
        assert!(!fs.is_dir(Path::new("/other")));
    }

    #[test]
    fn test_mock_write_requires_parent() {
        let fs = MockFileSystem::new();
        assert!(fs.write_file(Path::new("/ws/out/main.lua"), "x").is_err());

        fs.create_dir_all(Path::new("/ws/out")).unwrap();
        fs.write_file(Path::new("/ws/out/main.lua"), "x").unwrap();
        assert!(fs.is_file(Path::new("/ws/out/main.lua")));
    }

    #[test]
    fn test_mock_walk_files_sorted() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/ws/b.lua", "");
        fs.add_file("/ws/a/c.lua", "");
        fs.add_file("/other/d.lua", "");

        let files = fs.walk_files(Path::new("/ws")).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("/ws/a/c.lua"), PathBuf::from("/ws/b.lua")]
        );
        assert!(fs.walk_files(Path::new("/missing")).is_err());
    }

    #[test]
    fn test_real_walk_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("main.lua"), "").unwrap();
        std::fs::write(dir.path().join("lib").join("util.lua"), "").unwrap();

        let fs = RealFileSystem::new();
        let mut files = fs.walk_files(dir.path()).unwrap();
        files.sort();
        assert_eq!(
            files,
            vec![dir.path().join("lib").join("util.lua"), dir.path().join("main.lua")]
        );
    }
}
