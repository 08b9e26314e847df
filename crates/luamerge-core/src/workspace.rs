//! A directory of Lua files flattened into one program
//!
//! Every `.lua` file below the root is concatenated in enumeration order,
//! with the entry file appended last. Files inside an `out` directory are
//! skipped since that is where the flattened result is written.

use crate::config::{PreprocessorConfig, WorkspaceOptions};
use crate::errors::{PreprocessError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::preprocessor::ModulePreprocessor;
use crate::SOURCE_EXTENSION;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub struct WorkspaceCollector {
    root: PathBuf,
    options: WorkspaceOptions,
    search_paths: Vec<PathBuf>,
    rewrite_functions: bool,
    strip_comments: bool,
    fs: Arc<dyn FileSystem>,
}

impl WorkspaceCollector {
    /// Workspace at `root` on the real filesystem, searching modules in `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_file_system(root, Arc::new(RealFileSystem::new()))
    }

    pub fn with_file_system(root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        let root = root.into();
        Self::from_config(root, &PreprocessorConfig::default(), fs)
    }

    pub fn from_config(
        root: impl Into<PathBuf>,
        config: &PreprocessorConfig,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let root = root.into();
        Self {
            search_paths: config.search_paths(&root),
            root,
            options: config.workspace_options.clone(),
            rewrite_functions: config.rewrite_functions,
            strip_comments: config.strip_comments,
            fs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Append a module search root. Roots already present are ignored.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.search_paths.contains(&path) {
            self.search_paths.push(path);
        }
    }

    pub fn main_file_path(&self) -> PathBuf {
        self.root.join(&self.options.entry_file)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.options.out_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir().join(&self.options.out_file)
    }

    /// Lua files of the workspace, except the entry file and anything under
    /// an `out` directory.
    pub fn lua_file_paths(&self) -> Result<Vec<PathBuf>> {
        if !self.fs.is_dir(&self.root) {
            return Err(PreprocessError::WorkspaceNotFound(self.root.clone()));
        }

        let main_file = self.main_file_path();
        let files = self
            .fs
            .walk_files(&self.root)?
            .into_iter()
            .filter(|path| *path != main_file)
            .filter(|path| !self.is_in_out_dir(path))
            .filter(|path| path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
            .collect();
        Ok(files)
    }

    fn is_in_out_dir(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .parent()
            .is_some_and(|dir| dir.iter().any(|part| part == self.options.out_dir.as_str()))
    }

    /// Concatenate the workspace, entry file last, into a preprocessor that
    /// shares this workspace's search roots.
    pub fn collect(&self) -> Result<ModulePreprocessor> {
        let mut pieces = Vec::new();
        for path in self.lua_file_paths()? {
            debug!("Collecting {}", path.display());
            pieces.push(self.fs.read_file(&path)?);
        }

        let main_file = self.main_file_path();
        debug!("Collecting entry file {}", main_file.display());
        pieces.push(self.fs.read_file(&main_file)?);

        info!(
            "Collected {} file(s) from {}",
            pieces.len(),
            self.root.display()
        );

        Ok(ModulePreprocessor::with_file_system(
            pieces.join("\n"),
            self.search_paths.clone(),
            self.fs.clone(),
        ))
    }

    /// Collect and expand, returning the flat program text.
    pub fn build(&self) -> Result<String> {
        let mut preprocessor = self.collect()?;
        preprocessor.expand_require()?;

        if self.rewrite_functions {
            preprocessor.rewrite_function_declarations();
        }
        if self.strip_comments {
            preprocessor.strip_comments_and_blank_lines();
        }

        info!(
            "Flattened workspace with {} inlined module(s)",
            preprocessor.expanded_count()
        );
        Ok(preprocessor.into_code())
    }

    /// Write `text` to the output file, creating the output directory if
    /// needed. Previous content is replaced.
    pub fn output(&self, text: &str) -> Result<PathBuf> {
        let dir = self.output_dir();
        if !self.fs.is_dir(&dir) {
            self.fs.create_dir_all(&dir)?;
        }

        let path = self.output_path();
        self.fs.write_file(&path, text)?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}
