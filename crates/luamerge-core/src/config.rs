use crate::errors::{PreprocessError, Result};
use crate::search_path::search_paths_from_package_path;
use crate::{DEFAULT_ENTRY_FILE, OUTPUT_FILE_NAME, OUT_DIR_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default name of the configuration file looked up in the workspace root
pub const CONFIG_FILE_NAME: &str = "luamerge.yaml";

/// Workspace layout options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceOptions {
    /// Entry file, relative to the workspace root (default: main.lua)
    #[serde(default = "default_entry_file")]
    pub entry_file: String,

    /// Directory excluded from collection and receiving output (default: out)
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Name of the generated file inside `out_dir` (default: main.lua)
    #[serde(default = "default_out_file")]
    pub out_file: String,
}

fn default_entry_file() -> String {
    DEFAULT_ENTRY_FILE.to_string()
}

fn default_out_dir() -> String {
    OUT_DIR_NAME.to_string()
}

fn default_out_file() -> String {
    OUTPUT_FILE_NAME.to_string()
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            entry_file: default_entry_file(),
            out_dir: default_out_dir(),
            out_file: default_out_file(),
        }
    }
}

/// Main preprocessor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessorConfig {
    #[serde(default)]
    pub workspace_options: WorkspaceOptions,

    /// Extra module search roots, relative to the workspace root
    #[serde(default)]
    pub module_paths: Vec<String>,

    /// Lua `package.path` string contributing further search roots
    #[serde(default)]
    pub package_path: Option<String>,

    /// Rewrite `function Name(...)` into `Name = function(...)` (default: false)
    #[serde(default)]
    pub rewrite_functions: bool,

    /// Strip comments and blank lines from the final buffer (default: true)
    #[serde(default = "default_true")]
    pub strip_comments: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            workspace_options: WorkspaceOptions::default(),
            module_paths: Vec::new(),
            package_path: None,
            rewrite_functions: false,
            strip_comments: true,
        }
    }
}

/// Values given on the command line; `None` keeps the file/default value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub entry_file: Option<String>,
    pub module_paths: Option<Vec<String>>,
    pub package_path: Option<String>,
    pub rewrite_functions: Option<bool>,
    pub strip_comments: Option<bool>,
}

impl PreprocessorConfig {
    /// Load configuration from a YAML file, or JSON when the extension is `.json`
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");

        if is_json {
            serde_json::from_str(&content).map_err(|e| PreprocessError::Config(e.to_string()))
        } else {
            serde_yaml::from_str(&content).map_err(|e| PreprocessError::Config(e.to_string()))
        }
    }

    /// Create a default configuration and write it to a YAML file
    pub fn init_file(path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(&PreprocessorConfig::default())
            .map_err(|e| PreprocessError::Config(e.to_string()))?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Merge CLI overrides into this configuration
    pub fn merge(&mut self, overrides: &CliOverrides) {
        if let Some(ref entry_file) = overrides.entry_file {
            self.workspace_options.entry_file = entry_file.clone();
        }
        if let Some(ref module_paths) = overrides.module_paths {
            self.module_paths.extend(module_paths.iter().cloned());
        }
        if let Some(ref package_path) = overrides.package_path {
            self.package_path = Some(package_path.clone());
        }
        if let Some(rewrite_functions) = overrides.rewrite_functions {
            self.rewrite_functions = rewrite_functions;
        }
        if let Some(strip_comments) = overrides.strip_comments {
            self.strip_comments = strip_comments;
        }
    }

    /// Ordered search roots for a workspace at `root`.
    ///
    /// The root comes first, then `module_paths`, then the roots derived from
    /// `package_path`. Relative entries are resolved against `root`.
    pub fn search_paths(&self, root: &Path) -> Vec<PathBuf> {
        let package_roots = self
            .package_path
            .as_deref()
            .map(search_paths_from_package_path)
            .unwrap_or_default();

        let mut paths = vec![root.to_path_buf()];
        let extra = self
            .module_paths
            .iter()
            .map(PathBuf::from)
            .chain(package_roots);
        for path in extra {
            let path = if path.is_absolute() {
                path
            } else {
                root.join(path)
            };
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }
}
