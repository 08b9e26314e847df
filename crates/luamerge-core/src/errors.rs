use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Module not found: {module} (searched {} path(s))", .searched.len())]
    ModuleNotFound {
        module: String,
        searched: Vec<PathBuf>,
    },

    #[error("Workspace root not found: {0}")]
    WorkspaceNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PreprocessError>;
