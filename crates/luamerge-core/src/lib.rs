//! Flatten a Lua workspace into a single program
//!
//! `require` calls are resolved textually: the required file is pasted in
//! front of the code that asked for it and the call is deleted. There is no
//! Lua parser involved; see [`text`] for the substring primitives everything
//! is built from.

pub mod config;
pub mod errors;
pub mod fs;
pub mod preprocessor;
pub mod search_path;
pub mod text;
pub mod workspace;

pub use config::{CliOverrides, PreprocessorConfig, WorkspaceOptions};
pub use errors::{PreprocessError, Result};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use preprocessor::ModulePreprocessor;
pub use search_path::search_paths_from_package_path;
pub use workspace::WorkspaceCollector;

/// Extension of Lua source files and resolved modules
pub const SOURCE_EXTENSION: &str = "lua";

/// Start of a line comment
pub const COMMENT_MARKER: &str = "--";

/// Entry file expected directly under the workspace root
pub const DEFAULT_ENTRY_FILE: &str = "main.lua";

/// Output directory name, excluded from collection
pub const OUT_DIR_NAME: &str = "out";

/// Name of the flattened file written into the output directory
pub const OUTPUT_FILE_NAME: &str = "main.lua";
