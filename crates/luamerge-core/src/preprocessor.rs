//! Textual `require` expansion
//!
//! [`ModulePreprocessor`] owns a Lua source buffer and flattens it: every
//! `require("a.b")` / `require('a.b')` call is deleted and the content of
//! `a/b.lua`, found under the configured search roots, is prepended to the
//! buffer. Passes repeat until no require is left. Each module is inlined at
//! most once per preprocessor, which also makes cyclic requires terminate.
//!
//! Comments are stripped line by line at the first `--`. This does not know
//! about string literals, so `s = "a--b"` loses its tail.

use crate::errors::{PreprocessError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::text::{
    find_whole_word, get_between, is_word_separator, replace_two_word_pattern,
    trim_tail_after_first_match,
};
use crate::{COMMENT_MARKER, SOURCE_EXTENSION};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

/// Opening and closing text of the two accepted require forms, in the order
/// they are searched.
const REQUIRE_FORMS: [(&str, &str); 2] = [("require(\"", "\")"), ("require('", "')")];

const FUNCTION_KEYWORD: &str = "function";
const LOCAL_KEYWORD: &str = "local";

pub struct ModulePreprocessor {
    code: String,
    /// Modules already inlined in this session
    expanded: FxHashSet<String>,
    search_paths: Vec<PathBuf>,
    fs: Arc<dyn FileSystem>,
}

impl ModulePreprocessor {
    /// Preprocessor without search roots, reading from the real filesystem
    pub fn new(code: impl Into<String>) -> Self {
        Self::with_file_system(code, Vec::new(), Arc::new(RealFileSystem::new()))
    }

    pub fn with_search_paths<I, P>(code: impl Into<String>, search_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_file_system(
            code,
            search_paths.into_iter().map(Into::into).collect(),
            Arc::new(RealFileSystem::new()),
        )
    }

    pub fn with_file_system(
        code: impl Into<String>,
        search_paths: Vec<PathBuf>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let mut preprocessor = Self {
            code: code.into(),
            expanded: FxHashSet::default(),
            search_paths: Vec::new(),
            fs,
        };
        for path in search_paths {
            preprocessor.add_search_path(path);
        }
        preprocessor
    }

    /// Append a search root. Roots already present are ignored.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.search_paths.contains(&path) {
            self.search_paths.push(path);
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn into_code(self) -> String {
        self.code
    }

    /// True if `module` has been inlined by this preprocessor
    pub fn is_expanded(&self, module: &str) -> bool {
        self.expanded.contains(module)
    }

    /// Names of the modules inlined so far, in no particular order
    pub fn expanded_modules(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    /// Remove every require call from the buffer and return the required
    /// module names in discovery order.
    ///
    /// The double-quoted form is tried before the single-quoted one on every
    /// round; a round removes all literal copies of the call it found.
    pub fn parse_and_strip_requires(&mut self) -> IndexSet<String> {
        let mut modules = IndexSet::new();
        while let Some(module) = self.strip_first_require() {
            modules.insert(module);
        }
        modules
    }

    fn strip_first_require(&mut self) -> Option<String> {
        for (open, close) in REQUIRE_FORMS {
            let module = get_between(&self.code, open, close);
            if module.is_empty() {
                continue;
            }

            let module = module.to_string();
            let statement = format!("{open}{module}{close}");
            self.code = self.code.replace(&statement, "");
            trace!("Removed {}", statement);
            return Some(module);
        }
        None
    }

    /// Read the file `module` refers to from the first search root holding it.
    pub fn resolve_module(&self, module: &str) -> Result<String> {
        let relative = module_relative_path(module);
        for search_path in &self.search_paths {
            let full_path = search_path.join(&relative);
            if !self.fs.is_file(&full_path) {
                continue;
            }

            debug!("Resolved module '{}' to {}", module, full_path.display());
            return Ok(self.fs.read_file(&full_path)?);
        }

        Err(PreprocessError::ModuleNotFound {
            module: module.to_string(),
            searched: self.search_paths.clone(),
        })
    }

    /// Run one expansion pass.
    ///
    /// Returns `Ok(false)` once the buffer holds no require call. If any newly
    /// required module cannot be resolved the buffer is restored to its state
    /// before the pass and the error is returned.
    pub fn expand_once(&mut self) -> Result<bool> {
        let snapshot = self.code.clone();
        let modules = self.parse_and_strip_requires();
        if modules.is_empty() {
            return Ok(false);
        }

        let mut resolved = Vec::new();
        for module in modules {
            if self.expanded.contains(&module) {
                trace!("Module '{}' already inlined", module);
                continue;
            }

            match self.resolve_module(&module) {
                Ok(content) => resolved.push((module, content)),
                Err(e) => {
                    self.code = snapshot;
                    return Err(e);
                }
            }
        }

        for (module, content) in resolved {
            debug!("Inlining module '{}'", module);
            self.code = format!("{}\n{}", content, self.code);
            self.expanded.insert(module);
        }

        self.strip_comments_and_blank_lines();
        Ok(true)
    }

    /// Expand until no require call is left.
    pub fn expand_require(&mut self) -> Result<()> {
        let mut passes = 0usize;
        while self.expand_once()? {
            passes += 1;
        }
        debug!(
            "Require expansion finished after {} pass(es), {} module(s) inlined",
            passes,
            self.expanded.len()
        );
        Ok(())
    }

    pub fn strip_comments_and_blank_lines(&mut self) {
        self.code = strip_blank_lines(&strip_comments(&self.code));
    }

    /// Rewrite global `function Name(...)` declarations as
    /// `Name = function(...)`.
    ///
    /// Only occurrences where the name is directly followed by `(` are
    /// touched, so `local function` and method (`a:b`) declarations are left
    /// alone even when they share a name with a global function.
    /// Returns the number of distinct names rewritten.
    pub fn rewrite_function_declarations(&mut self) -> usize {
        let names = global_function_names(&self.code);

        for name in &names {
            self.code = rewrite_declarations_of(&self.code, name);
        }

        debug!("Rewrote {} function declaration name(s)", names.len());
        names.len()
    }
}

impl fmt::Display for ModulePreprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// `a.b.c` -> `a/b/c.lua`
pub fn module_relative_path(module: &str) -> PathBuf {
    let mut path: PathBuf = module.split('.').collect();
    path.set_extension(SOURCE_EXTENSION);
    path
}

/// Cut every line at its first comment marker.
pub fn strip_comments(code: &str) -> String {
    code.lines()
        .map(|line| trim_tail_after_first_match(line, COMMENT_MARKER, true))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop lines that are empty or whitespace only.
pub fn strip_blank_lines(code: &str) -> String {
    code.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Names declared with a global `function Name(` statement, in source order.
fn global_function_names(code: &str) -> IndexSet<String> {
    let mut names = IndexSet::new();
    let mut offset = 0;

    while let Some(index) = find_whole_word(code, FUNCTION_KEYWORD, offset) {
        let after = index + FUNCTION_KEYWORD.len();
        offset = after;

        let rest = &code[after..];
        let Some(paren) = rest.find('(') else {
            break;
        };

        let name = rest[..paren].trim();
        if is_function_name(name) && !is_local_declaration(&code[..index]) {
            names.insert(name.to_string());
        }
    }

    names
}

/// Rewrite each global `function <name>(` declaration of `name`.
fn rewrite_declarations_of(code: &str, name: &str) -> String {
    let replacement = format!("{name} = {FUNCTION_KEYWORD}");
    let mut out = String::with_capacity(code.len());
    let mut copied = 0;
    let mut offset = 0;

    while let Some(index) = find_whole_word(code, FUNCTION_KEYWORD, offset) {
        offset = index + FUNCTION_KEYWORD.len();
        let Some(end) = declared_name_end(code, offset, name) else {
            continue;
        };
        if is_local_declaration(&code[..index]) {
            continue;
        }

        out.push_str(&code[copied..index]);
        out.push_str(&replace_two_word_pattern(
            &code[index..end],
            FUNCTION_KEYWORD,
            name,
            &replacement,
        ));
        copied = end;
        offset = end;
    }

    out.push_str(&code[copied..]);
    out
}

/// End offset of `name` when the text after the keyword is whitespace,
/// `name`, optional whitespace and `(`.
fn declared_name_end(code: &str, after_keyword: usize, name: &str) -> Option<usize> {
    let rest = &code[after_keyword..];
    let declared = rest.trim_start();
    if declared.len() == rest.len() {
        return None;
    }

    let tail = declared.strip_prefix(name)?;
    if !tail.trim_start().starts_with('(') {
        return None;
    }
    Some(code.len() - tail.len())
}

/// Identifier, optionally dotted: `foo`, `M.util.foo`.
fn is_function_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            part.chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && part.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
}

fn is_local_declaration(before_keyword: &str) -> bool {
    before_keyword
        .trim_end()
        .strip_suffix(LOCAL_KEYWORD)
        .is_some_and(|head| head.chars().next_back().map_or(true, is_word_separator))
}
