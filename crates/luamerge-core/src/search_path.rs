use std::path::PathBuf;

/// Turn a Lua `package.path` string into module search roots.
///
/// Entries are `;`-separated templates such as `./lib/?.lua`. Each template
/// is cut at its first `?` and the trailing separators dropped, leaving the
/// directory the template points into. Empty entries (including the `;;`
/// "default path" marker) are skipped and duplicates keep their first
/// position.
pub fn search_paths_from_package_path(package_path: &str) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();

    for entry in package_path
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    {
        let root = match entry.find('?') {
            Some(index) => entry[..index].trim_end_matches(&['/', '\\'][..]),
            None => entry,
        };
        let root = PathBuf::from(if root.is_empty() { "." } else { root });

        if !roots.contains(&root) {
            roots.push(root);
        }
    }

    roots
}
