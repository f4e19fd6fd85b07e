//! Per-output-file site metadata.
//! Paths are handled as component lists so no separator arithmetic is done on raw strings.

use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::constants::ROOT_RELROOT;

/// A path relative to a tree root, stored as its components.
///
/// A `.` component is only kept in final position, where it marks a
/// collapsed index path (`blog/.`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SubPath {
    components: Vec<String>,
}

impl SubPath {
    /// The tree root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a `/`-separated relative path.
    pub fn parse(s: &str) -> Self {
        let parts: Vec<&str> = s.split('/').filter(|p| !p.is_empty()).collect();
        let last = parts.len().saturating_sub(1);
        let components = parts
            .iter()
            .enumerate()
            .filter(|(i, p)| **p != "." || *i == last)
            .map(|(_, p)| p.to_string())
            .collect();
        Self { components }
    }

    /// Builds a subpath from a filesystem path relative to a root.
    ///
    /// Returns `None` when the path is absolute, climbs with `..` or is not valid UTF-8.
    pub fn from_relative(path: &Path) -> Option<Self> {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => components.push(name.to_str()?.to_string()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(Self { components })
    }

    /// Returns a new subpath with `name` appended.
    pub fn join(&self, name: &str) -> Self {
        let mut components = self.components.clone();
        components.push(name.to_string());
        Self { components }
    }

    /// The final component, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// Everything but the final component.
    pub fn parent(&self) -> Self {
        let end = self.components.len().saturating_sub(1);
        Self { components: self.components[..end].to_vec() }
    }

    /// Number of directory components above the final one.
    pub fn depth(&self) -> usize {
        self.components.len().saturating_sub(1)
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(String::as_str)
    }

    /// Resolves the subpath under a filesystem root.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.components.iter().fold(root.to_path_buf(), |acc, c| acc.join(c))
    }
}

impl fmt::Display for SubPath {
    /// Formats with `/` separators; the root is written as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.components.join("/"))
        }
    }
}

/// Metadata injected into every render under the `this` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteContext {
    /// Final path segment of the output file.
    pub filename: String,
    /// All but the last segment; `.` at the tree root.
    pub dirpath: String,
    /// `./` at depth 0, otherwise one `../` per directory level.
    pub relroot: String,
    /// `dirpath/filename`, keeping a trailing `/.` for collapsed index paths.
    pub path: String,
}

/// Computes the site context of an output file from its destination subpath.
pub fn site_ctx(dest: &SubPath) -> SiteContext {
    let filename = dest.file_name().unwrap_or(".").to_string();
    let dirpath = dest.parent().to_string();
    let depth = dest.depth();
    let relroot = if depth > 0 { "../".repeat(depth) } else { ROOT_RELROOT.to_string() };
    let path = format!("{dirpath}/{filename}");

    SiteContext { filename, dirpath, relroot, path }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_inner_dots_and_empty_parts() {
        let p = SubPath::parse("./a//b/./c");
        assert_eq!(p.components().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_keeps_trailing_dot() {
        let p = SubPath::parse("blog/.");
        assert_eq!(p.file_name(), Some("."));
        assert_eq!(p.depth(), 1);
        assert_eq!(p.to_string(), "blog/.");
    }

    #[test]
    fn test_from_relative_rejects_parent_dir() {
        assert!(SubPath::from_relative(Path::new("../etc/passwd")).is_none());
        assert_eq!(
            SubPath::from_relative(Path::new("a/b.txt")),
            Some(SubPath::parse("a/b.txt"))
        );
    }

    #[test]
    fn test_root_display() {
        assert_eq!(SubPath::root().to_string(), ".");
        assert!(SubPath::root().is_root());
    }
}
