//! Template lookup rooted at the source directory.

use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::is_private;
use crate::error::{Error, Result};
use crate::site::SubPath;

/// Wraps the source root as a template provider.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    root: PathBuf,
}

impl TemplateSource {
    /// Creates a provider over `root`.
    ///
    /// # Errors
    /// * `Error::FilesystemError` if `root` is not an existing directory
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::fs(
                root,
                io::Error::new(io::ErrorKind::NotFound, "source root is not a directory"),
            ));
        }
        Ok(Self { root: root.to_path_buf() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a template name to a file under the root.
    ///
    /// Names climbing out of the root resolve to nothing.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let sub = SubPath::from_relative(Path::new(name))?;
        if sub.is_root() {
            return None;
        }
        Some(sub.to_path(&self.root))
    }

    /// Reads the raw source of a template.
    ///
    /// # Returns
    /// * `Ok(None)` - No such template; the engine turns this into "not found"
    pub fn get_source(&self, name: &str) -> Result<Option<String>> {
        let Some(path) = self.resolve(name) else {
            debug!("Template name '{}' escapes the source root", name);
            return Ok(None);
        };
        match fs::read_to_string(&path) {
            Ok(source) => Ok(Some(source)),
            Err(err) if err.kind() == io::ErrorKind::NotFound || path.is_dir() => Ok(None),
            Err(err) => Err(Error::fs(&path, err)),
        }
    }

    /// Like [`get_source`](Self::get_source) but a missing template is an error.
    pub fn get_raw(&self, name: &str) -> Result<String> {
        self.get_source(name)?
            .ok_or_else(|| Error::TemplateNotFoundError { name: name.to_string() })
    }

    /// Lists the identifiers of all visible files starting with `prefix`, sorted.
    ///
    /// Hidden and private entries are skipped together with everything below them.
    pub fn list_templates(&self, prefix: &str) -> Result<Vec<String>> {
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_str().is_some_and(is_private));

        let mut names = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            if let Some(sub) = SubPath::from_relative(rel) {
                let name = sub.to_string();
                if name.starts_with(prefix) {
                    names.push(name);
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_escaping_names() {
        let source = TemplateSource { root: PathBuf::from("/srv/site") };
        assert_eq!(source.resolve("../secret"), None);
        assert_eq!(source.resolve("/etc/passwd"), None);
        assert_eq!(source.resolve(""), None);
        assert_eq!(source.resolve("a/b.jinja"), Some(PathBuf::from("/srv/site/a/b.jinja")));
    }
}
