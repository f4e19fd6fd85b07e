//! Mirrors the source tree into the destination tree.
//!
//! Hidden (`.`) and private (`_`) entries are skipped together with their
//! contents, template files are rendered under their suffix-stripped name and
//! every other file is copied byte for byte. Directories are only created in
//! the destination when a file is written into them.

use log::debug;
use minijinja::value::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::{is_private, THIS_KEY};
use crate::error::{Error, Result};
use crate::generator::{Context, Generator};
use crate::site::{site_ctx, SubPath};

/// What happens to a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    /// Render the template at `template` into `target`.
    Render { template: SubPath, target: SubPath },
    /// Copy the file verbatim to `target`.
    Copy { target: SubPath },
}

/// Decides what to do with a visible source file.
pub fn classify(source: &SubPath, suffix: &str) -> FileOperation {
    let name = source.file_name().unwrap_or_default();
    match name.strip_suffix(suffix) {
        Some(stripped) if !suffix.is_empty() && !stripped.is_empty() => FileOperation::Render {
            template: source.clone(),
            target: source.parent().join(stripped),
        },
        _ => FileOperation::Copy { target: source.clone() },
    }
}

/// Walks a generator's source tree into a destination root.
pub struct Walker<'a> {
    generator: &'a Generator,
    dest_root: PathBuf,
}

impl<'a> Walker<'a> {
    pub fn new<P: AsRef<Path>>(generator: &'a Generator, dest_root: P) -> Self {
        Self { generator, dest_root: dest_root.as_ref().to_path_buf() }
    }

    /// Walks the whole source tree.
    ///
    /// The first error aborts the walk; files written before it stay on disk.
    pub fn walk(&self, ctx: &Context) -> Result<()> {
        let source = self.generator.source();
        let root = source.root();

        let entries = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_str().is_some_and(is_private));

        for entry in entries {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let sub = SubPath::from_relative(rel).ok_or_else(|| {
                let reason = io::Error::new(io::ErrorKind::InvalidData, "file name is not UTF-8");
                Error::fs(entry.path(), reason)
            })?;
            self.process(&sub, entry.path(), ctx)?;
        }
        Ok(())
    }

    fn process(&self, sub: &SubPath, source_path: &Path, ctx: &Context) -> Result<()> {
        match classify(sub, self.generator.template_suffix()) {
            FileOperation::Render { template, target } => {
                let dest = self.prepare(&target)?;
                debug!("Rendering '{}' to '{}'", template, dest.display());

                let mut file_ctx = ctx.clone();
                file_ctx.insert(THIS_KEY.to_string(), Value::from_serialize(site_ctx(&target)));
                self.generator.render_file(&template.to_string(), &dest, &file_ctx)
            }
            FileOperation::Copy { target } => {
                let dest = self.prepare(&target)?;
                debug!("Copying '{}' to '{}'", source_path.display(), dest.display());
                fs::copy(source_path, &dest).map(|_| ()).map_err(|e| Error::fs(&dest, e))
            }
        }
    }

    /// Resolves `target` under the destination root, creating its directory.
    fn prepare(&self, target: &SubPath) -> Result<PathBuf> {
        let dir = target.parent().to_path(&self.dest_root);
        fs::create_dir_all(&dir).map_err(|e| Error::fs(&dir, e))?;
        Ok(target.to_path(&self.dest_root))
    }
}

impl Generator {
    /// Renders the whole source tree into `dest_root`.
    pub fn render_site<P: AsRef<Path>>(&self, dest_root: P, ctx: &Context) -> Result<()> {
        Walker::new(self, dest_root).walk(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_template() {
        let op = classify(&SubPath::parse("blog/post.html.jinja"), ".jinja");
        assert_eq!(
            op,
            FileOperation::Render {
                template: SubPath::parse("blog/post.html.jinja"),
                target: SubPath::parse("blog/post.html"),
            }
        );
    }

    #[test]
    fn test_classify_asset() {
        let op = classify(&SubPath::parse("css/site.css"), ".jinja");
        assert_eq!(op, FileOperation::Copy { target: SubPath::parse("css/site.css") });
        let op = classify(&SubPath::parse("notes.jinja.txt"), ".jinja");
        assert_eq!(op, FileOperation::Copy { target: SubPath::parse("notes.jinja.txt") });
    }

    #[test]
    fn test_classify_name_equal_to_suffix_is_copied() {
        let op = classify(&SubPath::parse("docs/jinja"), "jinja");
        assert_eq!(op, FileOperation::Copy { target: SubPath::parse("docs/jinja") });
        let op = classify(&SubPath::parse("docs/page.jinja"), "jinja");
        assert_eq!(
            op,
            FileOperation::Render {
                template: SubPath::parse("docs/page.jinja"),
                target: SubPath::parse("docs/page."),
            }
        );
    }
}
