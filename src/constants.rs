//! Common constants used throughout jinjagen.

/// Suffix marking a source file as a template to render.
pub const TEMPLATE_SUFFIX: &str = ".jinja";

/// Context key holding the [`SiteContext`](crate::site::SiteContext) of the file being rendered.
pub const THIS_KEY: &str = "this";

/// Entries whose name starts with one of these are never walked, copied or listed.
pub const PRIVATE_PREFIXES: [char; 2] = ['.', '_'];

/// Relative root of a file placed directly in the tree root.
pub const ROOT_RELROOT: &str = "./";

/// Name of the built-in hook providing filters and site globals.
pub const STDLIB_HOOK: &str = "jinjagenadd";

/// Name of the built-in module exposed as a plain global.
pub const PATHUTIL_MODULE: &str = "pathutil";

/// Returns true for hidden (`.`) or private (`_`) entry names.
pub fn is_private(name: &str) -> bool {
    name.starts_with(PRIVATE_PREFIXES)
}
