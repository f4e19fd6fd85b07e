//! The `pathutil` module: `/`-separated path helpers for templates.

use minijinja::value::{Rest, Value};

use super::ModuleGlobal;
use crate::constants::PATHUTIL_MODULE;

pub fn module() -> ModuleGlobal {
    ModuleGlobal::new(PATHUTIL_MODULE)
        .with_member("join", Value::from_function(join))
        .with_member("basename", Value::from_function(basename))
        .with_member("dirname", Value::from_function(dirname))
        .with_member("splitext", Value::from_function(splitext))
}

/// Joins parts with `/`; an absolute part discards everything before it.
pub fn join(parts: Rest<String>) -> String {
    let mut out = String::new();
    for part in parts.iter() {
        if part.starts_with('/') {
            out.clear();
        } else if !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(part);
    }
    out
}

pub fn basename(path: String) -> String {
    path.rsplit('/').next().unwrap_or_default().to_string()
}

pub fn dirname(path: String) -> String {
    match path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

/// Splits off the extension of the last segment; leading dots are not extensions.
pub fn splitext(path: String) -> Vec<String> {
    let start = path.rfind('/').map_or(0, |idx| idx + 1);
    let name = &path[start..];
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(idx) => {
            let (root, ext) = path.split_at(start + leading + idx);
            vec![root.to_string(), ext.to_string()]
        }
        None => vec![path.clone(), String::new()],
    }
}
