//! Initial render context loading.
//! The context file holds a mapping of names available to every template,
//! written as JSON or YAML.

use indexmap::IndexMap;
use log::debug;
use minijinja::value::Value;
use std::path::Path;

use crate::constants::THIS_KEY;
use crate::error::{Error, Result};
use crate::generator::Context;

/// Reads a context file from disk.
///
/// # Errors
/// * `Error::FilesystemError` if the file cannot be read
/// * `Error::ConfigError` if its content is not a JSON or YAML mapping
pub fn load_context<P: AsRef<Path>>(path: P) -> Result<Context> {
    let path = path.as_ref();
    debug!("Loading context from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
    parse_context(&content)
}

/// Parses context content, trying JSON first and YAML second.
pub fn parse_context(content: &str) -> Result<Context> {
    let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid context format: {e}")))?,
    };

    if raw.contains_key(THIS_KEY) {
        log::warn!("Context key '{}' is replaced by the site context of each file", THIS_KEY);
    }

    Ok(raw.into_iter().map(|(key, value)| (key, Value::from_serialize(&value))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_context() {
        let ctx = parse_context(r#"{"title": "My Site", "year": 2024}"#).unwrap();
        assert_eq!(ctx["title"].as_str(), Some("My Site"));
        assert_eq!(ctx.get_index(1).map(|(k, _)| k.as_str()), Some("year"));
    }

    #[test]
    fn test_parse_yaml_context() {
        let ctx = parse_context("title: My Site\nauthors:\n  - ann\n  - bo\n").unwrap();
        assert_eq!(ctx["title"].as_str(), Some("My Site"));
        assert_eq!(ctx["authors"].len(), Some(2));
    }

    #[test]
    fn test_parse_rejects_non_mapping() {
        assert!(matches!(parse_context("- a\n- b\n"), Err(Error::ConfigError(_))));
    }
}
