//! The `jinjagenadd` hook: filters and globals for building sites.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use minijinja::value::{Enumerator, Object, Value};
use minijinja::{context, Error, ErrorKind, State};
use pulldown_cmark::{html::push_html, Options, Parser};
use std::sync::Arc;

use crate::generator::{exports_of, gen_templates, Generator};

const INDEX_FILE: &str = "index.html";
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Registers the site filters and globals.
///
/// `param` is split on commas into the `flags` global.
pub fn jinjagen_hook(generator: &mut Generator, param: Option<&str>) -> crate::error::Result<()> {
    let source = generator.source();
    let suffix = generator.template_suffix().to_string();
    let flags: Vec<String> = match param {
        Some(p) if !p.is_empty() => p.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    let env = generator.env_mut();
    env.add_filter("index2dot", index2dot);
    env.add_filter("markdown", markdown);
    env.add_filter("dateformat", dateformat);

    env.add_global("flags", Value::from(flags));
    env.add_function("today", today);
    env.add_function("import", import);

    let raw_source = Arc::clone(&source);
    env.add_function("include_raw", move |name: String| -> Result<Value, Error> {
        Ok(Value::from_safe_string(raw_source.get_raw(&name)?))
    });
    env.add_function("list_templates", move |prefix: Option<String>| -> Result<Value, Error> {
        let names = gen_templates(&source, &suffix, prefix.as_deref().unwrap_or(""))?;
        Ok(Value::from(names))
    });
    Ok(())
}

/// Collapses `.../index.html` to `.../.`.
pub fn index2dot(path: String) -> String {
    match path.strip_suffix(INDEX_FILE) {
        Some(dir) if dir.is_empty() || dir.ends_with('/') => format!("{dir}."),
        _ => path,
    }
}

/// Converts Markdown to HTML, ending the output with exactly one newline.
pub fn markdown(text: String) -> Value {
    let options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(&text, options);

    let mut html = String::with_capacity(text.len() * 2);
    push_html(&mut html, parser);
    html.truncate(html.trim_end_matches('\n').len());
    html.push('\n');
    Value::from_safe_string(html)
}

/// Formats a date string or unix timestamp with a strftime pattern.
pub fn dateformat(value: Value, format: Option<String>) -> Result<String, Error> {
    let format = format.unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
    let datetime = parse_datetime(&value).ok_or_else(|| {
        Error::new(ErrorKind::InvalidOperation, format!("cannot interpret {value} as a date"))
    })?;

    let items: Vec<Item<'_>> = StrftimeItems::new(&format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid date format '{format}'"),
        ));
    }
    Ok(datetime.format_with_items(items.into_iter()).to_string())
}

/// Current local time as an ISO 8601 string, accepted by `dateformat`.
pub fn today() -> String {
    Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Namespace of top-level variables and macros exported by another template.
fn import(state: &State, name: String) -> Result<Value, Error> {
    let tmpl = state.env().get_template(&name)?;
    let exports = exports_of(&tmpl)?;
    Ok(Value::from_object(ImportedTemplate { name, exports }))
}

/// Exports of an imported template.
///
/// Attribute access serves the exported values. A macro only runs in the state
/// that defined it, so method calls evaluate the template again and call the
/// macro there.
#[derive(Debug)]
struct ImportedTemplate {
    name: String,
    exports: IndexMap<String, Value>,
}

impl Object for ImportedTemplate {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        self.exports.get(key.as_str()?).cloned()
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Values(self.exports.keys().map(|k| Value::from(k.as_str())).collect())
    }

    fn call_method(
        self: &Arc<Self>,
        state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        if !self.exports.contains_key(method) {
            return Err(Error::new(
                ErrorKind::UnknownMethod,
                format!("template '{}' exports no '{}'", self.name, method),
            ));
        }
        let tmpl = state.env().get_template(&self.name)?;
        let module_state = tmpl.eval_to_state(context! {})?;
        let output = module_state.call_macro(method, args)?;
        Ok(Value::from_safe_string(output))
    }
}

fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
    if let Some(s) = value.as_str() {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_local());
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt);
            }
        }
        return NaiveDate::parse_from_str(s, DEFAULT_DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    let secs = i64::try_from(value.clone()).ok()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index2dot() {
        assert_eq!(index2dot("index.html".into()), ".");
        assert_eq!(index2dot("blog/index.html".into()), "blog/.");
        assert_eq!(index2dot("blog/myindex.html".into()), "blog/myindex.html");
        assert_eq!(index2dot("blog/about.html".into()), "blog/about.html");
    }

    #[test]
    fn test_markdown_single_trailing_newline() {
        let html = markdown("# Title\n\nSome *text*.".into());
        assert_eq!(html.as_str(), Some("<h1>Title</h1>\n<p>Some <em>text</em>.</p>\n"));
        assert!(html.is_safe());
    }

    #[test]
    fn test_dateformat_inputs() {
        assert_eq!(dateformat(Value::from("2024-03-05"), None).unwrap(), "2024-03-05");
        assert_eq!(
            dateformat(Value::from("2024-03-05T10:20:30"), Some("%d/%m/%Y %H:%M".into()))
                .unwrap(),
            "05/03/2024 10:20"
        );
        assert_eq!(dateformat(Value::from(0), Some("%Y".into())).unwrap(), "1970");
        assert!(dateformat(Value::from("not a date"), None).is_err());
        assert!(dateformat(Value::from("2024-03-05"), Some("%Q".into())).is_err());
    }

    #[test]
    fn test_today_is_parseable() {
        assert!(parse_datetime(&Value::from(today())).is_some());
    }
}
