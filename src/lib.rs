//! jinjagen is a static site generator.
//! It walks a source tree, renders `.jinja` templates into output files,
//! copies every other file verbatim and lets hook modules extend the
//! template environment.

/// Command-line interface module for the jinjagen application
pub mod cli;

/// Initial render context loaded from JSON or YAML
pub mod config;

pub mod constants;

/// Error types and handling for the jinjagen application
pub mod error;

/// Template environment and single-template rendering
pub mod generator;

/// Hook modules extending the template environment
/// Ships `jinjagenadd` (filters and site globals) and `pathutil`
pub mod hooks;

pub mod logger;

/// Per-file site context and component-list paths
pub mod site;

/// Template lookup rooted at the source directory
pub mod source;

/// Recursive source-to-destination mirroring
pub mod walker;
