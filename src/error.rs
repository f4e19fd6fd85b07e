//! Error handling for jinjagen.
//! Defines the error taxonomy and the result alias used throughout the crate.

use std::io;
use std::path::Path;
use thiserror::Error;

/// All errors that can abort a generation run.
///
/// None of these are caught or retried internally: the first one raised
/// stops the walk and is reported by [`default_error_handler`].
#[derive(Error, Debug)]
pub enum Error {
    /// The requested template does not resolve under the source tree.
    #[error("Template '{name}' not found.")]
    TemplateNotFoundError { name: String },

    /// A hook module name has no entry in the hook registry.
    #[error("Cannot resolve module '{name}'.")]
    ModuleResolutionError { name: String },

    /// Syntax or runtime error while evaluating a template.
    #[error("Template error: {0}.")]
    TemplateEvaluationError(#[from] minijinja::Error),

    /// I/O failure on read, write, copy or mkdir.
    #[error("IO error on '{path}': {source}.")]
    FilesystemError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Invalid context file or command line configuration.
    #[error("Configuration error: {0}.")]
    ConfigError(String),
}

impl Error {
    /// Wraps an I/O error with the path it happened on.
    pub fn fs<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Error::FilesystemError { path: path.as_ref().display().to_string(), source }
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
        Error::FilesystemError { path, source: err.into() }
    }
}

/// Lets filters and globals written against this crate raise engine errors.
impl From<Error> for minijinja::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::TemplateNotFoundError { .. } => minijinja::ErrorKind::TemplateNotFound,
            _ => minijinja::ErrorKind::InvalidOperation,
        };
        minijinja::Error::new(kind, err.to_string()).with_source(err)
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// Prints the error message to stderr and exits with status code 1.
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
