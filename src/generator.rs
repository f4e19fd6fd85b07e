//! The generator core: owns the template environment and renders single templates.

use indexmap::IndexMap;
use log::debug;
use minijinja::value::Value;
use minijinja::{context, AutoEscape, Environment, ErrorKind, Template};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::TEMPLATE_SUFFIX;
use crate::error::{Error, Result};
use crate::hooks::{HookRegistry, HookUnit, ModuleGlobal, ModuleRequest};
use crate::source::TemplateSource;

/// Mapping passed into every render. The walker only ever sets the `this` key.
pub type Context = IndexMap<String, Value>;

/// Renders templates found under a source root.
///
/// The environment is configured once by the builder and by hook modules,
/// then stays untouched while the site is rendered.
pub struct Generator {
    source: Arc<TemplateSource>,
    env: Environment<'static>,
    registry: HookRegistry,
    suffix: String,
}

/// Builder for [`Generator`].
pub struct GeneratorBuilder {
    root: PathBuf,
    suffix: String,
    keep_trailing_newline: bool,
    registry: HookRegistry,
    modules: Vec<ModuleRequest>,
}

impl GeneratorBuilder {
    fn new(root: PathBuf) -> Self {
        Self {
            root,
            suffix: TEMPLATE_SUFFIX.to_string(),
            keep_trailing_newline: false,
            registry: HookRegistry::builtin(),
            modules: Vec::new(),
        }
    }

    /// Suffix marking files to render instead of copy.
    pub fn template_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn keep_trailing_newline(mut self, yes: bool) -> Self {
        self.keep_trailing_newline = yes;
        self
    }

    /// Replaces the registry hook module names are resolved against.
    pub fn registry(mut self, registry: HookRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Queues a hook module; modules are applied in the order they were added.
    pub fn module(mut self, request: ModuleRequest) -> Self {
        self.modules.push(request);
        self
    }

    pub fn modules<I: IntoIterator<Item = ModuleRequest>>(mut self, requests: I) -> Self {
        self.modules.extend(requests);
        self
    }

    /// Creates the environment and applies all queued hook modules.
    ///
    /// # Errors
    /// * `Error::FilesystemError` if the source root is not a directory
    /// * `Error::ModuleResolutionError` if a queued module is unknown
    /// * Any error raised by a hook
    pub fn build(self) -> Result<Generator> {
        let source = Arc::new(TemplateSource::new(&self.root)?);

        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(self.keep_trailing_newline);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let loader_source = Arc::clone(&source);
        env.set_loader(move |name| loader_source.get_source(name).map_err(Into::into));

        let mut generator =
            Generator { source, env, registry: self.registry, suffix: self.suffix };
        for request in &self.modules {
            generator.hook_module(&request.name, request.subparam.as_deref())?;
        }
        Ok(generator)
    }
}

impl Generator {
    /// Generator over `root` with default settings and the built-in hook registry.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::builder(root).build()
    }

    pub fn builder<P: AsRef<Path>>(root: P) -> GeneratorBuilder {
        GeneratorBuilder::new(root.as_ref().to_path_buf())
    }

    pub fn source(&self) -> Arc<TemplateSource> {
        Arc::clone(&self.source)
    }

    pub fn template_suffix(&self) -> &str {
        &self.suffix
    }

    /// Mutable access for hooks registering filters and globals.
    pub fn env_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Renders `template` with `ctx`, streaming the output into `dest`.
    ///
    /// The destination file is created or truncated; its directory must exist.
    ///
    /// # Errors
    /// * `Error::TemplateNotFoundError` if the template does not exist
    /// * `Error::TemplateEvaluationError` on syntax or runtime errors
    /// * `Error::FilesystemError` if `dest` cannot be written
    pub fn render_file<S: Serialize>(&self, template: &str, dest: &Path, ctx: S) -> Result<()> {
        let tmpl = self.env.get_template(template).map_err(|e| lookup_error(template, e))?;

        let file = File::create(dest).map_err(|e| Error::fs(dest, e))?;
        let mut writer = BufWriter::new(file);
        tmpl.render_to_write(ctx, &mut writer).map_err(|e| match e.kind() {
            ErrorKind::WriteFailure => Error::fs(dest, io::Error::other(e.to_string())),
            _ => Error::TemplateEvaluationError(e),
        })?;
        writer.flush().map_err(|e| Error::fs(dest, e))
    }

    /// Applies the hook module registered as `name`.
    ///
    /// Hook units receive the generator and `subparam`; module units are
    /// exposed to templates as a global called `name`.
    ///
    /// # Errors
    /// * `Error::ModuleResolutionError` if `name` is not registered
    pub fn hook_module(&mut self, name: &str, subparam: Option<&str>) -> Result<()> {
        let unit = self.registry.resolve(name)?.clone();
        match unit {
            HookUnit::Hook(hook) => {
                debug!("Running hook '{}' with {:?}", name, subparam);
                hook(self, subparam)
            }
            HookUnit::Module(module) => {
                debug!("Exposing module '{}' as a global", name);
                let global = Value::from_object(ModuleGlobal::clone(&module));
                self.env.add_global(name.to_string(), global);
                Ok(())
            }
        }
    }

    /// Evaluates `name` without producing output and returns its top-level
    /// variables and macros.
    pub fn get_exported(&self, name: &str) -> Result<IndexMap<String, Value>> {
        let tmpl = self.env.get_template(name).map_err(|e| lookup_error(name, e))?;
        Ok(exports_of(&tmpl)?)
    }

    /// Renderable templates whose identifier starts with `prefix`.
    pub fn list_gen_templates(&self, prefix: &str) -> Result<Vec<String>> {
        gen_templates(&self.source, &self.suffix, prefix)
    }
}

pub(crate) fn exports_of(
    tmpl: &Template<'_, '_>,
) -> std::result::Result<IndexMap<String, Value>, minijinja::Error> {
    let state = tmpl.eval_to_state(context! {})?;
    let exports = state
        .exports()
        .into_iter()
        .filter_map(|name| state.lookup(name).map(|value| (name.to_string(), value)))
        .collect();
    Ok(exports)
}

pub(crate) fn gen_templates(
    source: &TemplateSource,
    suffix: &str,
    prefix: &str,
) -> Result<Vec<String>> {
    Ok(source
        .list_templates(prefix)?
        .into_iter()
        .filter(|name| name.ends_with(suffix))
        .collect())
}

fn lookup_error(name: &str, err: minijinja::Error) -> Error {
    match err.kind() {
        ErrorKind::TemplateNotFound => Error::TemplateNotFoundError { name: name.to_string() },
        _ => Error::TemplateEvaluationError(err),
    }
}
