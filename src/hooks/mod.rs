//! Hook modules configuring the template environment before generation.
//!
//! A hook module is looked up by name in a [`HookRegistry`]. It is either a
//! hook function receiving the generator and an optional subparameter, or a
//! [`ModuleGlobal`] that is handed to templates as a single named value.

use indexmap::IndexMap;
use minijinja::value::{Enumerator, Object, Value};
use minijinja::{ErrorKind, State};
use std::fmt;
use std::sync::Arc;

use crate::constants::{PATHUTIL_MODULE, STDLIB_HOOK};
use crate::error::{Error, Result};
use crate::generator::Generator;

pub mod pathutil;
pub mod stdlib;

/// Hook entry point: mutates the generator's environment.
pub type HookFn = Arc<dyn Fn(&mut Generator, Option<&str>) -> Result<()> + Send + Sync>;

/// A resolvable unit in the registry.
#[derive(Clone)]
pub enum HookUnit {
    /// Unit exposing a hook entry point.
    Hook(HookFn),
    /// Unit without an entry point, exposed as a global.
    Module(Arc<ModuleGlobal>),
}

/// A `-m MODULE[:SUBPARAM]` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequest {
    pub name: String,
    pub subparam: Option<String>,
}

impl ModuleRequest {
    /// Splits once on the first `:`.
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((name, subparam)) => {
                Self { name: name.to_string(), subparam: Some(subparam.to_string()) }
            }
            None => Self { name: s.to_string(), subparam: None },
        }
    }
}

/// Maps module names to hook units.
#[derive(Clone, Default)]
pub struct HookRegistry {
    units: IndexMap<String, HookUnit>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.units.keys()).finish()
    }
}

impl HookRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the units shipped with jinjagen.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_hook(STDLIB_HOOK, stdlib::jinjagen_hook);
        registry.register_module(PATHUTIL_MODULE, pathutil::module());
        registry
    }

    /// Registers a hook function, replacing any unit with the same name.
    pub fn register_hook<S, F>(&mut self, name: S, hook: F)
    where
        S: Into<String>,
        F: Fn(&mut Generator, Option<&str>) -> Result<()> + Send + Sync + 'static,
    {
        self.units.insert(name.into(), HookUnit::Hook(Arc::new(hook)));
    }

    /// Registers a module exposed to templates as a global.
    pub fn register_module<S: Into<String>>(&mut self, name: S, module: ModuleGlobal) {
        self.units.insert(name.into(), HookUnit::Module(Arc::new(module)));
    }

    /// Looks up a unit by name.
    ///
    /// # Errors
    /// * `Error::ModuleResolutionError` if nothing is registered as `name`
    pub fn resolve(&self, name: &str) -> Result<&HookUnit> {
        self.units
            .get(name)
            .ok_or_else(|| Error::ModuleResolutionError { name: name.to_string() })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }
}

/// A named set of template-callable members, seen by templates as one object.
///
/// `{{ pathutil.basename(this.path) }}` looks up `basename` and calls it.
#[derive(Debug, Clone)]
pub struct ModuleGlobal {
    name: String,
    members: IndexMap<String, Value>,
}

impl ModuleGlobal {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), members: IndexMap::new() }
    }

    /// Adds a member, usually a `Value::from_function`.
    pub fn with_member<S: Into<String>>(mut self, name: S, value: Value) -> Self {
        self.members.insert(name.into(), value);
        self
    }
}

impl Object for ModuleGlobal {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        self.members.get(key.as_str()?).cloned()
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Values(self.members.keys().map(|k| Value::from(k.as_str())).collect())
    }

    fn call_method(
        self: &Arc<Self>,
        state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> std::result::Result<Value, minijinja::Error> {
        match self.members.get(method) {
            Some(member) => member.call(state, args),
            None => Err(minijinja::Error::new(
                ErrorKind::UnknownMethod,
                format!("module '{}' has no member '{}'", self.name, method),
            )),
        }
    }
}
