//! Plugin sources for adapter discovery.

use std::{fmt, sync::Arc};

use crate::{AdapterFactory, LoadError};

type Loader = Arc<dyn Fn() -> Result<Arc<dyn AdapterFactory>, LoadError> + Send + Sync>;

/// A discoverable adapter plugin: a name and a way to load it.
///
/// Loading is deferred until the registry is built, so a broken plugin only
/// affects itself.
#[derive(Clone)]
pub struct PluginEntry {
    name: String,
    loader: Loader,
}

impl PluginEntry {
    pub fn new<F>(name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn AdapterFactory>, LoadError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            loader: Arc::new(loader),
        }
    }

    /// Entry for an already constructed factory.
    pub fn from_factory(name: impl Into<String>, factory: Arc<dyn AdapterFactory>) -> Self {
        Self::new(name, move || Ok(factory.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn load(&self) -> Result<Arc<dyn AdapterFactory>, LoadError> {
        (self.loader)()
    }
}

impl fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Where adapter plugins come from.
///
/// The registry only depends on this trait; a static table, a config-driven
/// list or a dynamic loader can all implement it.
pub trait PluginSource {
    /// Enumerate installed plugins.
    fn entries(&self) -> Vec<PluginEntry>;

    /// Key of the adapter to use when the user names none.
    fn default_adapter(&self) -> Option<&str> {
        None
    }
}

/// A fixed list of plugins registered in code.
///
/// # Example
///
/// ```ignore
/// let source = StaticPluginSource::new()
///     .register_factory("duckdb", Arc::new(DuckDbFactory))
///     .with_default("duckdb");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticPluginSource {
    entries: Vec<PluginEntry>,
    default: Option<String>,
}

impl StaticPluginSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, entry: PluginEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn register_factory(self, name: impl Into<String>, factory: Arc<dyn AdapterFactory>) -> Self {
        self.register(PluginEntry::from_factory(name, factory))
    }

    pub fn with_default(mut self, key: impl Into<String>) -> Self {
        self.default = Some(key.into());
        self
    }
}

impl PluginSource for StaticPluginSource {
    fn entries(&self) -> Vec<PluginEntry> {
        self.entries.clone()
    }

    fn default_adapter(&self) -> Option<&str> {
        self.default.as_deref()
    }
}
