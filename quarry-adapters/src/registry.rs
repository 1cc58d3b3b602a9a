//! The process-wide set of discovered adapters.

use std::{fmt, sync::Arc};

use quarry_options::{OptionSchema, OptionSet};
use tracing::{debug, warn};

use crate::{AdapterFactory, PluginSource, RegistryError};

/// Everything the dispatcher needs to know about one adapter.
#[derive(Clone)]
pub struct AdapterDescriptor {
    key: String,
    option_schemas: Vec<OptionSchema>,
    factory: Arc<dyn AdapterFactory>,
}

impl AdapterDescriptor {
    pub fn new(key: impl Into<String>, factory: Arc<dyn AdapterFactory>) -> Self {
        Self {
            key: key.into(),
            option_schemas: factory.options(),
            factory,
        }
    }

    /// Canonical key, as the plugin registered it.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn option_schemas(&self) -> &[OptionSchema] {
        &self.option_schemas
    }

    pub fn factory(&self) -> &dyn AdapterFactory {
        self.factory.as_ref()
    }
}

impl fmt::Debug for AdapterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterDescriptor")
            .field("key", &self.key)
            .field("option_schemas", &self.option_schemas)
            .finish_non_exhaustive()
    }
}

/// Discovered adapters, immutable once built.
#[derive(Debug, Clone)]
pub struct AdapterRegistry {
    descriptors: Vec<AdapterDescriptor>,
    default_key: Option<String>,
}

impl AdapterRegistry {
    /// Load every plugin from `source` and check its options against `reserved`.
    ///
    /// Plugins that fail to load are skipped with a warning. Duplicate keys
    /// and option collisions are configuration errors; an empty result is
    /// [`RegistryError::NoAdaptersFound`].
    pub fn discover(
        source: &dyn PluginSource,
        reserved: &[OptionSchema],
    ) -> Result<Self, RegistryError> {
        let mut descriptors: Vec<AdapterDescriptor> = Vec::new();

        for entry in source.entries() {
            let factory = match entry.load() {
                Ok(factory) => factory,
                Err(err) => {
                    warn!(plugin = entry.name(), error = %err, "skipping adapter plugin");
                    continue;
                }
            };

            if let Some(existing) = descriptors
                .iter()
                .find(|d| d.key.to_lowercase() == entry.name().to_lowercase())
            {
                return Err(RegistryError::DuplicateAdapter {
                    key: entry.name().to_string(),
                    existing: existing.key.clone(),
                });
            }

            let descriptor = AdapterDescriptor::new(entry.name(), factory);
            OptionSet::merge(reserved, descriptor.option_schemas()).map_err(|source| {
                RegistryError::Collision {
                    adapter: descriptor.key.clone(),
                    source,
                }
            })?;

            debug!(
                adapter = descriptor.key(),
                options = descriptor.option_schemas().len(),
                "registered adapter"
            );
            descriptors.push(descriptor);
        }

        if descriptors.is_empty() {
            return Err(RegistryError::NoAdaptersFound);
        }

        let default_key = source.default_adapter().and_then(|key| {
            let found = descriptors
                .iter()
                .find(|d| d.key.to_lowercase() == key.to_lowercase())
                .map(|d| d.key.clone());
            if found.is_none() {
                warn!(adapter = key, "designated default adapter was not discovered");
            }
            found
        });

        Ok(Self {
            descriptors,
            default_key,
        })
    }

    /// Case-insensitive lookup by key.
    pub fn resolve(&self, key: &str) -> Result<&AdapterDescriptor, RegistryError> {
        let folded = key.to_lowercase();
        self.descriptors
            .iter()
            .find(|d| d.key.to_lowercase() == folded)
            .ok_or_else(|| RegistryError::UnknownAdapter {
                key: key.to_string(),
                available: self.key_list(),
            })
    }

    /// The adapter to use when the user names none.
    ///
    /// This is the source's designated default when it was discovered,
    /// otherwise the only adapter if exactly one is installed.
    pub fn default(&self) -> Result<&AdapterDescriptor, RegistryError> {
        if let Some(key) = &self.default_key {
            return self.resolve(key);
        }
        match self.descriptors.as_slice() {
            [only] => Ok(only),
            _ => Err(RegistryError::NoDefaultAdapter {
                available: self.key_list(),
            }),
        }
    }

    /// Keys in discovery order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(AdapterDescriptor::key)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    fn key_list(&self) -> Vec<String> {
        self.keys().map(str::to_string).collect()
    }
}
