//! Adapter plugins for the Quarry database client.
//!
//! Adapters are discovered through a [`PluginSource`], loaded into
//! [`AdapterDescriptor`]s and kept in an [`AdapterRegistry`] for the lifetime
//! of the process. Each adapter declares its own command-line options; the
//! registry checks them against the global options when it is built.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod adapter;
pub mod builtin;
mod error;
mod plugin;
mod registry;

pub use adapter::{Adapter, AdapterArgs, AdapterFactory, INIT_PATH, NO_INIT};
pub use error::{AdapterError, LoadError, RegistryError};
pub use plugin::{PluginEntry, PluginSource, StaticPluginSource};
pub use registry::{AdapterDescriptor, AdapterRegistry};
