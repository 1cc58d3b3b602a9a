//! Adapters shipped with the Quarry binary.
//!
//! Each built-in adapter declares its command-line options and produces a
//! [`ConnectionPlan`] describing what it will open. Connectivity itself lives
//! in the engine-specific drivers.

pub mod duckdb;
mod plan;
pub mod sqlite;

use std::sync::Arc;

pub use plan::ConnectionPlan;

use crate::StaticPluginSource;

/// Key of the adapter used when none is selected.
pub const DEFAULT_ADAPTER: &str = duckdb::KEY;

/// Plugin source listing every built-in adapter.
pub fn source() -> StaticPluginSource {
    StaticPluginSource::new()
        .register_factory(duckdb::KEY, Arc::new(duckdb::DuckDbFactory))
        .register_factory(sqlite::KEY, Arc::new(sqlite::SqliteFactory))
        .with_default(DEFAULT_ADAPTER)
}
