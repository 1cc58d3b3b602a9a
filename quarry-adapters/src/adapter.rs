use std::{fmt, path::Path};

use indexmap::IndexMap;
use quarry_options::{Integer, OptionSchema, OptionValue};

use crate::AdapterError;

/// Argument key of the init-script path passed to every adapter.
pub const INIT_PATH: &str = "init_path";
/// Argument key of the "skip init script" toggle passed to every adapter.
pub const NO_INIT: &str = "no_init";

/// Resolved constructor arguments for an adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterArgs {
    /// Positional connection targets, in the order they were given.
    pub conn_str: Vec<String>,
    /// Adapter-scoped options keyed by argument key (`init_path`, `read_only`, ...).
    pub options: IndexMap<String, OptionValue>,
}

impl AdapterArgs {
    pub fn new(conn_str: Vec<String>, options: IndexMap<String, OptionValue>) -> Self {
        Self { conn_str, options }
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// Absolute path of the init script, unless none was given or `no_init` is set.
    pub fn init_path(&self) -> Option<&Path> {
        self.get(INIT_PATH).and_then(OptionValue::as_path)
    }

    pub fn no_init(&self) -> bool {
        self.flag(NO_INIT)
    }

    /// Value of a presence toggle; absent keys read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(OptionValue::as_bool).unwrap_or(false)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    pub fn integer(&self, key: &str) -> Option<&Integer> {
        self.get(key).and_then(OptionValue::as_integer)
    }
}

/// A constructed adapter instance.
///
/// Connection handling and query execution live behind this trait and are
/// not the command line's concern.
pub trait Adapter: fmt::Debug + Send {
    /// Registry key of the adapter that produced this instance.
    fn key(&self) -> &str;

    /// Connection targets the adapter will open, in order.
    fn connection_targets(&self) -> &[String];

    /// One-line human readable description of what will be opened.
    fn summary(&self) -> String;
}

/// Capability exposed by an adapter plugin: its options and its constructor.
pub trait AdapterFactory: Send + Sync {
    /// Options this adapter contributes to the command line, in display order.
    fn options(&self) -> Vec<OptionSchema>;

    /// Construct the adapter from resolved arguments.
    fn create(&self, args: AdapterArgs) -> Result<Box<dyn Adapter>, AdapterError>;
}
