use indexmap::IndexMap;
use quarry_options::OptionValue;
use serde::Serialize;

/// Argument key under which positional connection targets reach the adapter.
pub const CONN_STR: &str = "conn_str";

/// The validated outcome of one command line.
///
/// Maps keep schema declaration order, so resolving the same arguments twice
/// yields equal values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    /// Canonical key of the selected adapter.
    pub adapter_key: String,
    /// Constructor arguments for the adapter, including [`CONN_STR`].
    pub adapter_args: IndexMap<String, OptionValue>,
    /// Constructor arguments for the application.
    pub global_args: IndexMap<String, OptionValue>,
    /// Values consumed by the dispatcher itself.
    pub dispatch_args: IndexMap<String, OptionValue>,
    /// Positional tokens in encounter order.
    pub connection_targets: Vec<String>,
}

impl ResolvedConfig {
    pub fn adapter_arg(&self, key: &str) -> Option<&OptionValue> {
        self.adapter_args.get(key)
    }

    pub fn global_arg(&self, key: &str) -> Option<&OptionValue> {
        self.global_args.get(key)
    }

    pub fn dispatch_arg(&self, key: &str) -> Option<&OptionValue> {
        self.dispatch_args.get(key)
    }

    /// Whether a dispatcher toggle (`help`, `version`) is set.
    pub fn dispatch_flag(&self, key: &str) -> bool {
        self.dispatch_arg(key)
            .and_then(OptionValue::as_bool)
            .unwrap_or(false)
    }

    /// Adapter arguments without the positional [`CONN_STR`] entry.
    pub fn adapter_options(&self) -> IndexMap<String, OptionValue> {
        self.adapter_args
            .iter()
            .filter(|(key, _)| key.as_str() != CONN_STR)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
