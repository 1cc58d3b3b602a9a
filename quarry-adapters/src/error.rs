use miette::Diagnostic;
use quarry_options::CollisionError;
use thiserror::Error;

/// Errors raised while discovering or looking up adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RegistryError {
    #[error("no database adapters are installed")]
    #[diagnostic(
        code(quarry::no_adapters),
        help("install at least one adapter plugin, e.g. the duckdb or sqlite adapter")
    )]
    NoAdaptersFound,

    #[error("unknown adapter '{key}' ({})", available_list(.available))]
    #[diagnostic(code(quarry::unknown_adapter))]
    UnknownAdapter { key: String, available: Vec<String> },

    #[error("no default adapter is configured ({})", available_list(.available))]
    #[diagnostic(
        code(quarry::no_default_adapter),
        help("choose one with --adapter or set `adapter` in the config file")
    )]
    NoDefaultAdapter { available: Vec<String> },

    #[error("adapter '{key}' is registered more than once (already loaded as '{existing}')")]
    #[diagnostic(code(quarry::duplicate_adapter))]
    DuplicateAdapter { key: String, existing: String },

    #[error("adapter '{adapter}' declares a conflicting option")]
    #[diagnostic(code(quarry::adapter_option_collision))]
    Collision {
        adapter: String,
        #[source]
        #[diagnostic_source]
        source: CollisionError,
    },
}

fn available_list(available: &[String]) -> String {
    if available.is_empty() {
        "no adapters are installed".to_string()
    } else {
        format!("installed: {}", available.join(", "))
    }
}

/// A plugin entry could not produce its adapter factory.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("failed to load adapter plugin '{name}': {message}")]
#[diagnostic(code(quarry::plugin_load))]
pub struct LoadError {
    pub name: String,
    pub message: String,
}

impl LoadError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// An adapter rejected the arguments it was constructed with.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum AdapterError {
    #[error("{adapter}: option '{option}' {message}")]
    #[diagnostic(code(quarry::adapter_option))]
    InvalidOption {
        adapter: String,
        option: String,
        message: String,
    },

    #[error("{adapter}: {message}")]
    #[diagnostic(code(quarry::adapter_rejected))]
    Rejected { adapter: String, message: String },
}

impl AdapterError {
    pub fn invalid_option(
        adapter: impl Into<String>,
        option: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        AdapterError::InvalidOption {
            adapter: adapter.into(),
            option: option.into(),
            message: message.into(),
        }
    }

    pub fn rejected(adapter: impl Into<String>, message: impl Into<String>) -> Self {
        AdapterError::Rejected {
            adapter: adapter.into(),
            message: message.into(),
        }
    }
}
