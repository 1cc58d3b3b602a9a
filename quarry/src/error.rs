use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use quarry_adapters::{AdapterError, RegistryError};
use quarry_options::InvalidValue;
use quarry_resolve::ParseError;
use thiserror::Error;

/// Errors raised while reading the config file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file '{}'", .path.display())]
    #[diagnostic(
        code(quarry::config_io),
        help("check --config-path or the QUARRY_CONFIG_PATH environment variable")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{filename}'")]
    #[diagnostic(code(quarry::config_parse))]
    Parse {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown option '{key}' in {section}")]
    #[diagnostic(
        code(quarry::config_unknown_option),
        help("keys name options without the leading dashes, e.g. `theme` or `limit`")
    )]
    UnknownOption { key: String, section: String },

    #[error("invalid value for '{key}' in {section}: {reason}")]
    #[diagnostic(code(quarry::config_invalid_value))]
    InvalidValue {
        key: String,
        section: String,
        reason: InvalidValue,
    },

    #[error("'{key}' in {section} must be a string, integer or boolean, found {found}")]
    #[diagnostic(code(quarry::config_unsupported_value))]
    UnsupportedValue {
        key: String,
        section: String,
        found: String,
    },
}

impl ConfigError {
    /// Create a parse error pointing into `content`.
    pub fn parse(content: &str, filename: &str, source: toml::de::Error) -> Self {
        let span = source.span().map(SourceSpan::from);
        ConfigError::Parse {
            filename: filename.to_string(),
            src: NamedSource::new(filename, content.to_string()),
            span,
            source,
        }
    }
}

/// How a failed invocation is classified for the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Broken installation or config file.
    Configuration,
    /// Adapter discovery failed.
    Discovery,
    /// The command line itself is wrong.
    Usage,
    /// The selected adapter rejected its arguments.
    Adapter,
}

/// Any failure between reading argv and starting the application.
#[derive(Debug, Error, Diagnostic)]
pub enum DispatchError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Adapter(#[from] AdapterError),

    #[error(
        "cannot tell which adapter is selected: read with the '{selected}' options, the command line names '{named}'"
    )]
    #[diagnostic(
        code(quarry::ambiguous_adapter),
        help("pass adapter option values with `--name=value` or put `-a` first")
    )]
    AmbiguousAdapter { selected: String, named: String },

    #[error("argument '{lossy}' is not valid UTF-8")]
    #[diagnostic(code(quarry::malformed_argument))]
    MalformedArgument { lossy: String },
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::Registry(RegistryError::UnknownAdapter { .. }) => ErrorKind::Usage,
            DispatchError::Registry(_) => ErrorKind::Discovery,
            DispatchError::Parse(err) if err.is_usage() => ErrorKind::Usage,
            DispatchError::Parse(_) | DispatchError::Config(_) => ErrorKind::Configuration,
            DispatchError::Adapter(_) => ErrorKind::Adapter,
            DispatchError::AmbiguousAdapter { .. } | DispatchError::MalformedArgument { .. } => {
                ErrorKind::Usage
            }
        }
    }

    /// `2` for usage errors, `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Usage => 2,
            ErrorKind::Configuration | ErrorKind::Discovery | ErrorKind::Adapter => 1,
        }
    }
}
