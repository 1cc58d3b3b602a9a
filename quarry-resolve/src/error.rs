use miette::Diagnostic;
use quarry_options::{CollisionError, InvalidValue};
use thiserror::Error;

/// Errors raised while resolving a command line.
///
/// Every variant except [`ParseError::Collision`] is a usage error: the user
/// can fix it by changing the arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    #[error("No such option: {flag}")]
    #[diagnostic(code(quarry::unrecognized_option))]
    UnrecognizedOption { flag: String },

    #[error("Option '{flag}' requires an argument.")]
    #[diagnostic(code(quarry::missing_value))]
    MissingValue { flag: String },

    #[error("Invalid value for {label}: {reason}")]
    #[diagnostic(code(quarry::invalid_value))]
    InvalidOptionValue {
        /// Canonical option name.
        name: String,
        /// Quoted spellings, e.g. `'-a' / '--adapter'`.
        label: String,
        raw_value: String,
        #[source]
        reason: InvalidValue,
    },

    #[error("Missing option {label}.")]
    #[diagnostic(code(quarry::missing_option))]
    MissingOption { name: String, label: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Collision(#[from] CollisionError),
}

impl ParseError {
    /// Whether re-invoking with different arguments can fix this error.
    pub fn is_usage(&self) -> bool {
        !matches!(self, ParseError::Collision(_))
    }
}
