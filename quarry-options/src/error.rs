use miette::Diagnostic;
use thiserror::Error;

/// Two schema entries claim the same flag spelling or argument key.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("'{spelling}' of option '{incoming}' is already claimed by option '{existing}'")]
#[diagnostic(
    code(quarry::schema_collision),
    help("adapters must not shadow global options; rename '{incoming}' or drop '{spelling}'")
)]
pub struct CollisionError {
    /// The contested spelling (`-a`, `--theme`) or argument key.
    pub spelling: String,
    /// Canonical name of the option registered first.
    pub existing: String,
    /// Canonical name of the option that tried to claim it.
    pub incoming: String,
}

/// Why a raw value was rejected by an option schema.
///
/// The messages follow the wording users see after
/// `Invalid value for '<flag>':`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum InvalidValue {
    #[error("'{raw}' is not a valid integer.")]
    #[diagnostic(code(quarry::invalid_integer))]
    NotAnInteger { raw: String },

    #[error("'{raw}' is not a valid boolean.")]
    #[diagnostic(
        code(quarry::invalid_boolean),
        help("use one of: true, false, yes, no, on, off, 1, 0")
    )]
    NotABoolean { raw: String },

    #[error("{}", choice_message(.raw, .choices))]
    #[diagnostic(code(quarry::invalid_choice))]
    NotAChoice { raw: String, choices: Vec<String> },

    #[error("a path cannot be empty.")]
    #[diagnostic(code(quarry::empty_path))]
    EmptyPath,
}

fn choice_message(raw: &str, choices: &[String]) -> String {
    let quoted: Vec<String> = choices.iter().map(|c| format!("'{}'", c)).collect();
    match quoted.as_slice() {
        [single] => format!("'{}' is not {}.", raw, single),
        _ => format!("'{}' is not one of {}.", raw, quoted.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_message_lists_every_choice() {
        let err = InvalidValue::NotAChoice {
            raw: "foo".to_string(),
            choices: vec!["duckdb".to_string(), "sqlite".to_string()],
        };
        insta::assert_snapshot!(err.to_string(), @"'foo' is not one of 'duckdb', 'sqlite'.");
    }

    #[test]
    fn test_choice_message_single_choice() {
        let err = InvalidValue::NotAChoice {
            raw: "bar".to_string(),
            choices: vec!["duckdb".to_string()],
        };
        insta::assert_snapshot!(err.to_string(), @"'bar' is not 'duckdb'.");
    }

    #[test]
    fn test_collision_message() {
        let err = CollisionError {
            spelling: "-t".to_string(),
            existing: "theme".to_string(),
            incoming: "timeout".to_string(),
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"'-t' of option 'timeout' is already claimed by option 'theme'"
        );
    }
}
