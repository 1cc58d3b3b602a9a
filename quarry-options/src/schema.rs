use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Integer, InvalidValue, OptionValue};

/// How raw text is coerced for an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Int,
    /// Presence toggle: `false` unless the flag appears, consumes no argument.
    Bool,
    Path,
    Enum,
}

impl ValueKind {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Int => "int",
            ValueKind::Bool => "bool",
            ValueKind::Path => "path",
            ValueKind::Enum => "enum",
        }
    }

    /// Placeholder shown in help output for value-taking options.
    pub fn metavar(&self) -> &'static str {
        match self {
            ValueKind::String | ValueKind::Enum => "TEXT",
            ValueKind::Int => "INTEGER",
            ValueKind::Bool => "BOOLEAN",
            ValueKind::Path => "PATH",
        }
    }
}

/// The collaborator that consumes a resolved option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Passed to the adapter factory.
    #[default]
    Adapter,
    /// Passed to the application constructor.
    Application,
    /// Consumed by the dispatcher itself (adapter selection, help, ...).
    Dispatcher,
}

/// Declarative description of a single configurable value.
///
/// The canonical `name` is always selectable as `--<name>`; aliases add
/// further spellings (`-a`, `-init`, `--alt-name`) that must match exactly.
///
/// # Example
///
/// ```
/// use quarry_options::{OptionSchema, OptionValue, Target};
///
/// let limit = OptionSchema::int("limit")
///     .alias("-l")
///     .dest("max_results")
///     .default_value(100_000_i64)
///     .target(Target::Application);
///
/// assert_eq!(limit.validate("5000000000").unwrap(), OptionValue::from(5_000_000_000_i64));
/// assert_eq!(
///     limit.validate("99999999999999999999").unwrap().to_string(),
///     "99999999999999999999"
/// );
/// assert_eq!(limit.label(), "'-l' / '--limit'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSchema {
    name: String,
    aliases: Vec<String>,
    kind: ValueKind,
    default: OptionValue,
    allowed_values: Vec<String>,
    required: bool,
    dest: String,
    target: Target,
    overrides: Option<String>,
    help: Option<String>,
}

impl OptionSchema {
    fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        let name = name.into();
        let dest = name.replace('-', "_");
        Self {
            name,
            aliases: Vec::new(),
            kind,
            default: OptionValue::Unset,
            allowed_values: Vec::new(),
            required: false,
            dest,
            target: Target::default(),
            overrides: None,
            help: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Int)
    }

    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Path)
    }

    /// A presence toggle defaulting to `false`.
    pub fn flag(name: impl Into<String>) -> Self {
        let mut schema = Self::new(name, ValueKind::Bool);
        schema.default = OptionValue::Bool(false);
        schema
    }

    /// An enum matched case-insensitively against `values`.
    pub fn choice<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::new(name, ValueKind::Enum);
        schema.allowed_values = values.into_iter().map(Into::into).collect();
        schema
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn default_value(mut self, value: impl Into<OptionValue>) -> Self {
        self.default = value.into();
        self
    }

    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = dest.into();
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// When this toggle is set, the option stored under `dest` is reset to
    /// [`OptionValue::Unset`] regardless of what was supplied for it.
    pub fn overrides(mut self, dest: impl Into<String>) -> Self {
        self.overrides = Some(dest.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Copy of this schema with a replaced default.
    pub fn with_default(&self, value: OptionValue) -> Self {
        let mut schema = self.clone();
        schema.default = value;
        schema
    }

    /// Copy of this schema consumed by `target`.
    pub fn retarget(&self, target: Target) -> Self {
        let mut schema = self.clone();
        schema.target = target;
        schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_list(&self) -> &[String] {
        &self.aliases
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn default(&self) -> &OptionValue {
        &self.default
    }

    pub fn allowed_values(&self) -> &[String] {
        &self.allowed_values
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn dest_key(&self) -> &str {
        &self.dest
    }

    pub fn target_kind(&self) -> Target {
        self.target
    }

    pub fn overridden(&self) -> Option<&str> {
        self.overrides.as_deref()
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Whether the flag consumes an argument.
    pub fn takes_value(&self) -> bool {
        self.kind != ValueKind::Bool
    }

    /// The canonical long spelling, `--<name>`.
    pub fn long(&self) -> String {
        format!("--{}", self.name)
    }

    /// Every spelling selecting this option, in display order: single-character
    /// short flags first, then `--<name>`, then the remaining aliases.
    pub fn spellings(&self) -> Vec<String> {
        let long = self.long();
        let mut spellings: Vec<String> = self
            .aliases
            .iter()
            .filter(|alias| is_short(alias))
            .cloned()
            .collect();
        spellings.push(long.clone());
        spellings.extend(
            self.aliases
                .iter()
                .filter(|alias| !is_short(alias) && **alias != long)
                .cloned(),
        );
        spellings
    }

    /// Display label used in error messages, e.g. `'-i' / '--init-path' / '-init'`.
    pub fn label(&self) -> String {
        self.spellings()
            .iter()
            .map(|s| format!("'{}'", s))
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Value stored when the flag appears without an argument.
    pub fn presence(&self) -> OptionValue {
        OptionValue::Bool(true)
    }

    /// Coerce raw command-line text into a typed value.
    pub fn validate(&self, raw: &str) -> Result<OptionValue, InvalidValue> {
        match self.kind {
            ValueKind::String => Ok(OptionValue::Str(raw.to_string())),
            ValueKind::Int => raw.parse::<Integer>().map(OptionValue::Int),
            ValueKind::Bool => parse_bool(raw)
                .map(OptionValue::Bool)
                .ok_or_else(|| InvalidValue::NotABoolean {
                    raw: raw.to_string(),
                }),
            ValueKind::Path if raw.is_empty() => Err(InvalidValue::EmptyPath),
            ValueKind::Path => Ok(OptionValue::Path(PathBuf::from(raw))),
            ValueKind::Enum => {
                let folded = raw.to_lowercase();
                self.allowed_values
                    .iter()
                    .find(|allowed| allowed.to_lowercase() == folded)
                    .map(|allowed| OptionValue::Choice(allowed.clone()))
                    .ok_or_else(|| InvalidValue::NotAChoice {
                        raw: raw.to_string(),
                        choices: self.allowed_values.clone(),
                    })
            }
        }
    }
}

/// A single dash followed by exactly one character, e.g. `-a`.
pub(crate) fn is_short(spelling: &str) -> bool {
    let mut chars = spelling.chars();
    chars.next() == Some('-')
        && chars.next().is_some_and(|c| c != '-')
        && chars.next().is_none()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dest_defaults_to_snake_case_name() {
        let schema = OptionSchema::path("init-path");
        assert_eq!(schema.dest_key(), "init_path");
        assert_eq!(OptionSchema::int("limit").dest("max_results").dest_key(), "max_results");
    }

    #[test]
    fn test_flag_defaults_to_false() {
        let schema = OptionSchema::flag("no-init");
        assert_eq!(schema.default(), &OptionValue::Bool(false));
        assert!(!schema.takes_value());
        assert_eq!(schema.presence(), OptionValue::Bool(true));
    }

    #[test]
    fn test_int_accepts_any_magnitude() {
        let schema = OptionSchema::int("limit");
        assert_eq!(schema.validate("0").unwrap(), OptionValue::from(0_i64));
        assert_eq!(
            schema.validate("5000000000").unwrap(),
            OptionValue::from(5_000_000_000_i64)
        );
        assert_eq!(schema.validate("-3").unwrap(), OptionValue::from(-3_i64));

        let big = schema.validate("99999999999999999999").unwrap();
        assert_eq!(big.to_string(), "99999999999999999999");
        assert!(big.as_int().is_none());
    }

    #[test]
    fn test_int_rejects_text() {
        let err = OptionSchema::int("limit").validate("ten").unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"'ten' is not a valid integer.");
    }

    #[test]
    fn test_choice_canonicalizes_casing() {
        let schema = OptionSchema::choice("journal-mode", ["WAL", "DELETE"]);
        assert_eq!(
            schema.validate("wal").unwrap(),
            OptionValue::Choice("WAL".to_string())
        );
        assert_eq!(
            schema.validate("Delete").unwrap(),
            OptionValue::Choice("DELETE".to_string())
        );
        assert!(matches!(
            schema.validate("memory"),
            Err(InvalidValue::NotAChoice { .. })
        ));
    }

    #[test]
    fn test_bool_explicit_values() {
        let schema = OptionSchema::flag("read-only");
        assert_eq!(schema.validate("YES").unwrap(), OptionValue::Bool(true));
        assert_eq!(schema.validate("off").unwrap(), OptionValue::Bool(false));
        assert!(schema.validate("maybe").is_err());
    }

    #[test]
    fn test_empty_path_rejected() {
        assert_eq!(
            OptionSchema::path("init-path").validate(""),
            Err(InvalidValue::EmptyPath)
        );
    }

    #[test]
    fn test_spellings_put_short_flags_first() {
        let schema = OptionSchema::path("init-path").aliases(["-init", "-i"]);
        assert_eq!(schema.spellings(), vec!["-i", "--init-path", "-init"]);
        assert_eq!(schema.label(), "'-i' / '--init-path' / '-init'");
    }

    #[test]
    fn test_label_for_long_only_option() {
        assert_eq!(OptionSchema::flag("no-init").label(), "'--no-init'");
    }

    #[test]
    fn test_is_short() {
        assert!(is_short("-a"));
        assert!(!is_short("--"));
        assert!(!is_short("-init"));
        assert!(!is_short("--adapter"));
        assert!(!is_short("a"));
    }

    mod props {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn choice_matches_in_any_casing(mask in proptest::collection::vec(any::<bool>(), 6)) {
                let schema = OptionSchema::choice("adapter", ["duckdb", "sqlite"]);
                let raw: String = "duckdb"
                    .chars()
                    .zip(mask)
                    .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
                    .collect();
                prop_assert_eq!(
                    schema.validate(&raw).unwrap(),
                    OptionValue::Choice("duckdb".to_string())
                );
            }

            #[test]
            fn int_round_trips_every_i64(n in any::<i64>()) {
                let schema = OptionSchema::int("limit");
                prop_assert_eq!(schema.validate(&n.to_string()).unwrap(), OptionValue::from(n));
            }

            #[test]
            fn int_keeps_long_digit_strings(digits in "-?[1-9][0-9]{0,60}") {
                let schema = OptionSchema::int("limit");
                prop_assert_eq!(schema.validate(&digits).unwrap().to_string(), digits);
            }
        }
    }
}
