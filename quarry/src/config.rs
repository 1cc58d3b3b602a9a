//! Option defaults read from a TOML file.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use indexmap::IndexMap;
use quarry_options::{OptionSchema, OptionValue, ValueKind};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::ConfigError,
    options::{ADAPTER, COMMAND_LINE_ONLY},
};

/// Environment variable naming a config file when `--config-path` is absent.
pub const CONFIG_PATH_ENV: &str = "QUARRY_CONFIG_PATH";

/// Parsed config file.
///
/// ```toml
/// adapter = "sqlite"
/// theme = "one-dark"
/// limit = 500
///
/// [adapters.duckdb]
/// read-only = true
/// ```
///
/// Top-level keys name global options; `[adapters.<key>]` tables hold
/// defaults for one adapter's options. Keys match an option's canonical name
/// or the argument key it stores under.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub adapters: IndexMap<String, IndexMap<String, toml::Value>>,
    #[serde(flatten)]
    pub options: IndexMap<String, toml::Value>,
    /// Directory relative paths in the file resolve against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, "quarry.toml")
    }
}

impl Config {
    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content, &path.display().to_string())?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn parse(content: &str, filename: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::parse(content, filename, source))
    }

    /// The adapter key set by the file, if any.
    pub fn adapter(&self) -> Option<&str> {
        self.options.get(ADAPTER).and_then(toml::Value::as_str)
    }

    /// Global options with defaults replaced by values from the file.
    pub fn apply_globals(&self, globals: &[OptionSchema]) -> Result<Vec<OptionSchema>, ConfigError> {
        self.apply(globals, &self.options, "the config file", true)
    }

    /// `key`'s options with defaults replaced by its `[adapters.<key>]` table.
    ///
    /// The table name matches case-insensitively.
    pub fn apply_adapter(
        &self,
        key: &str,
        options: &[OptionSchema],
    ) -> Result<Vec<OptionSchema>, ConfigError> {
        let table = self
            .adapters
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key));
        match table {
            Some((name, values)) => {
                self.apply(options, values, &format!("[adapters.{name}]"), false)
            }
            None => Ok(options.to_vec()),
        }
    }

    fn apply(
        &self,
        schemas: &[OptionSchema],
        values: &IndexMap<String, toml::Value>,
        section: &str,
        global: bool,
    ) -> Result<Vec<OptionSchema>, ConfigError> {
        let mut schemas = schemas.to_vec();
        for (key, value) in values {
            let index = schemas
                .iter()
                .position(|s| {
                    (s.name().eq_ignore_ascii_case(key) || s.dest_key() == key)
                        && !(global && COMMAND_LINE_ONLY.contains(&s.name()))
                })
                .ok_or_else(|| ConfigError::UnknownOption {
                    key: key.clone(),
                    section: section.to_string(),
                })?;

            let raw = raw_value(value).ok_or_else(|| ConfigError::UnsupportedValue {
                key: key.clone(),
                section: section.to_string(),
                found: value.type_str().to_string(),
            })?;
            let schema = &schemas[index];
            let parsed = schema
                .validate(&raw)
                .map_err(|reason| ConfigError::InvalidValue {
                    key: key.clone(),
                    section: section.to_string(),
                    reason,
                })?;
            let parsed = match (parsed, &self.base_dir) {
                (OptionValue::Path(path), Some(base)) if schema.kind() == ValueKind::Path => {
                    OptionValue::Path(base.join(path))
                }
                (parsed, _) => parsed,
            };
            debug!(option = schema.name(), value = %parsed, "default from config file");
            schemas[index] = schema.with_default(parsed);
        }
        Ok(schemas)
    }
}

/// Config scalars are fed through the same coercion as command-line text.
fn raw_value(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use quarry_options::OptionValue;

    use super::*;
    use crate::options::global_options;

    fn globals() -> Vec<OptionSchema> {
        global_options(&["duckdb", "sqlite"])
    }

    fn default_of<'a>(schemas: &'a [OptionSchema], name: &str) -> &'a OptionValue {
        schemas
            .iter()
            .find(|s| s.name() == name)
            .map(OptionSchema::default)
            .unwrap()
    }

    // ==========================================================================
    // Parsing
    // ==========================================================================

    #[test]
    fn test_parse_globals_and_adapter_tables() {
        let config: Config = r#"
            adapter = "sqlite"
            theme = "one-dark"
            limit = 500

            [adapters.sqlite]
            journal-mode = "wal"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.adapter(), Some("sqlite"));
        assert_eq!(config.options.len(), 3);
        assert_eq!(config.adapters["sqlite"].len(), 1);
    }

    #[test]
    fn test_empty_file() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.adapter(), None);
    }

    #[test]
    fn test_parse_error() {
        let err = "theme = ".parse::<Config>().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        insta::assert_snapshot!(err.to_string(), @"failed to parse config file 'quarry.toml'");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    // ==========================================================================
    // Applying defaults
    // ==========================================================================

    #[test]
    fn test_apply_globals_replaces_defaults() {
        let config: Config = "theme = \"one-dark\"\nmax_results = 500\nadapter = \"SQLite\""
            .parse()
            .unwrap();
        let schemas = config.apply_globals(&globals()).unwrap();

        assert_eq!(
            default_of(&schemas, "theme"),
            &OptionValue::Str("one-dark".to_string())
        );
        assert_eq!(default_of(&schemas, "limit"), &OptionValue::from(500_i64));
        assert_eq!(
            default_of(&schemas, "adapter"),
            &OptionValue::Choice("sqlite".to_string())
        );
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quarry.toml");
        std::fs::write(&path, "init-path = \"init.sql\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        let schemas = config.apply_globals(&globals()).unwrap();
        assert_eq!(
            default_of(&schemas, "init-path"),
            &OptionValue::Path(dir.path().join("init.sql"))
        );
    }

    #[test]
    fn test_unknown_global_key() {
        let config: Config = "colour = \"red\"".parse().unwrap();
        let err = config.apply_globals(&globals()).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"unknown option 'colour' in the config file");
    }

    #[test]
    fn test_command_line_only_keys_are_rejected() {
        for source in ["help = true", "version = true", "config-path = \"x.toml\""] {
            let config: Config = source.parse().unwrap();
            let err = config.apply_globals(&globals()).unwrap_err();
            assert!(matches!(err, ConfigError::UnknownOption { .. }), "{source}");
        }
    }

    #[test]
    fn test_invalid_value() {
        let config: Config = "limit = \"lots\"".parse().unwrap();
        let err = config.apply_globals(&globals()).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"invalid value for 'limit' in the config file: 'lots' is not a valid integer."
        );
    }

    #[test]
    fn test_unsupported_value() {
        let config: Config = "theme = [\"a\", \"b\"]".parse().unwrap();
        let err = config.apply_globals(&globals()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedValue { ref found, .. } if found == "array"));
    }

    #[test]
    fn test_apply_adapter_table_case_insensitive() {
        let config: Config = "[adapters.DuckDB]\nread-only = true".parse().unwrap();
        let options = vec![OptionSchema::flag("read-only").alias("-r")];

        let applied = config.apply_adapter("duckdb", &options).unwrap();
        assert_eq!(default_of(&applied, "read-only"), &OptionValue::Bool(true));

        let untouched = config.apply_adapter("sqlite", &options).unwrap();
        assert_eq!(untouched, options);
    }

    #[test]
    fn test_adapter_table_rejects_unknown_option() {
        let config: Config = "[adapters.duckdb]\nnope = 1".parse().unwrap();
        let err = config
            .apply_adapter("duckdb", &[OptionSchema::flag("read-only")])
            .unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"unknown option 'nope' in [adapters.duckdb]");
    }
}
