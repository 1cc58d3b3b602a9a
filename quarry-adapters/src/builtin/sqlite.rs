use quarry_options::{Integer, OptionSchema};

use super::ConnectionPlan;
use crate::{Adapter, AdapterArgs, AdapterError, AdapterFactory};

pub const KEY: &str = "sqlite";

/// Journal modes accepted by `--journal-mode`.
pub const JOURNAL_MODES: [&str; 6] = ["WAL", "DELETE", "TRUNCATE", "PERSIST", "MEMORY", "OFF"];

const MEMORY_TARGET: &str = ":memory:";

/// Options contributed by the SQLite adapter.
pub fn options() -> Vec<OptionSchema> {
    vec![
        OptionSchema::flag("read-only")
            .alias("-r")
            .help("Open the database file in read-only mode."),
        OptionSchema::choice("journal-mode", JOURNAL_MODES)
            .help("Journal mode applied on connect (case-insensitive)."),
        OptionSchema::int("busy-timeout")
            .default_value(5_000_i64)
            .help("Milliseconds to wait on a locked database."),
    ]
}

/// Factory for the SQLite adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteFactory;

impl AdapterFactory for SqliteFactory {
    fn options(&self) -> Vec<OptionSchema> {
        options()
    }

    fn create(&self, args: AdapterArgs) -> Result<Box<dyn Adapter>, AdapterError> {
        if args.integer("busy_timeout").is_some_and(Integer::is_negative) {
            return Err(AdapterError::invalid_option(
                KEY,
                "--busy-timeout",
                "must not be negative",
            ));
        }
        let in_memory = args.conn_str.is_empty() || args.conn_str.iter().any(|t| t == MEMORY_TARGET);
        if args.flag("read_only") && in_memory {
            return Err(AdapterError::rejected(
                KEY,
                "an in-memory database cannot be opened read-only",
            ));
        }
        Ok(Box::new(ConnectionPlan::new(KEY, args)))
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use quarry_options::OptionValue;

    use super::*;

    fn create(conn_str: &[&str], options: &[(&str, OptionValue)]) -> Result<Box<dyn Adapter>, AdapterError> {
        let options: IndexMap<String, OptionValue> = options
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        SqliteFactory.create(AdapterArgs::new(
            conn_str.iter().map(|s| s.to_string()).collect(),
            options,
        ))
    }

    #[test]
    fn test_journal_mode_is_case_insensitive() {
        let journal = options().into_iter().find(|o| o.name() == "journal-mode").unwrap();
        assert_eq!(
            journal.validate("wal").unwrap(),
            OptionValue::Choice("WAL".to_string())
        );
    }

    #[test]
    fn test_read_only_memory_rejected() {
        let err = create(&[":memory:"], &[("read_only", OptionValue::Bool(true))]).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"sqlite: an in-memory database cannot be opened read-only");
        assert!(create(&[], &[("read_only", OptionValue::Bool(true))]).is_err());
    }

    #[test]
    fn test_read_only_file_accepted() {
        let adapter = create(&["app.db"], &[("read_only", OptionValue::Bool(true))]).unwrap();
        assert_eq!(adapter.key(), "sqlite");
    }

    #[test]
    fn test_negative_busy_timeout_rejected() {
        let err = create(&["app.db"], &[("busy_timeout", OptionValue::from(-1_i64))]).unwrap_err();
        assert!(matches!(err, AdapterError::InvalidOption { .. }));
    }

    #[test]
    fn test_huge_busy_timeout_accepted() {
        let huge = OptionValue::Int("99999999999999999999".parse().unwrap());
        let adapter = create(&["app.db"], &[("busy_timeout", huge)]).unwrap();
        assert_eq!(adapter.summary(), "sqlite -> app.db busy_timeout=99999999999999999999");
    }
}
