use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
};

use quarry_options::{CollisionError, OptionSchema, OptionSet, OptionValue, Target};
use tracing::debug;

use crate::{
    CONN_STR, ParseError, ResolvedConfig,
    scan::{Mode, scan},
};

/// Resolves raw command lines against merged option schemas.
///
/// # Example
///
/// ```
/// use quarry_options::{OptionSchema, OptionValue, Target};
/// use quarry_resolve::Resolver;
///
/// let globals = vec![
///     OptionSchema::choice("adapter", ["duckdb"]).alias("-a").default_value(OptionValue::Choice("duckdb".into())).target(Target::Dispatcher),
///     OptionSchema::string("theme").alias("-t").default_value("monokai").target(Target::Application),
/// ];
/// let resolved = Resolver::new("/work")
///     .resolve(&[":memory:", "-t", "one-dark"], &globals, &[])
///     .unwrap();
///
/// assert_eq!(resolved.adapter_key, "duckdb");
/// assert_eq!(resolved.connection_targets, vec![":memory:"]);
/// assert_eq!(resolved.global_arg("theme"), Some(&OptionValue::Str("one-dark".into())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    cwd: PathBuf,
}

impl Resolver {
    /// Name of the option whose value selects the adapter.
    pub const SELECTOR: &'static str = "adapter";

    /// Create a resolver; relative paths resolve against `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Resolve `argv` against `global` and `adapter` schemas.
    ///
    /// Values are validated in the order they appear and the first failure
    /// aborts the resolution. A repeated option keeps its last value;
    /// unsupplied options take their default. Path values become absolute.
    ///
    /// A presence toggle that `overrides` another option resets it to
    /// [`OptionValue::Unset`], unless the toggle only came from its default
    /// while the other option was given on the command line. In that case
    /// the command line wins and the toggle is cleared instead.
    pub fn resolve<S: AsRef<str>>(
        &self,
        argv: &[S],
        global: &[OptionSchema],
        adapter: &[OptionSchema],
    ) -> Result<ResolvedConfig, ParseError> {
        let set = OptionSet::merge(global, adapter)?;
        if let Some(entry) = set.by_dest(CONN_STR) {
            return Err(ParseError::Collision(CollisionError {
                spelling: CONN_STR.to_string(),
                existing: "connection targets".to_string(),
                incoming: entry.schema().name().to_string(),
            }));
        }

        let argv: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();
        let scan = scan(&argv, &set, Mode::Strict)?;

        let mut supplied: HashMap<usize, OptionValue> = HashMap::new();
        for occurrence in &scan.occurrences {
            let schema = set.entry(occurrence.index).schema();
            let value = match occurrence.raw {
                None => schema.presence(),
                Some(raw) => {
                    schema
                        .validate(raw)
                        .map_err(|reason| ParseError::InvalidOptionValue {
                            name: schema.name().to_string(),
                            label: schema.label(),
                            raw_value: raw.to_string(),
                            reason,
                        })?
                }
            };
            supplied.insert(occurrence.index, value);
        }

        let from_cli: Vec<bool> = (0..set.len()).map(|i| supplied.contains_key(&i)).collect();
        let mut values = Vec::with_capacity(set.len());
        for (index, entry) in set.iter().enumerate() {
            let schema = entry.schema();
            let value = match supplied.remove(&index) {
                Some(value) => value,
                None if schema.is_required() && schema.default().is_unset() => {
                    return Err(ParseError::MissingOption {
                        name: schema.name().to_string(),
                        label: schema.label(),
                    });
                }
                None => schema.default().clone(),
            };
            values.push(match value {
                OptionValue::Path(path) => OptionValue::Path(absolutize(&self.cwd, &path)),
                other => other,
            });
        }

        for (index, entry) in set.iter().enumerate() {
            let Some(target) = entry.schema().overridden() else {
                continue;
            };
            if values[index] != OptionValue::Bool(true) {
                continue;
            }
            let Some(position) = set.iter().position(|e| e.schema().dest_key() == target) else {
                continue;
            };
            if from_cli[position] && !from_cli[index] {
                debug!(
                    option = entry.schema().name(),
                    kept = target,
                    "command line value beats defaulted presence flag"
                );
                values[index] = OptionValue::Bool(false);
            } else {
                debug!(
                    option = entry.schema().name(),
                    overridden = target,
                    "presence flag overrides option"
                );
                values[position] = OptionValue::Unset;
            }
        }

        let targets: Vec<String> = scan.positionals.iter().map(|s| s.to_string()).collect();
        let mut resolved = ResolvedConfig {
            connection_targets: targets.clone(),
            ..ResolvedConfig::default()
        };
        for (entry, value) in set.iter().zip(values) {
            let schema = entry.schema();
            if schema.name() == Self::SELECTOR {
                resolved.adapter_key = value.as_str().unwrap_or_default().to_string();
            }
            let args = match schema.target_kind() {
                Target::Adapter => &mut resolved.adapter_args,
                Target::Application => &mut resolved.global_args,
                Target::Dispatcher => &mut resolved.dispatch_args,
            };
            args.insert(schema.dest_key().to_string(), value);
        }
        resolved
            .adapter_args
            .insert(CONN_STR.to_string(), OptionValue::List(targets));

        debug!(
            adapter = %resolved.adapter_key,
            targets = resolved.connection_targets.len(),
            "resolved command line"
        );
        Ok(resolved)
    }

    /// The last raw value given for the option `name`, scanning leniently.
    ///
    /// Used to find the adapter (and similar dispatcher options) before
    /// resolving. Tokens are read exactly as [`Resolver::resolve`] reads them
    /// with the same schemas, so value-taking adapter flags consume their
    /// values; flags known to neither side are skipped.
    pub fn peek<S: AsRef<str>>(
        argv: &[S],
        global: &[OptionSchema],
        adapter: &[OptionSchema],
        name: &str,
    ) -> Option<String> {
        let set = OptionSet::merge(global, adapter).ok()?;
        let target = set.iter().position(|e| e.schema().name() == name)?;
        let argv: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();
        let scan = scan(&argv, &set, Mode::Lenient).ok()?;
        scan.occurrences
            .iter()
            .rev()
            .find(|o| o.index == target)
            .and_then(|o| o.raw)
            .map(str::to_string)
    }
}

/// Join `path` onto `cwd` and normalize `.` and `..` lexically.
///
/// The filesystem is not consulted; a missing file is the adapter's problem.
pub(crate) fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    const CWD: &str = "/work";

    fn globals() -> Vec<OptionSchema> {
        vec![
            OptionSchema::choice("adapter", ["duckdb", "sqlite"])
                .alias("-a")
                .default_value(OptionValue::Choice("duckdb".to_string()))
                .target(Target::Dispatcher),
            OptionSchema::path("init-path")
                .aliases(["-i", "-init"])
                .target(Target::Adapter),
            OptionSchema::flag("no-init")
                .overrides("init_path")
                .target(Target::Adapter),
            OptionSchema::string("theme")
                .alias("-t")
                .default_value("monokai")
                .target(Target::Application),
            OptionSchema::int("limit")
                .alias("-l")
                .dest("max_results")
                .default_value(100_000_i64)
                .target(Target::Application),
        ]
    }

    fn adapter_options() -> Vec<OptionSchema> {
        vec![
            OptionSchema::flag("read-only").alias("-r"),
            OptionSchema::choice("journal-mode", ["WAL", "DELETE"]),
        ]
    }

    fn resolve(line: &str) -> Result<ResolvedConfig, ParseError> {
        let argv: Vec<&str> = line.split_whitespace().collect();
        Resolver::new(CWD).resolve(&argv, &globals(), &adapter_options())
    }

    #[test]
    fn test_zero_arguments_use_defaults() {
        let resolved = resolve("").unwrap();
        assert_eq!(resolved.adapter_key, "duckdb");
        assert_eq!(
            resolved.adapter_arg(CONN_STR),
            Some(&OptionValue::List(Vec::new()))
        );
        assert_eq!(
            resolved.global_arg("max_results"),
            Some(&OptionValue::from(100_000_i64))
        );
        assert_eq!(
            resolved.global_arg("theme"),
            Some(&OptionValue::Str("monokai".to_string()))
        );
        assert_eq!(resolved.adapter_arg("init_path"), Some(&OptionValue::Unset));
        assert_eq!(resolved.adapter_arg("no_init"), Some(&OptionValue::Bool(false)));
        assert_eq!(resolved.adapter_arg("read_only"), Some(&OptionValue::Bool(false)));
    }

    #[test]
    fn test_split_by_target() {
        let resolved = resolve("").unwrap();
        let adapter: Vec<&str> = resolved.adapter_args.keys().map(String::as_str).collect();
        let global: Vec<&str> = resolved.global_args.keys().map(String::as_str).collect();
        let dispatch: Vec<&str> = resolved.dispatch_args.keys().map(String::as_str).collect();
        assert_eq!(
            adapter,
            vec!["init_path", "no_init", "read_only", "journal_mode", "conn_str"]
        );
        assert_eq!(global, vec!["theme", "max_results"]);
        assert_eq!(dispatch, vec!["adapter"]);
    }

    #[test]
    fn test_init_path_aliases_resolve_identically() {
        let expected = OptionValue::Path(PathBuf::from("/work/foo"));
        for line in ["--init-path foo", ":memory: -i foo", "-init foo"] {
            let resolved = resolve(line).unwrap();
            assert_eq!(resolved.adapter_arg("init_path"), Some(&expected), "{line}");
        }
    }

    #[test]
    fn test_no_init_wins_in_any_order() {
        for line in ["--no-init -i foo", "-i foo --no-init", "--init-path foo --no-init a.db"] {
            let resolved = resolve(line).unwrap();
            assert_eq!(resolved.adapter_arg("no_init"), Some(&OptionValue::Bool(true)));
            assert_eq!(resolved.adapter_arg("init_path"), Some(&OptionValue::Unset));
        }
    }

    #[test]
    fn test_no_init_default_yields_to_explicit_init_path() {
        let globals: Vec<OptionSchema> = globals()
            .into_iter()
            .map(|s| {
                if s.name() == "no-init" {
                    s.with_default(OptionValue::Bool(true))
                } else {
                    s
                }
            })
            .collect();
        let run = |line: &str| {
            let argv: Vec<&str> = line.split_whitespace().collect();
            Resolver::new(CWD).resolve(&argv, &globals, &[]).unwrap()
        };

        let resolved = run("-i foo");
        assert_eq!(
            resolved.adapter_arg("init_path"),
            Some(&OptionValue::Path(PathBuf::from("/work/foo")))
        );
        assert_eq!(resolved.adapter_arg("no_init"), Some(&OptionValue::Bool(false)));

        let resolved = run("");
        assert_eq!(resolved.adapter_arg("no_init"), Some(&OptionValue::Bool(true)));
        assert_eq!(resolved.adapter_arg("init_path"), Some(&OptionValue::Unset));

        let resolved = run("-i foo --no-init");
        assert_eq!(resolved.adapter_arg("no_init"), Some(&OptionValue::Bool(true)));
        assert_eq!(resolved.adapter_arg("init_path"), Some(&OptionValue::Unset));
    }

    #[test]
    fn test_limit_values_are_exact() {
        for (line, expected) in [
            ("--limit 10", "10"),
            ("-l 1000000", "1000000"),
            (":memory: -l 10", "10"),
            ("foo.db --limit 5000000000", "5000000000"),
            ("--limit 0", "0"),
            ("--limit 99999999999999999999", "99999999999999999999"),
            ("-l -99999999999999999999", "-99999999999999999999"),
        ] {
            let resolved = resolve(line).unwrap();
            let value = resolved.global_arg("max_results").unwrap();
            assert!(value.as_integer().is_some(), "{line}");
            assert_eq!(value.to_string(), expected, "{line}");
        }
    }

    #[test]
    fn test_last_occurrence_wins() {
        let resolved = resolve("-t a --theme b -l 1 --limit=2").unwrap();
        assert_eq!(
            resolved.global_arg("theme"),
            Some(&OptionValue::Str("b".to_string()))
        );
        assert_eq!(resolved.global_arg("max_results"), Some(&OptionValue::from(2_i64)));
    }

    #[test]
    fn test_adapter_key_is_canonicalized() {
        let resolved = resolve("-a SQLITE").unwrap();
        assert_eq!(resolved.adapter_key, "sqlite");
    }

    #[test]
    fn test_positionals_in_encounter_order() {
        let resolved = resolve("b.db -r a.db -- -weird").unwrap();
        assert_eq!(resolved.connection_targets, vec!["b.db", "a.db", "-weird"]);
        assert_eq!(
            resolved.adapter_arg(CONN_STR),
            Some(&OptionValue::List(vec![
                "b.db".to_string(),
                "a.db".to_string(),
                "-weird".to_string()
            ]))
        );
        assert_eq!(resolved.adapter_arg("read_only"), Some(&OptionValue::Bool(true)));
    }

    #[test]
    fn test_first_invalid_value_fails() {
        let err = resolve("-l ten -a nope").unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"Invalid value for '-l' / '--limit': 'ten' is not a valid integer."
        );
        match err {
            ParseError::InvalidOptionValue { name, raw_value, .. } => {
                assert_eq!(name, "limit");
                assert_eq!(raw_value, "ten");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_adapter_message() {
        let err = resolve("-a bar").unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"Invalid value for '-a' / '--adapter': 'bar' is not one of 'duckdb', 'sqlite'."
        );
    }

    #[test]
    fn test_unrecognized_option() {
        let err = resolve("--nope").unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"No such option: --nope");
        assert!(err.is_usage());
    }

    #[test]
    fn test_required_option_missing() {
        let globals = vec![OptionSchema::string("host").alias("-H").required()];
        let err = Resolver::new(CWD)
            .resolve(&[] as &[&str], &globals, &[])
            .unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Missing option '-H' / '--host'.");
    }

    #[test]
    fn test_collision_is_not_a_usage_error() {
        let adapter = vec![OptionSchema::string("table").alias("-t")];
        let err = Resolver::new(CWD)
            .resolve(&[] as &[&str], &globals(), &adapter)
            .unwrap_err();
        assert!(matches!(err, ParseError::Collision(_)));
        assert!(!err.is_usage());
    }

    #[test]
    fn test_adapter_option_named_conn_str_collides() {
        let adapter = vec![OptionSchema::string("conn-str")];
        let err = Resolver::new(CWD)
            .resolve(&[] as &[&str], &globals(), &adapter)
            .unwrap_err();
        assert!(matches!(err, ParseError::Collision(_)));
    }

    #[test]
    fn test_peek_finds_last_value() {
        let argv = ["--read-only", "-a", "duckdb", "x.db", "--adapter=SQLite"];
        assert_eq!(
            Resolver::peek(&argv, &globals(), &[], "adapter"),
            Some("SQLite".to_string())
        );
        assert_eq!(Resolver::peek(&["x.db"], &globals(), &[], "adapter"), None);
    }

    #[test]
    fn test_peek_skips_values_of_known_flags() {
        let argv = ["-t", "-a", "x.db"];
        assert_eq!(Resolver::peek(&argv, &globals(), &[], "adapter"), None);
    }

    #[test]
    fn test_peek_reads_adapter_values_like_resolve() {
        let adapter = vec![OptionSchema::string("extension").alias("-e")];
        for argv in [vec!["-e", "-a", "x.db"], vec!["-e", "-asqlite"], vec!["--extension", "--adapter=sqlite"]] {
            assert_eq!(Resolver::peek(&argv, &globals(), &adapter, "adapter"), None, "{argv:?}");
            let resolved = Resolver::new(CWD).resolve(&argv, &globals(), &adapter).unwrap();
            assert_eq!(resolved.adapter_key, "duckdb", "{argv:?}");
        }
        // Without the adapter's schemas `-e` is skipped and its value misread.
        assert_eq!(
            Resolver::peek(&["-e", "-asqlite"], &globals(), &[], "adapter"),
            Some("sqlite".to_string())
        );
    }

    #[test]
    fn test_absolutize() {
        let cwd = Path::new("/work/dir");
        assert_eq!(absolutize(cwd, Path::new("foo")), PathBuf::from("/work/dir/foo"));
        assert_eq!(absolutize(cwd, Path::new("./a/../b")), PathBuf::from("/work/dir/b"));
        assert_eq!(absolutize(cwd, Path::new("../x")), PathBuf::from("/work/x"));
        assert_eq!(absolutize(cwd, Path::new("/etc/init.sql")), PathBuf::from("/etc/init.sql"));
    }

    mod props {
        use proptest::prelude::*;

        use super::*;

        fn token() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("-t".to_string()),
                Just("--no-init".to_string()),
                Just("-r".to_string()),
                Just("-l".to_string()),
                "[0-9]{1,6}",
                "[a-z]{1,6}\\.db",
            ]
        }

        proptest! {
            #[test]
            fn resolution_is_idempotent(tokens in proptest::collection::vec(token(), 0..8)) {
                let resolver = Resolver::new(CWD);
                let first = resolver.resolve(&tokens, &globals(), &adapter_options());
                let second = resolver.resolve(&tokens, &globals(), &adapter_options());
                prop_assert_eq!(first, second);
            }

            #[test]
            fn any_limit_is_kept_exactly(limit in any::<i64>()) {
                let argv = vec!["--limit".to_string(), limit.to_string()];
                let resolved = Resolver::new(CWD)
                    .resolve(&argv, &globals(), &adapter_options())
                    .unwrap();
                prop_assert_eq!(resolved.global_arg("max_results"), Some(&OptionValue::from(limit)));
            }
        }
    }
}
