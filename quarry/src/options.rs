//! The global option table shared by every adapter.

use quarry_adapters::{INIT_PATH, NO_INIT};
use quarry_options::{OptionSchema, OptionValue, Target};

pub const ADAPTER: &str = "adapter";
pub const INIT_PATH_OPTION: &str = "init-path";
pub const NO_INIT_OPTION: &str = "no-init";
pub const THEME: &str = "theme";
pub const LIMIT: &str = "limit";
pub const CONFIG_PATH: &str = "config-path";
pub const HELP: &str = "help";
pub const VERSION: &str = "version";

/// Argument key the application reads its row limit from.
pub const MAX_RESULTS: &str = "max_results";

pub const DEFAULT_THEME: &str = "monokai";
pub const DEFAULT_LIMIT: i64 = 100_000;

/// Options that only make sense on the command line.
pub const COMMAND_LINE_ONLY: [&str; 3] = [CONFIG_PATH, HELP, VERSION];

/// Global options, with `adapter` restricted to `adapter_keys`.
///
/// Discovery reserves these spellings before any adapter is known, so an
/// empty key list is valid here.
pub fn global_options<S: AsRef<str>>(adapter_keys: &[S]) -> Vec<OptionSchema> {
    vec![
        OptionSchema::choice(ADAPTER, adapter_keys.iter().map(AsRef::as_ref))
            .alias("-a")
            .target(Target::Dispatcher)
            .help("The database adapter to use."),
        OptionSchema::path(INIT_PATH_OPTION)
            .aliases(["-i", "-init"])
            .dest(INIT_PATH)
            .target(Target::Adapter)
            .help("A SQL script to run when the connection opens."),
        OptionSchema::flag(NO_INIT_OPTION)
            .dest(NO_INIT)
            .overrides(INIT_PATH)
            .target(Target::Adapter)
            .help("Start without running the initialization script."),
        OptionSchema::string(THEME)
            .alias("-t")
            .default_value(DEFAULT_THEME)
            .target(Target::Application)
            .help("The color theme of the interface."),
        OptionSchema::int(LIMIT)
            .alias("-l")
            .dest(MAX_RESULTS)
            .default_value(OptionValue::from(DEFAULT_LIMIT))
            .target(Target::Application)
            .help("The maximum number of rows to load for a query."),
        OptionSchema::path(CONFIG_PATH)
            .alias("-c")
            .target(Target::Dispatcher)
            .help("A TOML file with default option values."),
        OptionSchema::flag(HELP)
            .alias("-h")
            .target(Target::Dispatcher)
            .help("Show this message and exit."),
        OptionSchema::flag(VERSION)
            .alias("-V")
            .target(Target::Dispatcher)
            .help("Show the version and exit."),
    ]
}
