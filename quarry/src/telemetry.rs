use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `QUARRY_LOG=debug`.
pub const LOG_ENV: &str = "QUARRY_LOG";

/// Install the global subscriber, writing to stderr.
///
/// Falls back to `default_level` when `QUARRY_LOG` is unset or invalid. A
/// subscriber installed earlier is left in place.
pub fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    let _ = subscriber.try_init();
}
