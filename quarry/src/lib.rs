//! Quarry: a database client command line with pluggable adapters.
//!
//! The [`Dispatcher`] discovers adapters, reads the optional config file,
//! resolves the command line against the global options and the selected
//! adapter's options, then constructs the adapter and hands it to the
//! application.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod app;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod help;
pub mod options;
pub mod output;
pub mod telemetry;

pub use app::{AppArgs, AppFactory, Application, SummaryApp, SummaryAppFactory};
pub use config::{CONFIG_PATH_ENV, Config};
pub use dispatch::{Dispatcher, Plan, collect_args, report};
pub use error::{ConfigError, DispatchError, ErrorKind};
pub use output::{CapturedOutput, Output, Report, TerminalOutput};
