//! The application started once an adapter has been constructed.

use quarry_adapters::Adapter;
use quarry_options::Integer;

use crate::output::{Output, Report};

/// Everything the application is constructed with.
#[derive(Debug)]
pub struct AppArgs {
    pub adapter: Box<dyn Adapter>,
    pub max_results: Integer,
    pub theme: String,
}

/// A constructed application; `run` returns the process exit code.
pub trait Application {
    fn run(self: Box<Self>, out: &mut dyn Output) -> i32;
}

/// Builds the application from resolved arguments.
pub trait AppFactory {
    fn create(&self, args: AppArgs) -> Box<dyn Application>;
}

/// Prints the resolved session and exits.
///
/// Stands in for the interactive interface, which lives outside this crate.
#[derive(Debug)]
pub struct SummaryApp {
    args: AppArgs,
}

impl SummaryApp {
    pub fn new(args: AppArgs) -> Self {
        Self { args }
    }
}

impl Report for SummaryApp {
    fn render(&self, out: &mut dyn Output) {
        let adapter = &self.args.adapter;
        out.section("Session");
        out.key_value_indented("adapter", adapter.key());
        out.key_value_indented("connection", &adapter.summary());
        out.key_value_indented("theme", &self.args.theme);
        out.key_value_indented("limit", &self.args.max_results.to_string());
        if !adapter.connection_targets().is_empty() {
            out.section("Targets");
            for target in adapter.connection_targets() {
                out.list_item(target);
            }
        }
    }
}

impl Application for SummaryApp {
    fn run(self: Box<Self>, out: &mut dyn Output) -> i32 {
        self.render(out);
        0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryAppFactory;

impl AppFactory for SummaryAppFactory {
    fn create(&self, args: AppArgs) -> Box<dyn Application> {
        Box::new(SummaryApp::new(args))
    }
}
