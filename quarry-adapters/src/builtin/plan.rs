use std::path::PathBuf;

use indexmap::IndexMap;
use quarry_options::OptionValue;

use crate::{Adapter, AdapterArgs, INIT_PATH, NO_INIT};

/// What a built-in adapter will open, and with which settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPlan {
    adapter: String,
    targets: Vec<String>,
    init_path: Option<PathBuf>,
    no_init: bool,
    settings: IndexMap<String, OptionValue>,
}

impl ConnectionPlan {
    /// Build a plan from resolved arguments. Connection targets keep their
    /// order; an empty list means the engine's default (in-memory) database.
    pub fn new(adapter: &str, args: AdapterArgs) -> Self {
        let init_path = args.init_path().map(PathBuf::from);
        let no_init = args.no_init();
        let settings = args
            .options
            .into_iter()
            .filter(|(key, value)| key != INIT_PATH && key != NO_INIT && !value.is_unset())
            .collect();
        Self {
            adapter: adapter.to_string(),
            targets: args.conn_str,
            init_path,
            no_init,
            settings,
        }
    }

    /// Init script to run, if any.
    pub fn init_script(&self) -> Option<&PathBuf> {
        if self.no_init {
            None
        } else {
            self.init_path.as_ref()
        }
    }
}

impl Adapter for ConnectionPlan {
    fn key(&self) -> &str {
        &self.adapter
    }

    fn connection_targets(&self) -> &[String] {
        &self.targets
    }

    fn summary(&self) -> String {
        let targets = if self.targets.is_empty() {
            ":memory:".to_string()
        } else {
            self.targets.join(", ")
        };
        let mut summary = format!("{} -> {}", self.adapter, targets);
        match self.init_script() {
            Some(path) => summary.push_str(&format!(" (init: {})", path.display())),
            None if self.no_init => summary.push_str(" (init skipped)"),
            None => {}
        }
        for (key, value) in &self.settings {
            summary.push_str(&format!(" {}={}", key, value));
        }
        summary
    }
}
