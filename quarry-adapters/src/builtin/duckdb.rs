use quarry_options::OptionSchema;

use super::ConnectionPlan;
use crate::{Adapter, AdapterArgs, AdapterError, AdapterFactory};

pub const KEY: &str = "duckdb";

/// Options contributed by the DuckDB adapter.
pub fn options() -> Vec<OptionSchema> {
    vec![
        OptionSchema::flag("read-only")
            .aliases(["-r", "-readonly"])
            .help("Open the database file in read-only mode."),
        OptionSchema::string("extension")
            .alias("-e")
            .help("Comma-separated extensions to install and load on connect."),
        OptionSchema::flag("force-install-extensions")
            .help("Reinstall extensions even if they are already installed."),
        OptionSchema::string("custom-extension-repo")
            .help("URL of a repository to install extensions from."),
        OptionSchema::string("md-token").help("MotherDuck service token."),
        OptionSchema::flag("md-saas").help("Connect to MotherDuck in SaaS mode."),
    ]
}

/// Factory for the DuckDB adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbFactory;

impl AdapterFactory for DuckDbFactory {
    fn options(&self) -> Vec<OptionSchema> {
        options()
    }

    fn create(&self, args: AdapterArgs) -> Result<Box<dyn Adapter>, AdapterError> {
        if args.flag("md_saas") && args.str("md_token").is_none() {
            return Err(AdapterError::invalid_option(
                KEY,
                "--md-saas",
                "requires --md-token",
            ));
        }
        let empty_extension = args
            .str("extension")
            .is_some_and(|exts| exts.split(',').any(|ext| ext.trim().is_empty()));
        if empty_extension {
            return Err(AdapterError::invalid_option(
                KEY,
                "--extension",
                "contains an empty extension name",
            ));
        }
        Ok(Box::new(ConnectionPlan::new(KEY, args)))
    }
}
