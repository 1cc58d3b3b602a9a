//! `--help` text rendered by clap from the merged option schemas.

use clap::{Arg, ArgAction, Command, builder::PossibleValuesParser};
use quarry_options::{OptionSchema, OptionValue, ValueKind};

pub const USAGE: &str = "quarry [OPTIONS] [CONN_STR]...";

const ABOUT: &str = "A database client for the terminal. CONN_STR is passed to the selected \
adapter unchanged; most adapters accept file paths or connection URIs.";

/// Help text listing the global options and those of `adapter_key`.
pub fn render_help(globals: &[OptionSchema], adapter_key: &str, adapter: &[OptionSchema]) -> String {
    let mut command = Command::new("quarry")
        .version(env!("CARGO_PKG_VERSION"))
        .about(ABOUT)
        .override_usage(USAGE)
        .term_width(0)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("conn_str")
                .value_name("CONN_STR")
                .num_args(0..)
                .help("Connection targets for the adapter."),
        );

    for schema in globals {
        command = command.arg(to_arg(schema));
    }
    let heading = format!("{} adapter options", adapter_key);
    for schema in adapter {
        command = command.arg(to_arg(schema).help_heading(heading.clone()));
    }

    command.render_help().to_string()
}

fn to_arg(schema: &OptionSchema) -> Arg {
    let mut arg = Arg::new(schema.name().to_string()).long(schema.name().to_string());

    let mut extra = Vec::new();
    for alias in schema.alias_list() {
        match short_char(alias) {
            Some(short) => arg = arg.short(short),
            None => extra.push(alias.as_str()),
        }
    }

    let mut help = schema.help_text().unwrap_or_default().to_string();
    if !extra.is_empty() {
        help.push_str(&format!(" [aliases: {}]", extra.join(", ")));
    }
    arg = arg.help(help.trim().to_string());

    if !schema.takes_value() {
        return arg.action(ArgAction::SetTrue);
    }

    arg = arg
        .action(ArgAction::Set)
        .value_name(schema.kind().metavar());
    if schema.kind() == ValueKind::Enum {
        arg = arg.value_parser(PossibleValuesParser::new(
            schema.allowed_values().iter().cloned(),
        ));
    }
    match schema.default() {
        OptionValue::Unset => arg,
        default => arg.default_value(default.to_string()),
    }
}

/// `-x` as `'x'`; longer single-dash aliases have no clap spelling.
fn short_char(alias: &str) -> Option<char> {
    let mut chars = alias.strip_prefix('-')?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '-' => Some(c),
        _ => None,
    }
}
