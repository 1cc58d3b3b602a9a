use std::{path::PathBuf, process::ExitCode};

use eyre::Result;
use quarry::{
    CONFIG_PATH_ENV, Dispatcher, SummaryAppFactory, TerminalOutput, collect_args, report,
    telemetry,
};
use quarry_adapters::builtin;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    telemetry::init_tracing("warn");

    let mut out = TerminalOutput::new();
    let cwd = std::env::current_dir()?;
    let code = match Dispatcher::discover(&builtin::source(), SummaryAppFactory, cwd) {
        Ok(dispatcher) => {
            let dispatcher =
                dispatcher.with_config_path(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
            match collect_args(std::env::args_os().skip(1)) {
                Ok(argv) => dispatcher.run(&argv, &mut out),
                Err(err) => report(err, &mut out),
            }
        }
        Err(err) => report(err, &mut out),
    };

    match u8::try_from(code) {
        Ok(code) => Ok(ExitCode::from(code)),
        // `ExitCode` only carries a byte; wider application codes go to the OS as is.
        Err(_) => std::process::exit(code),
    }
}
