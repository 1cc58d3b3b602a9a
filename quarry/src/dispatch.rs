//! Turns a command line into a running application.

use std::{ffi::OsString, path::PathBuf};

use quarry_adapters::{AdapterArgs, AdapterDescriptor, AdapterRegistry, PluginSource};
use quarry_options::{OptionSchema, OptionValue};
use quarry_resolve::{ParseError, ResolvedConfig, Resolver};
use tracing::{debug, info};

use crate::{
    app::{AppArgs, AppFactory, Application},
    config::Config,
    error::{DispatchError, ErrorKind},
    help::{USAGE, render_help},
    options::{
        ADAPTER, CONFIG_PATH, DEFAULT_LIMIT, DEFAULT_THEME, HELP, MAX_RESULTS, THEME, VERSION,
        global_options,
    },
    output::Output,
};

/// What an invocation will do, decided before anything is constructed.
#[derive(Debug)]
pub enum Plan<'a> {
    /// Print this help text and exit 0.
    Help(String),
    /// Print this version line and exit 0.
    Version(String),
    /// Construct the adapter and the application.
    Launch {
        descriptor: &'a AdapterDescriptor,
        resolved: ResolvedConfig,
    },
}

/// Orchestrates the adapter registry, the config file and the resolver.
pub struct Dispatcher {
    registry: AdapterRegistry,
    apps: Box<dyn AppFactory>,
    cwd: PathBuf,
    config_path: Option<PathBuf>,
}

impl Dispatcher {
    pub fn new(registry: AdapterRegistry, apps: impl AppFactory + 'static, cwd: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            apps: Box::new(apps),
            cwd: cwd.into(),
            config_path: None,
        }
    }

    /// Discover adapters from `source`, reserving the global option spellings.
    pub fn discover(
        source: &dyn PluginSource,
        apps: impl AppFactory + 'static,
        cwd: impl Into<PathBuf>,
    ) -> Result<Self, DispatchError> {
        let registry = AdapterRegistry::discover(source, &global_options::<&str>(&[]))?;
        info!(adapters = registry.len(), "discovered adapters");
        Ok(Self::new(registry, apps, cwd))
    }

    /// Config file used when the command line names none.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Global options with `adapter` restricted to the discovered keys.
    pub fn global_options(&self) -> Vec<OptionSchema> {
        let keys: Vec<&str> = self.registry.keys().collect();
        global_options(&keys)
    }

    /// Resolve `argv` without constructing the adapter or the application.
    pub fn plan<S: AsRef<str>>(&self, argv: &[S]) -> Result<Plan<'_>, DispatchError> {
        let (descriptor, globals, config) = self.settle_adapter(argv)?;
        debug!(adapter = descriptor.key(), "selected adapter");

        let adapter_options = config.apply_adapter(descriptor.key(), descriptor.option_schemas())?;
        let globals: Vec<OptionSchema> = globals
            .into_iter()
            .map(|schema| {
                if schema.name() == ADAPTER {
                    schema.with_default(OptionValue::Choice(descriptor.key().to_string()))
                } else {
                    schema
                }
            })
            .collect();

        let resolved = Resolver::new(&self.cwd).resolve(argv, &globals, &adapter_options)?;
        if resolved.adapter_key != descriptor.key() {
            return Err(DispatchError::AmbiguousAdapter {
                selected: descriptor.key().to_string(),
                named: resolved.adapter_key,
            });
        }

        if resolved.dispatch_flag(HELP) {
            return Ok(Plan::Help(render_help(&globals, descriptor.key(), &adapter_options)));
        }
        if resolved.dispatch_flag(VERSION) {
            return Ok(Plan::Version(format!("quarry {}", env!("CARGO_PKG_VERSION"))));
        }
        Ok(Plan::Launch {
            descriptor,
            resolved,
        })
    }

    /// Construct the adapter and the application from a resolved command line.
    pub fn launch(
        &self,
        descriptor: &AdapterDescriptor,
        resolved: ResolvedConfig,
    ) -> Result<Box<dyn Application>, DispatchError> {
        let args = AdapterArgs::new(resolved.connection_targets.clone(), resolved.adapter_options());
        let adapter = descriptor.factory().create(args)?;
        info!(adapter = adapter.key(), "constructed adapter");

        let max_results = resolved
            .global_arg(MAX_RESULTS)
            .and_then(OptionValue::as_integer)
            .cloned()
            .unwrap_or_else(|| DEFAULT_LIMIT.into());
        let theme = resolved
            .global_arg(THEME)
            .and_then(OptionValue::as_str)
            .unwrap_or(DEFAULT_THEME)
            .to_string();

        Ok(self.apps.create(AppArgs {
            adapter,
            max_results,
            theme,
        }))
    }

    /// Run one invocation and return its exit code.
    pub fn run<S: AsRef<str>>(&self, argv: &[S], out: &mut dyn Output) -> i32 {
        let code = match self.plan(argv) {
            Ok(Plan::Help(text)) => {
                out.preformatted(text.trim_end());
                0
            }
            Ok(Plan::Version(line)) => {
                out.preformatted(&line);
                0
            }
            Ok(Plan::Launch {
                descriptor,
                resolved,
            }) => match self.launch(descriptor, resolved) {
                Ok(app) => app.run(out),
                Err(err) => report(err, out),
            },
            Err(err) => report(err, out),
        };
        debug!(code, "exiting");
        code
    }

    /// Pick the adapter together with the config file and the configured
    /// global options.
    ///
    /// Adapter options change how the command line is tokenized, since a
    /// value-taking flag consumes the next token. `-a` and `--config-path`
    /// are therefore read with a candidate adapter's options, starting from
    /// the registry default, until the adapter named agrees with the
    /// candidate. If two candidates keep naming each other the last one is
    /// kept and resolution reports the conflict.
    fn settle_adapter<S: AsRef<str>>(
        &self,
        argv: &[S],
    ) -> Result<(&AdapterDescriptor, Vec<OptionSchema>, Config), DispatchError> {
        let base = self.global_options();
        let mut candidate = self.registry.default().ok();
        let mut tried: Vec<&str> = Vec::new();
        loop {
            let adapter_options = candidate
                .map(AdapterDescriptor::option_schemas)
                .unwrap_or_default();
            let config = self.load_config(argv, &base, adapter_options)?;
            let globals = config.apply_globals(&base)?;
            let selected = self.select_adapter(argv, &globals, adapter_options)?;
            match candidate {
                Some(current) if current.key() == selected.key() => {
                    return Ok((selected, globals, config));
                }
                Some(current) if tried.contains(&selected.key()) => {
                    debug!(
                        candidate = current.key(),
                        named = selected.key(),
                        "adapter selection does not settle"
                    );
                    return Ok((current, globals, config));
                }
                Some(current) => tried.push(current.key()),
                None => {}
            }
            candidate = Some(selected);
        }
    }

    /// `--config-path` from the command line, else the fallback path.
    fn load_config<S: AsRef<str>>(
        &self,
        argv: &[S],
        globals: &[OptionSchema],
        adapter_options: &[OptionSchema],
    ) -> Result<Config, DispatchError> {
        let path = Resolver::peek(argv, globals, adapter_options, CONFIG_PATH)
            .map(|raw| self.cwd.join(raw))
            .or_else(|| self.config_path.clone());
        match path {
            Some(path) => Ok(Config::load(&path)?),
            None => Ok(Config::default()),
        }
    }

    /// The adapter named on the command line, else the configured default,
    /// else the registry's default.
    fn select_adapter<S: AsRef<str>>(
        &self,
        argv: &[S],
        globals: &[OptionSchema],
        adapter_options: &[OptionSchema],
    ) -> Result<&AdapterDescriptor, DispatchError> {
        let schema = globals.iter().find(|s| s.name() == ADAPTER);
        let named = Resolver::peek(argv, globals, adapter_options, ADAPTER);
        if let (Some(raw), Some(schema)) = (named, schema) {
            let value = schema
                .validate(&raw)
                .map_err(|reason| ParseError::InvalidOptionValue {
                    name: ADAPTER.to_string(),
                    label: schema.label(),
                    raw_value: raw.clone(),
                    reason,
                })?;
            return Ok(self.registry.resolve(value.as_str().unwrap_or(raw.as_str()))?);
        }
        match schema.and_then(|s| s.default().as_str()) {
            Some(key) => Ok(self.registry.resolve(key)?),
            None => Ok(self.registry.default()?),
        }
    }
}

/// Print `err` the way its kind calls for and return the exit code.
///
/// Usage errors get a usage line and a pointer to `-h`; everything else is
/// rendered as a diagnostic.
pub fn report(err: DispatchError, out: &mut dyn Output) -> i32 {
    let code = err.exit_code();
    debug!(error = %err, code, "invocation failed");
    if err.kind() == ErrorKind::Usage {
        out.error(&format!("Usage: {}", USAGE));
        out.error("Try 'quarry -h' for help.");
        out.error("");
        out.error(&format!("Error: {}", err));
    } else {
        out.diagnostic(miette::Report::new(err));
    }
    code
}

/// Convert raw process arguments, rejecting any that are not UTF-8.
pub fn collect_args<I>(args: I) -> Result<Vec<String>, DispatchError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|raw| DispatchError::MalformedArgument {
                lossy: raw.to_string_lossy().into_owned(),
            })
        })
        .collect()
}
