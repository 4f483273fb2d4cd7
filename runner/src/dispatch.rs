//! Top-level flow for one `run` invocation.
//!
//! flags -> config -> task lookup -> validate -> execute, with a single
//! reported error at the end.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::cli::split_args;
use crate::core::suggest::suggest;
use crate::error::{RunnerError, classify, with_suggestion};
use crate::exit_codes;
use crate::io::checks::NeedChecker;
use crate::io::config::{load_config, resolve_config_path};
use crate::io::discover::PackageSource;
use crate::io::process::Launcher;
use crate::logging;
use crate::task::Config;
use crate::usage::render_usage;

/// Version string printed by `-v`.
pub fn version_line() -> String {
    format!("run {}", env!("CARGO_PKG_VERSION"))
}

/// Runner wired to its package source, precondition checks and launcher.
pub struct Runner<P, N, L> {
    root: PathBuf,
    packages: P,
    checks: N,
    launcher: L,
}

impl<P, N, L> Runner<P, N, L>
where
    P: PackageSource,
    N: NeedChecker,
    L: Launcher,
{
    /// `root` is the working directory: default config files and relative
    /// `-config` paths are resolved against it.
    pub fn new(root: impl Into<PathBuf>, packages: P, checks: N, launcher: L) -> Self {
        Self {
            root: root.into(),
            packages,
            checks,
            launcher,
        }
    }

    /// Run one invocation and return the process exit code.
    ///
    /// Child stdout and the `-v` line go to `stdout`. On a usage-class error
    /// the usage text is written to `usage_out` before the fatal log line.
    pub fn run<I, S, O, U>(&self, args: I, stdout: &mut O, usage_out: &mut U) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        O: Write,
        U: Write,
    {
        let mut config = None;
        match self.dispatch(args, &mut config, stdout) {
            Ok(()) => exit_codes::OK,
            Err(err) => {
                if classify(&err).is_some_and(RunnerError::is_usage) {
                    let usage = self.usage(config.as_ref());
                    if let Err(write_err) = usage_out.write_all(usage.as_bytes()) {
                        debug!(error = %write_err, "usage text not written");
                    }
                }
                logging::fatal(&err);
                exit_codes::for_error(&err)
            }
        }
    }

    #[instrument(skip_all)]
    fn dispatch<I, S, O>(&self, args: I, config: &mut Option<Config>, stdout: &mut O) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        O: Write,
    {
        let invocation = split_args(args)?;
        if invocation.flags.version {
            writeln!(stdout, "{}", version_line()).context("write version")?;
            return Ok(());
        }
        if invocation.flags.help {
            return Err(RunnerError::usage("help requested").into());
        }

        let explicit = invocation.flags.config.map(|path| self.root.join(path));
        let path = resolve_config_path(explicit.as_deref(), &self.root)?;
        let loaded = config.insert(load_config(&path)?);

        let (name, inputs) = invocation
            .task_args
            .split_first()
            .ok_or_else(|| RunnerError::usage("task is required"))?;
        let task = loaded.find(name).ok_or_else(|| {
            let message = format!("unknown task '{name}'");
            RunnerError::usage(with_suggestion(
                message,
                suggest(name, &loaded.task_names()),
            ))
        })?;
        debug!(task = %task.name, inputs = inputs.len(), "task selected");

        task.validate(inputs, &self.packages, &self.checks)
            .with_context(|| format!("validate task '{}'", task.name))?;
        task.execute(inputs, &self.launcher, stdout)
            .with_context(|| format!("run task '{}'", task.name))
    }

    fn usage(&self, config: Option<&Config>) -> String {
        let tasks = config.map(|config| config.tasks.as_slice()).unwrap_or_default();
        let packages = self.packages.packages().unwrap_or_else(|err| {
            debug!(error = %format!("{err:#}"), "packages omitted from usage");
            Vec::new()
        });
        render_usage(tasks, &packages)
    }
}
