//! Running a task's exec lines.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument};

use crate::core::placeholder::{build_argv, expand_env_pair};
use crate::error::RunnerError;
use crate::io::process::{LaunchOutput, LaunchRequest, Launcher};
use crate::task::Task;

pub const STDERR_BEGINS: &str = "command stderr BEGINS";
pub const STDERR_ENDS: &str = "command stderr ENDS";

impl Task {
    /// Run every exec line in order, stopping at the first failure.
    ///
    /// Child stdout is written to `stdout` once the child exits; child stderr
    /// is logged between [`STDERR_BEGINS`] and [`STDERR_ENDS`].
    pub fn execute<L: Launcher, W: Write>(
        &self,
        inputs: &[String],
        launcher: &L,
        stdout: &mut W,
    ) -> Result<()> {
        self.execute_with_env(inputs, launcher, stdout, |key| std::env::var(key).ok())
    }

    /// [`Task::execute`] with an explicit parent-environment lookup for
    /// `<inherit>`.
    #[instrument(skip_all, fields(task = %self.name))]
    pub fn execute_with_env<L, W, F>(
        &self,
        inputs: &[String],
        launcher: &L,
        stdout: &mut W,
        lookup: F,
    ) -> Result<()>
    where
        L: Launcher,
        W: Write,
        F: Fn(&str) -> Option<String>,
    {
        let package = self.package(inputs);
        let extra = self.pass_through(inputs);
        let env = self.child_env(package, lookup)?;

        for line in &self.exec {
            let argv = build_argv(line, extra, package);
            if argv.first().is_none_or(|program| program.is_empty()) {
                return Err(exec_error(line, "empty command", None).into());
            }
            info!(command = %line, "running");
            debug!(?argv, "expanded command");

            let request = LaunchRequest {
                argv,
                env: env.clone(),
            };
            let output = launcher
                .launch(&request)
                .map_err(|err| exec_error(line, &format!("{err:#}"), None))?;
            report_output(&output, stdout)?;

            if !output.success {
                let reason = match output.code {
                    Some(code) => format!("exit status {code}"),
                    None => "terminated by signal".to_string(),
                };
                error!(command = %line, exit_code = ?output.code, "command failed");
                return Err(exec_error(line, &reason, output.code).into());
            }
        }
        Ok(())
    }

    /// Child environment for this task, or `None` to inherit the runner's.
    fn child_env<F>(&self, package: &str, lookup: F) -> Result<Option<Vec<(String, String)>>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.env.is_empty() {
            return Ok(None);
        }
        let mut pairs = Vec::with_capacity(self.env.len());
        for template in &self.env {
            let pair = expand_env_pair(template, package, &lookup).ok_or_else(|| {
                RunnerError::config(format!("env entry '{template}' must be KEY=VALUE"))
            })?;
            if pair.unset_inherit {
                debug!(key = %pair.key, "inherited variable is not set");
            }
            pairs.push((pair.key, pair.value));
        }
        Ok(Some(pairs))
    }
}

fn exec_error(line: &str, reason: &str, code: Option<i32>) -> RunnerError {
    RunnerError::Exec {
        line: line.to_string(),
        reason: reason.to_string(),
        code,
    }
}

fn report_output<W: Write>(output: &LaunchOutput, stdout: &mut W) -> Result<()> {
    if !output.stdout.is_empty() {
        stdout
            .write_all(&output.stdout)
            .and_then(|()| stdout.flush())
            .context("write command stdout")?;
    }
    if !output.stderr.is_empty() {
        info!("{}", STDERR_BEGINS);
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            info!("{line}");
        }
        info!("{}", STDERR_ENDS);
    }
    Ok(())
}
