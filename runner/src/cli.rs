//! Runner flag parsing.
//!
//! Runner flags come before the task name and use Go-style single-dash long
//! names (`-config`, `-version`). Everything from the task name onward belongs
//! to the task, including `-h`, so tasks can interpret their own flags.

use std::path::PathBuf;

use clap::Parser;

use crate::error::RunnerError;

/// Flags understood by the runner itself.
#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
#[command(
    name = "run",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct RunnerFlags {
    /// Print the runner version and exit.
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Config file to load instead of the defaults.
    #[arg(long, value_name = "FILE", allow_hyphen_values = true)]
    pub config: Option<PathBuf>,

    /// Print usage.
    #[arg(short = 'h', long = "help")]
    pub help: bool,
}

/// Runner flags plus the task argument vector (`<task> [<package>] [<args>...]`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub flags: RunnerFlags,
    pub task_args: Vec<String>,
}

/// Split `args` (without the program name) into runner flags and task args.
///
/// Leading dash arguments are runner flags; `-config` consumes the following
/// argument. The first other argument, or anything after `--`, starts the
/// task arguments.
pub fn split_args<I, S>(args: I) -> Result<Invocation, RunnerError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut iter = args.into_iter().map(Into::<String>::into);
    let mut flags: Vec<String> = Vec::new();
    let mut task_args = Vec::new();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            task_args.extend(iter.by_ref());
            break;
        }
        if arg == "-config" || arg == "--config" {
            flags.push("--config".to_string());
            flags.extend(iter.next());
            continue;
        }
        if arg == "-version" {
            flags.push("--version".to_string());
            continue;
        }
        if let Some(value) = arg.strip_prefix("-config=") {
            flags.push(format!("--config={value}"));
            continue;
        }
        if arg.starts_with('-') && arg.len() > 1 {
            flags.push(arg);
            continue;
        }
        task_args.push(arg);
        task_args.extend(iter.by_ref());
        break;
    }

    let flags = RunnerFlags::try_parse_from(flags).map_err(|err| {
        let rendered = err.to_string();
        let first = rendered.lines().next().unwrap_or_default();
        RunnerError::usage(first.trim_start_matches("error: ").to_string())
    })?;
    Ok(Invocation { flags, task_args })
}
