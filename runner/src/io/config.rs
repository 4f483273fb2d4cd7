//! Task config stored in `.t0runnerrc.yml` (or an explicit `-config` file).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::invariants::validate_invariants;
use crate::error::RunnerError;
use crate::task::Config;

/// Config file names probed in the working directory, in precedence order.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = [".t0runnerrc.yml", ".t0runnerrc.yaml"];

/// Pick the config file to load.
///
/// An explicit path wins and must exist. Otherwise the first existing entry of
/// [`DEFAULT_CONFIG_FILES`] under `dir` is used.
pub fn resolve_config_path(explicit: Option<&Path>, dir: &Path) -> Result<PathBuf, RunnerError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(RunnerError::usage(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    DEFAULT_CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            RunnerError::usage(format!(
                "config file not found (looked for {})",
                DEFAULT_CONFIG_FILES.join(", ")
            ))
        })
}

/// Read and parse a config file, then check its invariants.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config = parse_config(&contents).with_context(|| format!("parse {}", path.display()))?;
    debug!(
        version = %config.version,
        tasks = config.tasks.len(),
        "config loaded"
    );
    Ok(config)
}

/// Parse config YAML (JSON is accepted too) and check its invariants.
pub fn parse_config(contents: &str) -> Result<Config, RunnerError> {
    let config: Config =
        serde_yaml::from_str(contents).map_err(|err| RunnerError::config(err.to_string()))?;
    let errors = validate_invariants(&config);
    if !errors.is_empty() {
        return Err(RunnerError::config(format!(
            "invariant violations:\n- {}",
            errors.join("\n- ")
        )));
    }
    Ok(config)
}
