//! Process-level settings read from the environment and `.env`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::logging::FATAL_TARGET;

pub const COLOR_VAR: &str = "T0_COLOR";
pub const LOG_LEVEL_VAR: &str = "T0_LOG_LEVEL";
pub const DOTENV_FILE: &str = ".env";

/// Minimum log level, numbered as accepted by `T0_LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    None = 6,
}

impl LogLevel {
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Debug),
            2 => Some(Self::Info),
            3 => Some(Self::Warn),
            4 => Some(Self::Error),
            5 => Some(Self::Fatal),
            6 => Some(Self::None),
            _ => None,
        }
    }

    /// `tracing` filter directive for this level. Fatal lines are error
    /// events on the [`FATAL_TARGET`] target, so `Fatal` admits only those.
    pub fn directive(self) -> String {
        match self {
            Self::Debug => "debug".to_string(),
            Self::Info => "info".to_string(),
            Self::Warn => "warn".to_string(),
            Self::Error => "error".to_string(),
            Self::Fatal => format!("{FATAL_TARGET}=error"),
            Self::None => "off".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub color: bool,
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: false,
            log_level: LogLevel::Info,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from a variable lookup. Unset or blank variables keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(raw) = non_blank(lookup(COLOR_VAR)) {
            settings.color = parse_bool(&raw)
                .with_context(|| format!("{COLOR_VAR}={raw} is not a boolean"))?;
        }
        if let Some(raw) = non_blank(lookup(LOG_LEVEL_VAR)) {
            let level = raw
                .parse::<u8>()
                .ok()
                .and_then(LogLevel::from_number);
            settings.log_level = match level {
                Some(level) => level,
                None => bail!("{LOG_LEVEL_VAR}={raw} must be an integer from 1 to 6"),
            };
        }
        Ok(settings)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

/// Boolean spellings accepted for flag-like variables.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" | "yes" | "on" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load `dir/.env` if present. Variables already set are left untouched.
///
/// Returns the path that was loaded, or `None` when there is no file.
pub fn load_dotenv(dir: &Path) -> Result<Option<PathBuf>> {
    let path = dir.join(DOTENV_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    dotenvy::from_path(&path).with_context(|| format!("load {}", path.display()))?;
    Ok(Some(path))
}

/// Help lines describing the recognised variables.
pub fn env_help() -> String {
    format!(
        "environment variables:\n\
         {COLOR_VAR}       colorize logs (true/false)\n\
         {LOG_LEVEL_VAR}   minimum log level: 1=debug 2=info 3=warn 4=error 5=fatal 6=none\n\
         GITHUB_TOKEN   only passed to tasks whose env uses <inherit>"
    )
}
