//! Error kinds surfaced by the runner.
//!
//! Module boundaries pass `anyhow::Error` so callers can attach context; the
//! driver walks the chain with [`classify`] to decide how a failure is shown.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    /// Fixable by reading the help text. Triggers the usage printer.
    #[error("{0}")]
    Usage(String),

    /// Config file exists but is malformed or references an unknown need.
    #[error("invalid config: {0}")]
    Config(String),

    /// A precondition (`needs`) is not met.
    #[error("{0}")]
    Validation(String),

    /// A child process failed to start or exited unsuccessfully.
    #[error("exec '{line}': {reason}")]
    Exec {
        line: String,
        reason: String,
        code: Option<i32>,
    },

    #[error("discover packages under {}", .root.display())]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl RunnerError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

/// Find the first [`RunnerError`] in an error chain.
pub fn classify(err: &anyhow::Error) -> Option<&RunnerError> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<RunnerError>())
}

/// Append a `did you mean` phrase to a message when one is available.
pub fn with_suggestion(message: String, suggestion: Option<String>) -> String {
    match suggestion {
        Some(phrase) => format!("{message}, {phrase}"),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn classify_sees_through_context() {
        let err = Err::<(), _>(RunnerError::usage("task is required"))
            .context("dispatch")
            .unwrap_err();
        let kind = classify(&err).expect("runner error in chain");
        assert!(kind.is_usage());
        assert_eq!(format!("{err:#}"), "dispatch: task is required");
    }

    #[test]
    fn classify_returns_none_for_foreign_errors() {
        let err = anyhow::anyhow!("boom");
        assert!(classify(&err).is_none());
    }

    #[test]
    fn exec_error_quotes_line() {
        let err = RunnerError::Exec {
            line: "go vet ./<package>/...".to_string(),
            reason: "exit status 1".to_string(),
            code: Some(1),
        };
        assert_eq!(err.to_string(), "exec 'go vet ./<package>/...': exit status 1");
    }
}
