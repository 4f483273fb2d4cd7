//! Stable exit codes for the `run` binary.

use crate::error::{RunnerError, classify};

/// Task (or `-v`) completed.
pub const OK: i32 = 0;
/// Any failure that does not carry a child exit code.
pub const FAILURE: i32 = 1;

/// Exit code for a failed invocation.
///
/// A child that exited with its own non-zero code propagates it; everything
/// else maps to [`FAILURE`].
pub fn for_error(err: &anyhow::Error) -> i32 {
    match classify(err) {
        Some(RunnerError::Exec {
            code: Some(code), ..
        }) if *code != OK => *code,
        _ => FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_exit_code_propagates() {
        let err = anyhow::Error::new(RunnerError::Exec {
            line: "false".to_string(),
            reason: "exit status 7".to_string(),
            code: Some(7),
        });
        assert_eq!(for_error(&err), 7);
    }

    #[test]
    fn signal_and_usage_fall_back_to_failure() {
        let killed = anyhow::Error::new(RunnerError::Exec {
            line: "sleep 10".to_string(),
            reason: "terminated by signal".to_string(),
            code: None,
        });
        assert_eq!(for_error(&killed), FAILURE);
        let usage = anyhow::Error::new(RunnerError::usage("task is required"));
        assert_eq!(for_error(&usage), FAILURE);
    }
}
