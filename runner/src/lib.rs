//! Declarative task runner for a multi-package workspace.
//!
//! Tasks are read from `.t0runnerrc.yml`, validated against the invocation
//! and run as child processes:
//!
//! - **[`core`]**: Pure logic (placeholders, needs, suggestions, config invariants).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config files, package discovery, git,
//!   network, process launching). Each sits behind a trait so tests can swap it.
//!
//! [`dispatch`] ties them together for the `run` binary.

pub mod cli;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod execute;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod task;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod usage;
pub mod validate;
