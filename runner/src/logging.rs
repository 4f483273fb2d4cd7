//! Log output for the runner.
//!
//! Everything the runner reports (progress, child stderr, the final error) goes
//! through `tracing` to stderr. Child stdout is not logged; it is written to
//! the runner's stdout.

use std::backtrace::Backtrace;

use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::io::settings::{LogLevel, Settings};

/// Target of the single line reported for a failed invocation.
pub const FATAL_TARGET: &str = "fatal";

/// Initialize the tracing subscriber from runner settings.
///
/// `RUST_LOG`, when set, replaces the level from `T0_LOG_LEVEL`.
/// Output: stderr, compact format, ANSI colour only when `T0_COLOR` is set.
///
/// # Example
/// ```bash
/// T0_LOG_LEVEL=1 ./run vet pkg/log
/// RUST_LOG=t0_runner=debug,reqwest=warn ./run release
/// ```
pub fn init(settings: &Settings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(settings.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(settings.color)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}

/// Filter for a `T0_LOG_LEVEL` value.
pub fn level_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(level.directive())
}

/// Report the error that ends the invocation.
pub fn fatal(err: &anyhow::Error) {
    error!(target: FATAL_TARGET, "fatal: {err:#}");
}

/// Route panics through the log as fatal lines with a backtrace.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::force_capture();
        error!(target: FATAL_TARGET, "fatal: internal error: {info}\n{backtrace}");
    }));
}
