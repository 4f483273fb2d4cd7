//! Network reachability probe for the `<online>` precondition.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

/// Endpoint probed by the `<online>` check.
pub const REACHABILITY_URL: &str = "https://1.1.1.1";
/// Upper bound for the whole probe request.
pub const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(10);

/// GET `url` and discard the body. Any response counts as reachable; only
/// network-level failures are errors.
#[instrument(skip_all, fields(url = %url, timeout_secs = timeout.as_secs()))]
pub fn check_reachable(url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("build http client")?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("GET {url}"))?;
    debug!(status = %response.status(), "endpoint reachable");
    Ok(())
}
