//! Host-side implementations of task preconditions.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::core::needs::Need;
use crate::error::RunnerError;
use crate::io::git::Git;
use crate::io::online::{REACHABILITY_TIMEOUT, REACHABILITY_URL, check_reachable};

pub const GIT_CLEAN_HINT: &str = "please commit or stash all changes";
pub const ONLINE_HINT: &str = "please check your internet connection";

/// Checks a single precondition. Unmet preconditions are
/// [`RunnerError::Validation`] errors.
pub trait NeedChecker {
    fn check(&self, need: Need) -> Result<()>;
}

/// Checks against the real working tree and network.
#[derive(Debug, Clone)]
pub struct HostChecks {
    workdir: PathBuf,
    reachability_url: String,
    timeout: Duration,
}

impl HostChecks {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            reachability_url: REACHABILITY_URL.to_string(),
            timeout: REACHABILITY_TIMEOUT,
        }
    }

    /// Probe a different endpoint for `<online>`.
    pub fn with_reachability(mut self, url: impl Into<String>, timeout: Duration) -> Self {
        self.reachability_url = url.into();
        self.timeout = timeout;
        self
    }

    fn git_clean(&self) -> Result<()> {
        if Git::new(&self.workdir).diff_is_clean()? {
            return Ok(());
        }
        Err(RunnerError::Validation(GIT_CLEAN_HINT.to_string()).into())
    }

    fn online(&self) -> Result<()> {
        check_reachable(&self.reachability_url, self.timeout).map_err(|err| {
            RunnerError::Validation(format!("{ONLINE_HINT} ({err:#})")).into()
        })
    }
}

impl NeedChecker for HostChecks {
    #[instrument(skip_all, fields(need = %need))]
    fn check(&self, need: Need) -> Result<()> {
        debug!("checking need");
        match need {
            Need::GitClean => self.git_clean(),
            Need::Online => self.online(),
        }
    }
}
