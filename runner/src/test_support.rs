//! Test-only fakes for the runner's side-effect seams.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result, anyhow, bail};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::core::needs::Need;
use crate::error::RunnerError;
use crate::io::checks::NeedChecker;
use crate::io::discover::PackageSource;
use crate::io::process::{LaunchOutput, LaunchRequest, Launcher};
use crate::task::Task;

/// Repository task with the given exec lines and no needs or env.
pub fn task(name: &str, exec: &[&str]) -> Task {
    Task {
        name: name.to_string(),
        package_scoped: false,
        needs: String::new(),
        env: Vec::new(),
        exec: exec.iter().map(|line| line.to_string()).collect(),
    }
}

/// Fixed package list, or a discovery failure.
pub struct StaticPackages {
    packages: Option<Vec<String>>,
}

impl StaticPackages {
    pub fn new(packages: &[&str]) -> Self {
        Self {
            packages: Some(packages.iter().map(|p| p.to_string()).collect()),
        }
    }

    pub fn failing() -> Self {
        Self { packages: None }
    }
}

impl PackageSource for StaticPackages {
    fn packages(&self) -> Result<Vec<String>> {
        self.packages
            .clone()
            .ok_or_else(|| anyhow!("package discovery failed"))
    }
}

/// Records every need it is asked about; optionally fails one of them.
pub struct RecordingChecks {
    fail_on: Option<Need>,
    calls: RefCell<Vec<Need>>,
}

impl RecordingChecks {
    pub fn passing() -> Self {
        Self {
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_on(need: Need) -> Self {
        Self {
            fail_on: Some(need),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Need> {
        self.calls.borrow().clone()
    }
}

impl NeedChecker for RecordingChecks {
    fn check(&self, need: Need) -> Result<()> {
        self.calls.borrow_mut().push(need);
        if self.fail_on == Some(need) {
            return Err(RunnerError::Validation(format!("{need} not met")).into());
        }
        Ok(())
    }
}

/// Launcher that returns queued outputs in order and records each request.
/// Once the queue is empty every launch succeeds with no output.
pub struct ScriptedLauncher {
    outputs: RefCell<VecDeque<LaunchOutput>>,
    launch_error: Option<String>,
    requests: RefCell<Vec<LaunchRequest>>,
}

impl ScriptedLauncher {
    pub fn new(outputs: Vec<LaunchOutput>) -> Self {
        Self {
            outputs: RefCell::new(outputs.into()),
            launch_error: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Vec::new())
    }

    /// Every launch fails before a child is started.
    pub fn failing_launch(message: &str) -> Self {
        Self {
            launch_error: Some(message.to_string()),
            ..Self::succeeding()
        }
    }

    pub fn requests(&self) -> Vec<LaunchRequest> {
        self.requests.borrow().clone()
    }
}

impl Launcher for ScriptedLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutput> {
        self.requests.borrow_mut().push(request.clone());
        if let Some(message) = &self.launch_error {
            bail!("{message}");
        }
        Ok(self
            .outputs
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| LaunchOutput {
                success: true,
                code: Some(0),
                ..LaunchOutput::default()
            }))
    }
}

/// In-memory writer shared between a subscriber and the test.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a thread-local subscriber and return its result plus the
/// plain-text log lines it produced.
pub fn capture_logs<T>(level: Level, f: impl FnOnce() -> T) -> (T, String) {
    let buffer = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}

/// Throwaway git repository in a temp directory.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let repo = Self {
            dir: TempDir::new().context("create temp dir")?,
        };
        repo.git(&["init", "-q"])?;
        repo.git(&["config", "user.email", "runner@example.com"])?;
        repo.git(&["config", "user.name", "Runner Tests"])?;
        repo.git(&["config", "commit.gpgsign", "false"])?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, contents: &str) -> Result<()> {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }

    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.git(&["add", "-A"])?;
        self.git(&["commit", "-q", "-m", message])
    }

    fn git(&self, args: &[&str]) -> Result<()> {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}
