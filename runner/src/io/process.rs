//! Launching exec lines as child processes.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument};

/// One child process to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Program followed by its arguments.
    pub argv: Vec<String>,
    /// Replacement environment. `None` inherits the runner's environment.
    pub env: Option<Vec<(String, String)>>,
}

impl LaunchRequest {
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }
}

/// Captured child process result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutput {
    pub success: bool,
    /// Exit code, `None` when the child was killed by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Abstraction over process spawning. Tests script results instead of
/// spawning anything.
pub trait Launcher {
    /// Run the request to completion and return its captured output.
    fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutput>;
}

/// Launcher backed by `std::process::Command`.
///
/// The program is resolved against the runner's own `PATH` so that replacing
/// the child environment never changes which binary runs. On unix the child
/// still sees the configured name as its argv[0].
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    #[instrument(skip_all, fields(program = request.program()))]
    fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutput> {
        let (program, args) = request
            .argv
            .split_first()
            .ok_or_else(|| anyhow!("empty command"))?;
        let resolved = which::which(program)
            .with_context(|| format!("program '{program}' not found on PATH"))?;

        let mut cmd = Command::new(&resolved);
        #[cfg(unix)]
        std::os::unix::process::CommandExt::arg0(&mut cmd, program);
        cmd.args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(env) = &request.env {
            cmd.env_clear().envs(env.iter().cloned());
        }

        debug!(path = %resolved.display(), "spawning child process");
        let mut child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => {
                error!(err = %e, "failed to spawn command");
                return Err(e).with_context(|| format!("spawn {program}"));
            }
        };

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("stdout was not piped"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("stderr was not piped"))?;

        // Both pipes are drained while the child runs so neither can fill up
        // and block it.
        let stdout_handle = thread::spawn(move || read_stream(stdout));
        let stderr_handle = thread::spawn(move || read_stream(stderr));

        let status = child.wait().context("wait for command")?;
        let stdout = join_output(stdout_handle).context("join stdout")?;
        let stderr = join_output(stderr_handle).context("join stderr")?;

        debug!(exit_code = ?status.code(), "command finished");
        Ok(LaunchOutput {
            success: status.success(),
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

fn join_output(handle: thread::JoinHandle<Result<Vec<u8>>>) -> Result<Vec<u8>> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).context("read output")?;
    Ok(buf)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn request(argv: &[&str]) -> LaunchRequest {
        LaunchRequest {
            argv: argv.iter().map(|arg| arg.to_string()).collect(),
            env: None,
        }
    }

    #[test]
    fn captures_both_streams_and_exit_code() {
        let output = ProcessLauncher
            .launch(&request(&["sh", "-c", "echo out; echo err >&2; exit 3"]))
            .expect("launch");
        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, b"out\n");
        assert_eq!(output.stderr, b"err\n");
    }

    #[test]
    fn replacement_env_is_the_whole_environment() {
        let output = ProcessLauncher
            .launch(&LaunchRequest {
                argv: vec!["env".to_string()],
                env: Some(vec![("TOKEN".to_string(), "abc".to_string())]),
            })
            .expect("launch");
        assert!(output.success);
        assert_eq!(String::from_utf8_lossy(&output.stdout), "TOKEN=abc\n");
    }

    #[test]
    fn unknown_program_is_reported_by_name() {
        let err = ProcessLauncher
            .launch(&request(&["t0-runner-no-such-program"]))
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("program 't0-runner-no-such-program' not found on PATH")
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn child_sees_configured_program_name() {
        let output = ProcessLauncher
            .launch(&request(&["cat", "/proc/self/cmdline"]))
            .expect("launch");
        assert!(output.success);
        assert_eq!(output.stdout, b"cat\0/proc/self/cmdline\0");
    }

    #[test]
    fn large_output_does_not_deadlock() {
        let output = ProcessLauncher
            .launch(&request(&[
                "sh",
                "-c",
                "i=0; while [ $i -lt 20000 ]; do echo line-$i; echo err-$i >&2; i=$((i+1)); done",
            ]))
            .expect("launch");
        assert!(output.success);
        assert_eq!(output.stdout.iter().filter(|b| **b == b'\n').count(), 20000);
        assert_eq!(output.stderr.iter().filter(|b| **b == b'\n').count(), 20000);
    }
}
