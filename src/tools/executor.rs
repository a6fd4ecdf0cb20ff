//! Bounded Process Executor
//!
//! This module launches a [`CommandSpec`] as a child process with no shell in
//! between, drains stdout and stderr while waiting for exit, and enforces the
//! command's deadline. Every possible runtime condition is folded into an
//! [`ExecutionOutcome`]; nothing is raised to the caller.

use super::command::CommandSpec;
use crate::logging::LogHandle;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Maximum captured bytes per stream (1MB)
pub const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

const READ_CHUNK: usize = 8 * 1024;

/// Result of attempting to run a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The process exited on its own
    ///
    /// `exit_code` is `None` when the process was ended by a signal.
    Completed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The deadline passed; the process group was killed and reaped
    TimedOut { elapsed: Duration },

    /// The program could not be started
    LaunchFailed { reason: String },
}

/// Configuration for process execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum captured bytes per stream (default: 1MB)
    pub max_output_size: usize,

    /// Working directory for launched tools (default: current directory)
    pub working_dir: Option<PathBuf>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_output_size: MAX_OUTPUT_SIZE,
            working_dir: None,
        }
    }
}

impl ExecutorConfig {
    /// Create a new executor config with custom output limit
    pub fn with_max_output_size(size: usize) -> Self {
        Self {
            max_output_size: size,
            ..Default::default()
        }
    }

    /// Create a new executor config with custom working directory
    pub fn with_working_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            ..Default::default()
        }
    }
}

/// Process executor with deadline enforcement
///
/// # Security
///
/// 1. Uses `tokio::process::Command` with a literal argv, never `sh -c`
/// 2. Places each child in its own process group and kills the whole group on timeout
/// 3. Caps captured output per stream while still draining the pipe
/// 4. Sets `kill_on_drop` so a cancelled invocation cannot leak its child
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    config: ExecutorConfig,
    log: LogHandle,
}

impl ProcessExecutor {
    /// Create a new executor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new executor with custom configuration
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self {
            config,
            log: LogHandle::inherit(),
        }
    }

    /// Route this executor's log events through `log`
    pub fn with_log(mut self, log: LogHandle) -> Self {
        self.log = log;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run `spec` to completion, timeout, or launch failure
    pub async fn execute(&self, spec: &CommandSpec) -> ExecutionOutcome {
        self.log.scope(self.run(spec)).await
    }

    async fn run(&self, spec: &CommandSpec) -> ExecutionOutcome {
        let start = Instant::now();
        let deadline = spec.timeout().duration();

        info!(
            command = %spec.display(),
            timeout_secs = spec.timeout().as_secs(),
            "Executing command"
        );

        let mut command = Command::new(spec.program());
        command
            .args(spec.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        command.process_group(0);

        if let Some(ref dir) = self.config.working_dir {
            command.current_dir(dir);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(program = spec.program(), error = %e, "Failed to launch command");
                return ExecutionOutcome::LaunchFailed {
                    reason: format!("Failed to launch '{}': {}", spec.program(), e),
                };
            }
        };

        // The child leads its own group, so its pid is the group id
        let process_group = child.id();
        let limit = self.config.max_output_size;
        let mut stdout_task = child.stdout.take().map(|s| tokio::spawn(drain(s, limit)));
        let mut stderr_task = child.stderr.take().map(|s| tokio::spawn(drain(s, limit)));

        let collect = async {
            let status = child.wait().await;
            let stdout = join_stream(&mut stdout_task, limit).await;
            let stderr = join_stream(&mut stderr_task, limit).await;
            (status, stdout, stderr)
        };

        let result = tokio::time::timeout(deadline, collect).await;

        match result {
            Ok((Ok(status), stdout, stderr)) => {
                let exit_code = status.code();
                info!(
                    exit_code = ?exit_code,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Command finished"
                );
                ExecutionOutcome::Completed {
                    exit_code,
                    stdout,
                    stderr,
                }
            }
            Ok((Err(e), _, _)) => {
                warn!(error = %e, "Failed to wait for command");
                terminate(&mut child, process_group).await;
                ExecutionOutcome::LaunchFailed {
                    reason: format!("Failed to wait for '{}': {}", spec.program(), e),
                }
            }
            Err(_) => {
                terminate(&mut child, process_group).await;
                abort(&mut stdout_task);
                abort(&mut stderr_task);
                let elapsed = start.elapsed();
                warn!(
                    timeout_secs = spec.timeout().as_secs(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Command timed out and was killed"
                );
                ExecutionOutcome::TimedOut { elapsed }
            }
        }
    }
}

/// Kill the child's process group, then kill and reap the child itself
async fn terminate(child: &mut Child, process_group: Option<u32>) {
    #[cfg(unix)]
    if let Some(pgid) = process_group {
        // SAFETY: killpg has no memory-safety preconditions
        let rc = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
        if rc != 0 {
            debug!(
                pgid,
                error = %std::io::Error::last_os_error(),
                "killpg failed"
            );
        }
    }
    #[cfg(not(unix))]
    let _ = process_group;

    if let Err(e) = child.kill().await {
        debug!(error = %e, "Child already gone");
    }
}

fn abort(task: &mut Option<JoinHandle<Captured>>) {
    if let Some(handle) = task.take() {
        handle.abort();
    }
}

/// Bytes kept from one stream plus the total seen
struct Captured {
    bytes: Vec<u8>,
    total: usize,
}

impl Captured {
    fn into_text(self, limit: usize) -> String {
        let mut text = String::from_utf8_lossy(&self.bytes).into_owned();
        if self.total > self.bytes.len() {
            text.push_str(&format!(
                "\n[output truncated: {} bytes exceeded {} byte limit]",
                self.total, limit
            ));
        }
        text
    }
}

/// Read a pipe to EOF, keeping at most `limit` bytes
///
/// Reading continues past the limit so the child never blocks on a full pipe.
async fn drain<R: AsyncRead + Unpin>(mut reader: R, limit: usize) -> Captured {
    let mut bytes = Vec::new();
    let mut total = 0usize;
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                total += n;
                let room = limit.saturating_sub(bytes.len());
                bytes.extend_from_slice(&chunk[..n.min(room)]);
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(error = %e, "Stopped reading child stream");
                break;
            }
        }
    }

    Captured { bytes, total }
}

async fn join_stream(task: &mut Option<JoinHandle<Captured>>, limit: usize) -> String {
    let Some(handle) = task.as_mut() else {
        return String::new();
    };
    let text = match handle.await {
        Ok(captured) => captured.into_text(limit),
        Err(e) => {
            debug!(error = %e, "Stream reader task failed");
            String::new()
        }
    };
    *task = None;
    text
}
