//! Result normalization
//!
//! Converts an [`ExecutionOutcome`] (or a pre-execution rejection) into the
//! single caller-facing [`ToolResult`] shape.

use super::command::CommandSpec;
use super::executor::ExecutionOutcome;
use super::operation::GatewayError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why an invocation did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    MissingParameter,
    UnknownOperation,
    Build,
    LaunchFailure,
    Timeout,
    NonZeroExit,
}

/// Caller-facing result of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Space-joined argv, for display only (empty if nothing was launched)
    pub command_display: String,

    /// Exit code (None if the process never exited on its own)
    pub exit_code: Option<i32>,

    /// Trimmed standard output
    pub stdout: String,

    /// Trimmed standard error
    pub stderr: String,

    /// Whether the tool ran and exited with code 0
    pub succeeded: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,

    /// Human-readable explanation for failures that carry no tool output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Wall-clock time spent in the executor, in milliseconds
    pub duration_ms: u64,
}

impl ToolResult {
    /// Normalize an execution outcome; total over every variant
    pub fn normalize(spec: &CommandSpec, outcome: ExecutionOutcome, elapsed: Duration) -> Self {
        let command_display = spec.display();
        let duration_ms = elapsed.as_millis() as u64;

        match outcome {
            ExecutionOutcome::Completed {
                exit_code,
                stdout,
                stderr,
            } => {
                let succeeded = exit_code == Some(0);
                Self {
                    command_display,
                    exit_code,
                    stdout: stdout.trim().to_string(),
                    stderr: stderr.trim().to_string(),
                    succeeded,
                    failure_kind: (!succeeded).then_some(FailureKind::NonZeroExit),
                    message: match exit_code {
                        Some(_) => None,
                        None => Some("Command was terminated by a signal".to_string()),
                    },
                    duration_ms,
                }
            }
            ExecutionOutcome::TimedOut { elapsed } => Self {
                command_display,
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                succeeded: false,
                failure_kind: Some(FailureKind::Timeout),
                message: Some(format!(
                    "Command timed out after {} seconds",
                    spec.timeout().as_secs()
                )),
                duration_ms: elapsed.as_millis() as u64,
            },
            ExecutionOutcome::LaunchFailed { reason } => Self {
                command_display,
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                succeeded: false,
                failure_kind: Some(FailureKind::LaunchFailure),
                message: Some(reason),
                duration_ms,
            },
        }
    }

    /// Result for an invocation rejected before launch
    pub fn rejected(error: &GatewayError) -> Self {
        let kind = match error {
            GatewayError::Validation(_) => FailureKind::Validation,
            GatewayError::MissingParameter { .. } => FailureKind::MissingParameter,
            GatewayError::UnknownOperation(_) => FailureKind::UnknownOperation,
            GatewayError::Build(_) => FailureKind::Build,
        };

        Self {
            command_display: String::new(),
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            succeeded: false,
            failure_kind: Some(kind),
            message: Some(error.to_string()),
            duration_ms: 0,
        }
    }

    /// Display string returned to callers
    pub fn render(&self) -> String {
        match self.failure_kind {
            None | Some(FailureKind::NonZeroExit) => {}
            Some(_) => {
                return format!("Error: {}", self.message.as_deref().unwrap_or("unknown failure"));
            }
        }

        let mut sections = Vec::new();
        if !self.stdout.is_empty() {
            sections.push(format!("STDOUT:\n{}", self.stdout));
        }
        if !self.stderr.is_empty() {
            sections.push(format!("STDERR:\n{}", self.stderr));
        }
        match self.exit_code {
            Some(0) => {}
            Some(code) => sections.push(format!("Return code: {}", code)),
            None => sections.push(
                self.message
                    .clone()
                    .unwrap_or_else(|| "Command did not exit normally".to_string()),
            ),
        }

        if sections.is_empty() {
            "Command completed with no output".to_string()
        } else {
            sections.join("\n\n")
        }
    }
}
