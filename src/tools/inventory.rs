//! System inventory
//!
//! Read-only report of the host OS and which security tools are on `PATH`.
//! Lookups never fail the report: a tool that cannot be resolved is listed as
//! missing.

use super::command::CommandSpec;
use super::executor::{ExecutionOutcome, ProcessExecutor};
use super::result::ToolResult;
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// Tool binaries the gateway knows how to drive
pub const TOOL_BINARIES: [&str; 6] = ["nmap", "nikto", "sqlmap", "wpscan", "dirb", "searchsploit"];

/// Where (if anywhere) one tool binary was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolAvailability {
    pub name: &'static str,
    pub path: Option<PathBuf>,
}

impl ToolAvailability {
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInventory {
    /// `uname -a` output, or a fallback built from compile-time constants
    pub os: String,
    pub hostname: Option<String>,
    pub tools: Vec<ToolAvailability>,
}

impl SystemInventory {
    /// Collect the inventory, running `uname` through `executor`
    pub async fn collect(executor: &ProcessExecutor, uname: &CommandSpec) -> Self {
        let os = match executor.execute(uname).await {
            ExecutionOutcome::Completed {
                exit_code: Some(0),
                stdout,
                ..
            } if !stdout.trim().is_empty() => stdout.trim().to_string(),
            outcome => {
                debug!(?outcome, "uname unavailable, using built-in platform name");
                fallback_os()
            }
        };

        Self {
            os,
            hostname: local_hostname(),
            tools: probe_tools(None),
        }
    }

    pub fn available(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().filter(|t| t.is_available()).map(|t| t.name)
    }

    pub fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().filter(|t| !t.is_available()).map(|t| t.name)
    }

    /// Human-readable report
    pub fn render(&self) -> String {
        let mut lines = vec![format!("System: {}", self.os)];
        if let Some(ref name) = self.hostname {
            lines.push(format!("Hostname: {}", name));
        }
        lines.push(format!("Available tools: {}", join_or_none(self.available())));
        lines.push(format!("Missing tools: {}", join_or_none(self.missing())));
        lines.join("\n")
    }

    /// Wrap the report as a successful invocation result
    pub fn into_result(self, uname: &CommandSpec, started: Instant) -> ToolResult {
        ToolResult {
            command_display: uname.display(),
            exit_code: Some(0),
            stdout: self.render(),
            stderr: String::new(),
            succeeded: true,
            failure_kind: None,
            message: None,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Resolve each known tool against `search_path` (or `PATH` when `None`)
pub fn probe_tools(search_path: Option<OsString>) -> Vec<ToolAvailability> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));

    TOOL_BINARIES
        .iter()
        .map(|&name| {
            let found = match search_path {
                Some(ref paths) => which::which_in(name, Some(paths), &cwd),
                None => which::which(name),
            };
            let path = match found {
                Ok(path) => Some(path),
                Err(e) => {
                    debug!(tool = name, error = %e, "Tool not found");
                    None
                }
            };
            ToolAvailability { name, path }
        })
        .collect()
}

fn local_hostname() -> Option<String> {
    match hostname::get() {
        Ok(name) => Some(name.to_string_lossy().into_owned()),
        Err(e) => {
            debug!(error = %e, "Could not read host name");
            None
        }
    }
}

fn fallback_os() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

fn join_or_none<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
