//! Tool Execution Subsystem
//!
//! This module turns untrusted string parameters into bounded runs of external
//! security tools. Every invocation flows through the same stages:
//!
//! 1. **Validation** (`validator.rs`): each raw value is matched against one
//!    fixed, anchored grammar and becomes a [`ValidatedParam`]
//! 2. **Command building** (`operation.rs`, `command.rs`): a closed
//!    [`Operation`] maps its validated fields onto a fixed flag table,
//!    producing a pre-split [`CommandSpec`]
//! 3. **Execution** (`executor.rs`, `timeout.rs`): the argv is launched without
//!    a shell, both streams are drained concurrently, and the process group is
//!    killed at the deadline
//! 4. **Normalization** (`result.rs`): whatever happened becomes one
//!    [`ToolResult`]
//!
//! [`ToolGateway`] (`gateway.rs`) wires the stages together; `inventory.rs`
//! answers the read-only `system_info` operation.
//!
//! # Example
//!
//! ```no_run
//! use pentest_gateway::tools::{RawParams, ToolGateway};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = ToolGateway::default();
//!
//!     let mut params = RawParams::new();
//!     params.insert("target".to_string(), "10.0.0.5".to_string());
//!     params.insert("scan_type".to_string(), "stealth".to_string());
//!
//!     let result = gateway.invoke("nmap_scan", &params).await;
//!     println!("{}", result.render());
//! }
//! ```

mod command;
mod executor;
mod gateway;
mod inventory;
mod operation;
mod result;
mod timeout;
mod validator;

#[cfg(test)]
mod proptests;

pub use command::{BuildError, CommandSpec};
pub use executor::{ExecutionOutcome, ExecutorConfig, ProcessExecutor, MAX_OUTPUT_SIZE};
pub use gateway::ToolGateway;
pub use inventory::{probe_tools, SystemInventory, ToolAvailability, TOOL_BINARIES};
pub use operation::{
    GatewayError, Operation, OperationKind, ParamSpec, RawParams, ScanProfile, DEFAULT_ENUMERATE_MODE,
    DEFAULT_WEB_PORT, DEFAULT_WORDLIST,
};
pub use result::{FailureKind, ToolResult};
pub use timeout::ExecutionTimeout;
pub use validator::{
    validate, ParamKind, ValidatedParam, ValidationError, Violation, ENUMERATE_MODES,
};
