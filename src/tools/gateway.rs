//! Validation and execution gateway
//!
//! [`ToolGateway::invoke`] is the only entry point callers need: it resolves
//! the operation name, validates the raw parameters, builds the argument
//! vector, runs it, and normalizes whatever happened into a [`ToolResult`].

use super::executor::ProcessExecutor;
use super::inventory::SystemInventory;
use super::operation::{GatewayError, Operation, OperationKind, RawParams};
use super::result::ToolResult;
use crate::logging::LogHandle;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct ToolGateway {
    executor: ProcessExecutor,
    log: LogHandle,
}

impl ToolGateway {
    pub fn new(executor: ProcessExecutor) -> Self {
        Self {
            executor,
            log: LogHandle::inherit(),
        }
    }

    /// Route gateway and executor log events through `log`
    pub fn with_log(mut self, log: LogHandle) -> Self {
        self.executor = self.executor.with_log(log.clone());
        self.log = log;
        self
    }

    /// Operations this gateway can invoke
    pub fn operations(&self) -> &'static [OperationKind] {
        &OperationKind::ALL
    }

    /// Run one invocation end to end
    ///
    /// Never fails: rejections, launch failures and timeouts all come back as
    /// a [`ToolResult`] with `succeeded == false`.
    pub async fn invoke(&self, name: &str, params: &RawParams) -> ToolResult {
        self.log
            .scope(async {
                let span = info_span!(
                    "invocation",
                    invocation_id = %Uuid::new_v4(),
                    operation = name
                );
                self.dispatch(name, params).instrument(span).await
            })
            .await
    }

    async fn dispatch(&self, name: &str, params: &RawParams) -> ToolResult {
        let operation =
            match OperationKind::from_name(name).and_then(|kind| Operation::from_raw(kind, params)) {
                Ok(operation) => operation,
                Err(e) => {
                    warn!(error = %e, "Rejected invocation");
                    return ToolResult::rejected(&e);
                }
            };

        let spec = match operation.build() {
            Ok(spec) => spec,
            Err(e) => {
                error!(error = %e, "Operation table produced an invalid command");
                return ToolResult::rejected(&GatewayError::from(e));
            }
        };

        let started = Instant::now();

        if operation.kind() == OperationKind::SystemInfo {
            let result = SystemInventory::collect(&self.executor, &spec)
                .await
                .into_result(&spec, started);
            info!(succeeded = true, "Inventory collected");
            return result;
        }

        let outcome = self.executor.execute(&spec).await;
        let result = ToolResult::normalize(&spec, outcome, started.elapsed());

        info!(
            succeeded = result.succeeded,
            failure_kind = ?result.failure_kind,
            duration_ms = result.duration_ms,
            "Invocation finished"
        );
        result
    }
}
