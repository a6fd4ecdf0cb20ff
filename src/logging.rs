//! Logging setup
//!
//! The binary installs one global `tracing` subscriber at startup. Library
//! components never log through an implicit global: they receive a
//! [`LogHandle`] and run each invocation inside it, which lets tests inject a
//! capturing subscriber.

use crate::config::LoggingConfig;
use anyhow::Result;
use std::future::Future;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Level};
use tracing_subscriber::EnvFilter;

/// Logger handle passed into the gateway and executor
///
/// An empty handle logs through whatever subscriber is the current default.
#[derive(Debug, Clone, Default)]
pub struct LogHandle {
    dispatch: Option<Dispatch>,
}

impl LogHandle {
    /// Log through the process default subscriber
    pub fn inherit() -> Self {
        Self::default()
    }

    /// Log through an explicit subscriber
    pub fn new(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    /// Run `future` with this handle's subscriber as the default
    pub async fn scope<F: Future>(&self, future: F) -> F::Output {
        match &self.dispatch {
            Some(dispatch) => future.with_subscriber(dispatch.clone()).await,
            None => future.await,
        }
    }
}

/// Install the global subscriber for the binary
///
/// Output goes to stderr: stdout is reserved for MCP frames and results.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        config.level()?
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format.to_lowercase().as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        _ => builder.compact().try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scope_routes_to_injected_subscriber() {
        let (handle, logs) = capture::handle();

        handle
            .scope(async {
                tracing::info!(marker = "scoped", "inside scope");
            })
            .await;
        tracing::info!("outside scope");

        let output = logs.contents();
        assert!(output.contains("inside scope"));
        assert!(output.contains("marker=\"scoped\""));
        assert!(!output.contains("outside scope"));
    }

    #[tokio::test]
    async fn test_separate_handles_do_not_share_output() {
        let (first, first_logs) = capture::handle();
        let (second, second_logs) = capture::handle();

        first.scope(async { tracing::warn!("first") }).await;
        second.scope(async { tracing::warn!("second") }).await;

        assert!(first_logs.contents().contains("first"));
        assert!(!first_logs.contents().contains("second"));
        assert!(second_logs.contents().contains("second"));
    }

    #[tokio::test]
    async fn test_inherit_handle_passes_value_through() {
        let handle = LogHandle::inherit();
        let value = handle.scope(async { 42 }).await;
        assert_eq!(value, 42);
    }
}
