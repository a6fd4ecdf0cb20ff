//! Execution Timeout Management
//!
//! Every operation has a fixed wall-clock bound chosen from its cost profile.
//! Timeouts are never taken from caller input.

use serde::Serialize;
use std::time::Duration;

/// Execution timeout configuration
///
/// Timeouts are enforced to prevent commands from hanging indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionTimeout {
    /// The timeout duration
    duration: Duration,
}

impl Default for ExecutionTimeout {
    fn default() -> Self {
        Self::standard()
    }
}

impl ExecutionTimeout {
    /// Create a new execution timeout
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use pentest_gateway::tools::ExecutionTimeout;
    ///
    /// let timeout = ExecutionTimeout::new(Duration::from_secs(30));
    /// assert_eq!(timeout.as_secs(), 30);
    /// ```
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Get the timeout duration
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whole seconds, for display
    pub fn as_secs(&self) -> u64 {
        self.duration.as_secs()
    }

    /// Local lookups such as `uname` (10 seconds)
    pub fn instant() -> Self {
        Self::from_secs(10)
    }

    /// Query-style tools that search a local database (1 minute)
    pub fn quick() -> Self {
        Self::from_secs(60)
    }

    /// Network scans (5 minutes, default)
    pub fn standard() -> Self {
        Self::from_secs(300)
    }

    /// Web crawlers and vulnerability scanners (10 minutes)
    pub fn long() -> Self {
        Self::from_secs(600)
    }

    /// Brute-force and injection probes (15 minutes)
    pub fn exhaustive() -> Self {
        Self::from_secs(900)
    }

    /// Create a timeout from seconds
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}
