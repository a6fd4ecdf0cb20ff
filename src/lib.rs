//! Pentest Gateway Library
//!
//! This library validates untrusted tool parameters, builds fixed argument
//! vectors for a closed set of security tools, runs them under a deadline and
//! normalizes the outcome. The `mcp` module exposes the same gateway to MCP
//! clients over stdio.

pub mod config;
pub mod logging;
pub mod mcp;
pub mod tools;
