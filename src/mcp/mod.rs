//! MCP (Model Context Protocol) Server
//!
//! Exposes the tool gateway to MCP clients over stdio, built directly on
//! Tokio and Serde (no external SDK).
//!
//! # Architecture
//!
//! 1. **Protocol Layer** (`protocol`): JSON-RPC 2.0 message types
//! 2. **Server Layer** (`server`): line framing and method dispatch
//!
//! Every operation parameter crosses this boundary as a JSON string; the
//! gateway does its own validation.

// Protocol layer: JSON-RPC 2.0 message types
pub mod protocol;

// Server layer: stdio loop and dispatch
pub mod server;

pub use protocol::{
    McpError, McpMethod, McpRequest, McpResponse, ServerInfo, Tool, ToolCallParams,
    ToolCallResult, ToolContent,
};
pub use server::McpServer;

// Property-based tests module
#[cfg(test)]
mod proptests;
