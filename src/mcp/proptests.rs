//! Property-Based Tests for the MCP Server
//!
//! # Test Strategies
//!
//! - **Framing Robustness**: arbitrary input lines never panic the handler and
//!   malformed JSON always yields a parse error with a null id
//! - **Id Echo**: every answered request carries the caller's id back
//! - **String-Only Arguments**: any non-string argument value is rejected as
//!   invalid params before reaching the gateway
//!
//! # Running the Tests
//!
//! ```bash
//! cargo test --lib mcp::proptests
//! ```

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::mcp::protocol::{McpRequest, McpResponse};
use crate::mcp::server::{string_arguments, McpServer};
use crate::tools::ToolGateway;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn handle(line: &str) -> Option<McpResponse> {
    let server = McpServer::new(ToolGateway::default());
    block_on(server.handle_line(line))
}

// Helper: Generate arbitrary JSON-RPC ids
fn arb_id() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<u32>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9-]{1,16}".prop_map(Value::String),
    ]
}

// Helper: Generate JSON values that are not strings
fn arb_non_string() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        prop::collection::vec(any::<i64>().prop_map(|n| json!(n)), 0..3).prop_map(Value::Array),
        Just(json!({"nested": "value"})),
    ]
}

// ============================================================================
// Property 1: Framing Robustness
// ============================================================================

proptest! {
    #[test]
    fn prop_malformed_json_is_parse_error(line in "[ -~]{0,80}") {
        prop_assume!(serde_json::from_str::<Value>(&line).is_err());

        let response = handle(&line).unwrap();
        prop_assert_eq!(response.id, Value::Null);
        prop_assert_eq!(response.error.map(|e| e.code), Some(-32700));
    }

    /// Well-formed JSON that is not a request never panics the handler
    #[test]
    fn prop_non_request_json_is_answered(value in arb_non_string()) {
        let line = serde_json::to_string(&value).unwrap();
        let response = handle(&line).unwrap();
        prop_assert!(response.error.is_some());
    }
}

// ============================================================================
// Property 2: Id Echo
// ============================================================================

proptest! {
    #[test]
    fn prop_ping_echoes_id(id in arb_id()) {
        let request = McpRequest::new(id.clone(), "ping", None);
        let line = serde_json::to_string(&request).unwrap();

        let response = handle(&line).unwrap();
        prop_assert_eq!(&response.id, &id);
        prop_assert!(response.is_success());
    }

    #[test]
    fn prop_unknown_method_echoes_id(id in arb_id(), method in "[a-z]{1,10}/[a-z]{1,10}") {
        prop_assume!(method != "tools/list" && method != "tools/call");
        let request = McpRequest::new(id.clone(), method, None);
        let line = serde_json::to_string(&request).unwrap();

        let response = handle(&line).unwrap();
        prop_assert_eq!(&response.id, &id);
        prop_assert_eq!(response.error.map(|e| e.code), Some(-32601));
    }
}

// ============================================================================
// Property 3: String-Only Arguments
// ============================================================================

proptest! {
    #[test]
    fn prop_non_string_argument_rejected(key in "[a-z_]{1,12}", value in arb_non_string()) {
        let mut arguments = serde_json::Map::new();
        arguments.insert("target".to_string(), json!("10.0.0.5"));
        arguments.insert(key.clone(), value);

        // "target" may have been overwritten by a non-string; either way one value is bad
        let error = string_arguments(Some(Value::Object(arguments))).unwrap_err();
        prop_assert_eq!(error.code, -32602);
    }

    #[test]
    fn prop_string_arguments_pass_through(
        pairs in prop::collection::btree_map("[a-z_]{1,12}", "[ -~]{0,20}", 0..6)
    ) {
        let object: serde_json::Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        let raw = string_arguments(Some(Value::Object(object))).unwrap();
        prop_assert_eq!(raw.len(), pairs.len());
        for (k, v) in &pairs {
            prop_assert_eq!(raw.get(k), Some(v));
        }
    }
}
