//! Property-Based Tests for Parameter Validation and Command Building
//!
//! # Test Strategies
//!
//! - **Metacharacter Rejection**: any Host or Path value carrying a shell
//!   metacharacter is rejected, wherever the character sits
//! - **Port Bounds**: every port in 1..=65535 validates to the same number;
//!   the values just outside the range reject
//! - **Token Boundaries**: every validated value lands in the argument vector
//!   as exactly one unmodified token
//!
//! # Running the Tests
//!
//! ```bash
//! cargo test --lib tools::proptests
//! ```

use proptest::prelude::*;

use crate::tools::operation::{Operation, OperationKind, RawParams};
use crate::tools::validator::{validate, ParamKind};

const METACHARACTERS: [char; 6] = [';', '|', '&', '$', '`', '\n'];

// Helper: a string that would pass the Host/Path grammar
fn arb_clean_host() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9._/]{0,30}"
}

// Helper: a clean string with one metacharacter spliced in
fn arb_tainted_host() -> impl Strategy<Value = String> {
    (arb_clean_host(), prop::sample::select(METACHARACTERS.to_vec()), any::<prop::sample::Index>())
        .prop_map(|(clean, meta, index)| {
            let mut chars: Vec<char> = clean.chars().collect();
            let at = index.index(chars.len() + 1);
            chars.insert(at, meta);
            chars.into_iter().collect()
        })
}

fn raw(pairs: &[(&str, &str)]) -> RawParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// Property 1: Metacharacter Rejection
// ============================================================================

proptest! {
    #[test]
    fn prop_host_rejects_metacharacters(value in arb_tainted_host()) {
        prop_assert!(validate("target", ParamKind::Host, &value).is_err());
    }

    #[test]
    fn prop_path_rejects_metacharacters(value in arb_tainted_host()) {
        prop_assert!(validate("wordlist", ParamKind::Path, &value).is_err());
    }

    #[test]
    fn prop_clean_host_accepted_verbatim(value in arb_clean_host()) {
        let validated = validate("target", ParamKind::Host, &value).unwrap();
        prop_assert_eq!(validated.as_str(), value.as_str());
    }

    /// Identifiers never accept anything beyond word characters
    #[test]
    fn prop_identifier_rejects_non_word(value in ".*[^A-Za-z0-9_].*") {
        prop_assert!(validate("database", ParamKind::Identifier, &value).is_err());
    }
}

// ============================================================================
// Property 2: Port Bounds
// ============================================================================

proptest! {
    #[test]
    fn prop_port_in_range_round_trips(port in 1u32..=65535) {
        let validated = validate("port", ParamKind::Port, &port.to_string()).unwrap();
        prop_assert_eq!(validated.port(), Some(port as u16));
        prop_assert_eq!(validated.as_str(), port.to_string());
    }

    #[test]
    fn prop_port_above_range_rejected(port in 65536u64..10_000_000) {
        prop_assert!(validate("port", ParamKind::Port, &port.to_string()).is_err());
    }
}

#[test]
fn test_port_boundaries() {
    assert!(validate("port", ParamKind::Port, "0").is_err());
    assert!(validate("port", ParamKind::Port, "65536").is_err());
    assert_eq!(validate("port", ParamKind::Port, "1").unwrap().port(), Some(1));
    assert_eq!(
        validate("port", ParamKind::Port, "65535").unwrap().port(),
        Some(65535)
    );
}

// ============================================================================
// Property 3: Token Boundaries
// ============================================================================

proptest! {
    #[test]
    fn prop_nmap_target_is_one_token(
        target in arb_clean_host(),
        ports in "[0-9]{1,5}(,[0-9]{1,5}){0,3}",
    ) {
        let spec = Operation::from_raw(
            OperationKind::NetworkScan,
            &raw(&[("target", &target), ("ports", &ports)]),
        )
        .unwrap()
        .build()
        .unwrap();

        let args = spec.args();
        prop_assert_eq!(args.last().map(String::as_str), Some(target.as_str()));
        let p = args.iter().position(|a| a == "-p").unwrap();
        prop_assert_eq!(args[p + 1].as_str(), ports.as_str());
        prop_assert!(args.iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn prop_search_query_is_one_token(query in "[A-Za-z0-9][A-Za-z0-9 .()_-]{0,40}") {
        let spec = Operation::from_raw(
            OperationKind::ExploitSearch,
            &raw(&[("query", &query)]),
        )
        .unwrap()
        .build()
        .unwrap();

        prop_assert_eq!(spec.args().len(), 1);
        prop_assert_eq!(spec.args()[0].as_str(), query.as_str());
    }

    #[test]
    fn prop_sqlmap_url_follows_flag(path in "[a-z0-9/]{0,20}") {
        let url = format!("http://shop.local/{}", path);
        let spec = Operation::from_raw(
            OperationKind::SqlInjection,
            &raw(&[("target", &url)]),
        )
        .unwrap()
        .build()
        .unwrap();

        prop_assert_eq!(&spec.args()[0], "-u");
        prop_assert_eq!(spec.args()[1].as_str(), url.as_str());
    }
}
