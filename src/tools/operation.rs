//! Operation table and command builder
//!
//! Each supported operation is a variant of [`Operation`] carrying only
//! validated parameters. [`Operation::from_raw`] is the single place where raw
//! caller strings are turned into those variants; [`Operation::build`] then maps
//! the variant onto a fixed flag sequence for its tool.

use super::command::{ArgvBuilder, BuildError, CommandSpec};
use super::timeout::ExecutionTimeout;
use super::validator::{validate, ParamKind, ValidatedParam, ValidationError};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Raw caller parameters, keyed by field name
pub type RawParams = HashMap<String, String>;

/// Wordlist passed to dirb when the caller does not name one
pub const DEFAULT_WORDLIST: &str = "/usr/share/dirb/wordlists/common.txt";

/// Port passed to nikto when the caller does not name one
pub const DEFAULT_WEB_PORT: &str = "80";

/// Enumeration mode passed to wpscan when the caller does not name one
pub const DEFAULT_ENUMERATE_MODE: &str = "vp";

/// Errors raised before a command is launched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Missing required parameter '{field}'")]
    MissingParameter { field: String },

    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("Internal command table error: {0}")]
    Build(#[from] BuildError),
}

/// The closed set of operations the gateway can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    NetworkScan,
    WebScan,
    SqlInjection,
    CmsScan,
    DirBruteforce,
    ExploitSearch,
    SystemInfo,
}

/// Description of one named parameter
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
}

const fn required(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        description,
        required: true,
        default: None,
    }
}

const fn optional(
    name: &'static str,
    description: &'static str,
    default: Option<&'static str>,
) -> ParamSpec {
    ParamSpec {
        name,
        description,
        required: false,
        default,
    }
}

const NMAP_PARAMS: &[ParamSpec] = &[
    required("target", "Host name, IP address or CIDR range"),
    optional(
        "scan_type",
        "basic, stealth, udp or comprehensive",
        Some("basic"),
    ),
    optional("ports", "Ports as digits, commas and dashes", None),
];

const NIKTO_PARAMS: &[ParamSpec] = &[
    required("target", "Host name or IP address"),
    optional("port", "Port between 1 and 65535", Some(DEFAULT_WEB_PORT)),
    optional("ssl", "\"true\" to force SSL", Some("false")),
];

const SQLMAP_PARAMS: &[ParamSpec] = &[
    required("target", "http:// or https:// URL"),
    optional("parameter", "Parameter to test", None),
    optional("database", "Database whose tables to list", None),
];

const WPSCAN_PARAMS: &[ParamSpec] = &[
    required("target", "http:// or https:// URL"),
    optional(
        "enumerate",
        "One of u, p, t, vp, vt, tt, cb, dbe",
        Some(DEFAULT_ENUMERATE_MODE),
    ),
];

const DIRB_PARAMS: &[ParamSpec] = &[
    required("target", "http:// or https:// URL"),
    optional("wordlist", "Wordlist path", Some(DEFAULT_WORDLIST)),
    optional("extensions", "Extensions such as .php,.html", None),
];

const SEARCHSPLOIT_PARAMS: &[ParamSpec] = &[
    required("query", "Search terms"),
    optional("exact", "\"true\" for an exact title match", Some("false")),
];

impl OperationKind {
    pub const ALL: [OperationKind; 7] = [
        Self::NetworkScan,
        Self::WebScan,
        Self::SqlInjection,
        Self::CmsScan,
        Self::DirBruteforce,
        Self::ExploitSearch,
        Self::SystemInfo,
    ];

    /// Name exposed to callers
    pub fn name(&self) -> &'static str {
        match self {
            Self::NetworkScan => "nmap_scan",
            Self::WebScan => "nikto_scan",
            Self::SqlInjection => "sqlmap_scan",
            Self::CmsScan => "wpscan_scan",
            Self::DirBruteforce => "dirb_scan",
            Self::ExploitSearch => "searchsploit_search",
            Self::SystemInfo => "system_info",
        }
    }

    /// Look up an operation by its caller-facing name
    pub fn from_name(name: &str) -> Result<Self, GatewayError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| GatewayError::UnknownOperation(name.to_string()))
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NetworkScan => "Perform network scanning with nmap",
            Self::WebScan => "Perform web vulnerability scanning with nikto",
            Self::SqlInjection => "Perform SQL injection testing with sqlmap",
            Self::CmsScan => "Perform WordPress scanning with wpscan",
            Self::DirBruteforce => "Perform directory bruteforcing with dirb",
            Self::ExploitSearch => "Search for exploits using searchsploit",
            Self::SystemInfo => "Get system information and available tools",
        }
    }

    /// Parameters accepted by this operation
    pub fn parameters(&self) -> &'static [ParamSpec] {
        match self {
            Self::NetworkScan => NMAP_PARAMS,
            Self::WebScan => NIKTO_PARAMS,
            Self::SqlInjection => SQLMAP_PARAMS,
            Self::CmsScan => WPSCAN_PARAMS,
            Self::DirBruteforce => DIRB_PARAMS,
            Self::ExploitSearch => SEARCHSPLOIT_PARAMS,
            Self::SystemInfo => &[],
        }
    }

    /// Fixed wall-clock bound for this operation's tool class
    pub fn timeout(&self) -> ExecutionTimeout {
        match self {
            Self::SystemInfo => ExecutionTimeout::instant(),
            Self::ExploitSearch => ExecutionTimeout::quick(),
            Self::NetworkScan => ExecutionTimeout::standard(),
            Self::WebScan | Self::CmsScan => ExecutionTimeout::long(),
            Self::SqlInjection | Self::DirBruteforce => ExecutionTimeout::exhaustive(),
        }
    }

    /// JSON Schema for the operation's parameters (all strings)
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in self.parameters() {
            let mut property = json!({
                "type": "string",
                "description": param.description,
            });
            if let Some(default) = param.default {
                property["default"] = json!(default);
            }
            properties.insert(param.name.to_string(), property);
            if param.required {
                required.push(param.name);
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// nmap scan profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanProfile {
    Basic,
    Stealth,
    Udp,
    Comprehensive,
    /// Plain TCP connect scan, used for unrecognized profiles
    Connect,
}

impl ScanProfile {
    /// Parse a profile name; unknown names fall back to [`ScanProfile::Connect`]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("basic") => Self::Basic,
            Some("stealth") => Self::Stealth,
            Some("udp") => Self::Udp,
            Some("comprehensive") => Self::Comprehensive,
            Some(_) => Self::Connect,
        }
    }

    pub fn flags(&self) -> &'static [&'static str] {
        match self {
            Self::Basic => &["-sT", "-O", "-sV"],
            Self::Stealth => &["-sS", "-O", "-sV"],
            Self::Udp => &["-sU"],
            Self::Comprehensive => &["-sS", "-sU", "-O", "-sV", "-sC"],
            Self::Connect => &["-sT"],
        }
    }
}

/// A fully validated request for one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    NetworkScan {
        target: ValidatedParam,
        profile: ScanProfile,
        ports: Option<ValidatedParam>,
    },
    WebScan {
        target: ValidatedParam,
        port: Option<ValidatedParam>,
        ssl: bool,
    },
    SqlInjection {
        target: ValidatedParam,
        parameter: Option<ValidatedParam>,
        database: Option<ValidatedParam>,
    },
    CmsScan {
        target: ValidatedParam,
        enumerate: Option<ValidatedParam>,
    },
    DirBruteforce {
        target: ValidatedParam,
        wordlist: Option<ValidatedParam>,
        extensions: Option<ValidatedParam>,
    },
    ExploitSearch {
        query: ValidatedParam,
        exact: bool,
    },
    SystemInfo,
}

impl Operation {
    /// Turn raw caller strings into a validated operation
    ///
    /// Required parameters are checked for presence first, so a missing
    /// field is reported as [`GatewayError::MissingParameter`] before any
    /// grammar check runs. Empty strings count as absent, so an empty
    /// `scan_type` selects the basic profile and an empty nikto `port`
    /// still passes `-p 80`.
    pub fn from_raw(kind: OperationKind, raw: &RawParams) -> Result<Self, GatewayError> {
        for param in kind.parameters().iter().filter(|p| p.required) {
            if field(raw, param.name).is_none() {
                return Err(GatewayError::MissingParameter {
                    field: param.name.to_string(),
                });
            }
        }

        let operation = match kind {
            OperationKind::NetworkScan => Self::NetworkScan {
                target: validate_required(raw, "target", ParamKind::Host)?,
                profile: ScanProfile::parse(field(raw, "scan_type")),
                ports: validate_optional(raw, "ports", ParamKind::PortRange)?,
            },
            OperationKind::WebScan => Self::WebScan {
                target: validate_required(raw, "target", ParamKind::Host)?,
                port: validate_optional(raw, "port", ParamKind::Port)?,
                ssl: flag(raw, "ssl"),
            },
            OperationKind::SqlInjection => Self::SqlInjection {
                target: validate_required(raw, "target", ParamKind::Url)?,
                parameter: validate_optional(raw, "parameter", ParamKind::Identifier)?,
                database: validate_optional(raw, "database", ParamKind::Identifier)?,
            },
            OperationKind::CmsScan => Self::CmsScan {
                target: validate_required(raw, "target", ParamKind::Url)?,
                enumerate: validate_optional(raw, "enumerate", ParamKind::EnumerateMode)?,
            },
            OperationKind::DirBruteforce => Self::DirBruteforce {
                target: validate_required(raw, "target", ParamKind::Url)?,
                wordlist: validate_optional(raw, "wordlist", ParamKind::Path)?,
                extensions: validate_optional(raw, "extensions", ParamKind::Extensions)?,
            },
            OperationKind::ExploitSearch => Self::ExploitSearch {
                query: validate_required(raw, "query", ParamKind::FreeTextQuery)?,
                exact: flag(raw, "exact"),
            },
            OperationKind::SystemInfo => Self::SystemInfo,
        };

        Ok(operation)
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::NetworkScan { .. } => OperationKind::NetworkScan,
            Self::WebScan { .. } => OperationKind::WebScan,
            Self::SqlInjection { .. } => OperationKind::SqlInjection,
            Self::CmsScan { .. } => OperationKind::CmsScan,
            Self::DirBruteforce { .. } => OperationKind::DirBruteforce,
            Self::ExploitSearch { .. } => OperationKind::ExploitSearch,
            Self::SystemInfo => OperationKind::SystemInfo,
        }
    }

    /// Assemble the argument vector for this operation
    pub fn build(&self) -> Result<CommandSpec, BuildError> {
        let kind = self.kind();
        let timeout = kind.timeout();

        let spec = match self {
            Self::NetworkScan {
                target,
                profile,
                ports,
            } => ArgvBuilder::new()
                .flags(profile.flags())
                .option_if("-p", ports.as_ref())
                .value(target)
                .finish("nmap", timeout),

            Self::WebScan { target, port, ssl } => {
                let argv = ArgvBuilder::new().option("-h", target);
                let argv = match port {
                    Some(port) => argv.option("-p", port),
                    None => argv.flags(&["-p", DEFAULT_WEB_PORT]),
                };
                let argv = if *ssl { argv.flags(&["-ssl"]) } else { argv };
                argv.finish("nikto", timeout)
            }

            Self::SqlInjection {
                target,
                parameter,
                database,
            } => {
                let argv = ArgvBuilder::new()
                    .option("-u", target)
                    .flags(&["--batch", "--level=1", "--risk=1"])
                    .option_if("-p", parameter.as_ref());
                let argv = match database {
                    Some(db) => argv.option("-D", db).flags(&["--tables"]),
                    None => argv,
                };
                argv.finish("sqlmap", timeout)
            }

            Self::CmsScan { target, enumerate } => {
                let argv = ArgvBuilder::new()
                    .option("--url", target)
                    .flags(&["--no-update"]);
                let argv = match enumerate {
                    Some(mode) => argv.option("--enumerate", mode),
                    None => argv.flags(&["--enumerate", DEFAULT_ENUMERATE_MODE]),
                };
                argv.finish("wpscan", timeout)
            }

            Self::DirBruteforce {
                target,
                wordlist,
                extensions,
            } => {
                let argv = ArgvBuilder::new().value(target);
                let argv = match wordlist {
                    Some(path) => argv.value(path),
                    None => argv.flags(&[DEFAULT_WORDLIST]),
                };
                argv.option_if("-X", extensions.as_ref())
                    .finish("dirb", timeout)
            }

            Self::ExploitSearch { query, exact } => {
                let argv = if *exact {
                    ArgvBuilder::new().flags(&["--exact"])
                } else {
                    ArgvBuilder::new()
                };
                argv.value(query).finish("searchsploit", timeout)
            }

            Self::SystemInfo => ArgvBuilder::new().flags(&["-a"]).finish("uname", timeout),
        };

        spec.checked(kind.name())
    }
}

/// Non-empty raw value for `name`
fn field<'a>(raw: &'a RawParams, name: &str) -> Option<&'a str> {
    raw.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

/// Boolean switch: only a case-insensitive "true" turns it on
fn flag(raw: &RawParams, name: &str) -> bool {
    field(raw, name).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn validate_required(
    raw: &RawParams,
    name: &str,
    kind: ParamKind,
) -> Result<ValidatedParam, GatewayError> {
    let value = field(raw, name).ok_or_else(|| GatewayError::MissingParameter {
        field: name.to_string(),
    })?;
    Ok(validate(name, kind, value)?)
}

fn validate_optional(
    raw: &RawParams,
    name: &str,
    kind: ParamKind,
) -> Result<Option<ValidatedParam>, GatewayError> {
    field(raw, name)
        .map(|value| validate(name, kind, value))
        .transpose()
        .map_err(GatewayError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RawParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build(kind: OperationKind, pairs: &[(&str, &str)]) -> Result<CommandSpec, GatewayError> {
        Ok(Operation::from_raw(kind, &params(pairs))?.build()?)
    }

    #[test]
    fn test_nmap_comprehensive() {
        let spec = build(
            OperationKind::NetworkScan,
            &[("target", "10.0.0.5"), ("scan_type", "comprehensive")],
        )
        .unwrap();
        assert_eq!(
            spec.argv(),
            vec!["nmap", "-sS", "-sU", "-O", "-sV", "-sC", "10.0.0.5"]
        );
        assert_eq!(spec.timeout(), ExecutionTimeout::standard());
    }

    #[test]
    fn test_nmap_profiles() {
        let cases = vec![
            ("basic", vec!["-sT", "-O", "-sV"]),
            ("stealth", vec!["-sS", "-O", "-sV"]),
            ("udp", vec!["-sU"]),
            ("bogus", vec!["-sT"]),
        ];

        for (profile, flags) in cases {
            let spec = build(
                OperationKind::NetworkScan,
                &[("target", "example.com"), ("scan_type", profile)],
            )
            .unwrap();
            let mut expected = vec!["nmap"];
            expected.extend(flags);
            expected.push("example.com");
            assert_eq!(spec.argv(), expected, "profile: {}", profile);
        }
    }

    #[test]
    fn test_nmap_default_profile_is_basic() {
        let spec = build(OperationKind::NetworkScan, &[("target", "example.com")]).unwrap();
        assert_eq!(spec.argv(), vec!["nmap", "-sT", "-O", "-sV", "example.com"]);
    }

    #[test]
    fn test_nmap_with_ports() {
        let spec = build(
            OperationKind::NetworkScan,
            &[("target", "10.0.0.5"), ("ports", "22,80,8000-8100")],
        )
        .unwrap();
        assert_eq!(
            spec.argv(),
            vec!["nmap", "-sT", "-O", "-sV", "-p", "22,80,8000-8100", "10.0.0.5"]
        );
    }

    #[test]
    fn test_nmap_rejects_bad_ports() {
        let err = build(
            OperationKind::NetworkScan,
            &[("target", "10.0.0.5"), ("ports", "22 && id")],
        )
        .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(ref e) if e.kind == ParamKind::PortRange));
    }

    #[test]
    fn test_missing_target_fails_before_validation() {
        // ports would also fail validation, but the missing target wins
        let err = build(OperationKind::NetworkScan, &[("ports", ";")]).unwrap_err();
        assert_eq!(
            err,
            GatewayError::MissingParameter {
                field: "target".to_string()
            }
        );

        let err = build(OperationKind::NetworkScan, &[("target", "")]).unwrap_err();
        assert!(matches!(err, GatewayError::MissingParameter { .. }));
    }

    #[test]
    fn test_nikto_defaults_and_ssl() {
        let spec = build(OperationKind::WebScan, &[("target", "example.com")]).unwrap();
        assert_eq!(spec.argv(), vec!["nikto", "-h", "example.com", "-p", "80"]);

        let spec = build(
            OperationKind::WebScan,
            &[("target", "example.com"), ("port", "0443"), ("ssl", "TRUE")],
        )
        .unwrap();
        assert_eq!(
            spec.argv(),
            vec!["nikto", "-h", "example.com", "-p", "443", "-ssl"]
        );
        assert_eq!(spec.timeout(), ExecutionTimeout::long());
    }

    #[test]
    fn test_nikto_rejects_port_out_of_range() {
        let err = build(
            OperationKind::WebScan,
            &[("target", "example.com"), ("port", "70000")],
        )
        .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(ref e) if e.kind == ParamKind::Port));
    }

    #[test]
    fn test_sqlmap() {
        let spec = build(
            OperationKind::SqlInjection,
            &[
                ("target", "http://shop.local/item?id=1"),
                ("parameter", "id"),
                ("database", "shop"),
            ],
        )
        .unwrap();
        assert_eq!(
            spec.argv(),
            vec![
                "sqlmap",
                "-u",
                "http://shop.local/item?id=1",
                "--batch",
                "--level=1",
                "--risk=1",
                "-p",
                "id",
                "-D",
                "shop",
                "--tables"
            ]
        );
        assert_eq!(spec.timeout(), ExecutionTimeout::exhaustive());
    }

    #[test]
    fn test_sqlmap_rejects_injected_database() {
        let err = build(
            OperationKind::SqlInjection,
            &[("target", "http://x"), ("database", "users; DROP TABLE x")],
        )
        .unwrap_err();
        match err {
            GatewayError::Validation(e) => {
                assert_eq!(e.kind, ParamKind::Identifier);
                assert_eq!(e.field, "database");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_sqlmap_requires_http_url() {
        let err = build(OperationKind::SqlInjection, &[("target", "ftp://x")]).unwrap_err();
        assert!(matches!(err, GatewayError::Validation(ref e) if e.kind == ParamKind::Url));
    }

    #[test]
    fn test_wpscan() {
        let spec = build(OperationKind::CmsScan, &[("target", "https://blog.local")]).unwrap();
        assert_eq!(
            spec.argv(),
            vec![
                "wpscan",
                "--url",
                "https://blog.local",
                "--no-update",
                "--enumerate",
                "vp"
            ]
        );

        let spec = build(
            OperationKind::CmsScan,
            &[("target", "https://blog.local"), ("enumerate", "u")],
        )
        .unwrap();
        assert_eq!(spec.args().last().map(String::as_str), Some("u"));
    }

    #[test]
    fn test_wpscan_rejects_unknown_enumerate() {
        let err = build(
            OperationKind::CmsScan,
            &[("target", "https://blog.local"), ("enumerate", "ap")],
        )
        .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(ref e) if e.kind == ParamKind::EnumerateMode));
    }

    #[test]
    fn test_dirb_default_wordlist() {
        let spec = build(OperationKind::DirBruteforce, &[("target", "http://x")]).unwrap();
        assert_eq!(spec.argv(), vec!["dirb", "http://x", DEFAULT_WORDLIST]);
        assert!(spec.args().iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn test_dirb_with_wordlist_and_extensions() {
        let spec = build(
            OperationKind::DirBruteforce,
            &[
                ("target", "http://x"),
                ("wordlist", "/opt/lists/small.txt"),
                ("extensions", ".php,.bak"),
            ],
        )
        .unwrap();
        assert_eq!(
            spec.argv(),
            vec!["dirb", "http://x", "/opt/lists/small.txt", "-X", ".php,.bak"]
        );
    }

    #[test]
    fn test_searchsploit() {
        let spec = build(OperationKind::ExploitSearch, &[("query", "apache 2.4")]).unwrap();
        assert_eq!(spec.argv(), vec!["searchsploit", "apache 2.4"]);
        assert_eq!(spec.timeout(), ExecutionTimeout::quick());

        let spec = build(
            OperationKind::ExploitSearch,
            &[("query", "apache 2.4"), ("exact", "true")],
        )
        .unwrap();
        assert_eq!(spec.argv(), vec!["searchsploit", "--exact", "apache 2.4"]);
    }

    #[test]
    fn test_searchsploit_missing_query() {
        let err = build(OperationKind::ExploitSearch, &[]).unwrap_err();
        assert_eq!(
            err,
            GatewayError::MissingParameter {
                field: "query".to_string()
            }
        );
    }

    #[test]
    fn test_system_info() {
        let spec = build(OperationKind::SystemInfo, &[]).unwrap();
        assert_eq!(spec.argv(), vec!["uname", "-a"]);
        assert_eq!(spec.timeout(), ExecutionTimeout::instant());
    }

    #[test]
    fn test_operation_names_round_trip() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_name(kind.name()).unwrap(), kind);
        }
        assert_eq!(
            OperationKind::from_name("rm_rf").unwrap_err(),
            GatewayError::UnknownOperation("rm_rf".to_string())
        );
    }

    #[test]
    fn test_input_schema_lists_required_fields() {
        let schema = OperationKind::NetworkScan.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["target"]));
        assert_eq!(schema["properties"]["scan_type"]["default"], "basic");
        assert_eq!(schema["properties"]["ports"]["type"], "string");

        let schema = OperationKind::SystemInfo.input_schema();
        assert_eq!(schema["required"], json!([]));
    }

    #[test]
    fn test_parameter_tables() {
        let names = |kind: OperationKind| -> Vec<&'static str> {
            kind.parameters().iter().map(|p| p.name).collect()
        };
        assert_eq!(names(OperationKind::NetworkScan), vec!["target", "scan_type", "ports"]);
        assert_eq!(names(OperationKind::WebScan), vec!["target", "port", "ssl"]);
        assert_eq!(names(OperationKind::SqlInjection), vec!["target", "parameter", "database"]);
        assert_eq!(names(OperationKind::CmsScan), vec!["target", "enumerate"]);
        assert_eq!(names(OperationKind::DirBruteforce), vec!["target", "wordlist", "extensions"]);
        assert_eq!(names(OperationKind::ExploitSearch), vec!["query", "exact"]);
        assert!(OperationKind::SystemInfo.parameters().is_empty());

        for kind in OperationKind::ALL {
            let required: Vec<_> = kind.parameters().iter().filter(|p| p.required).collect();
            assert!(required.len() <= 1, "{} has several required fields", kind);
            assert!(required.iter().all(|p| p.default.is_none()));
        }
    }

    #[test]
    fn test_empty_optional_values_use_defaults() {
        let spec = build(
            OperationKind::NetworkScan,
            &[("target", "10.0.0.5"), ("scan_type", "")],
        )
        .unwrap();
        assert_eq!(spec.argv(), vec!["nmap", "-sT", "-O", "-sV", "10.0.0.5"]);

        let spec = build(OperationKind::WebScan, &[("target", "example.com"), ("port", "")]).unwrap();
        assert_eq!(spec.argv(), vec!["nikto", "-h", "example.com", "-p", "80"]);
    }

    #[test]
    fn test_every_operation_has_nonzero_timeout() {
        for kind in OperationKind::ALL {
            assert!(kind.timeout().as_secs() > 0, "{}", kind);
        }
    }
}
