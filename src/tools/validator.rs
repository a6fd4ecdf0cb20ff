//! Parameter Validation Module
//!
//! This module classifies raw caller strings against strict, anchored grammars.
//! It uses an allow-list approach: a value is accepted only if every character
//! belongs to the grammar of its kind, everything else is rejected.
//!
//! A [`ValidatedParam`] can only be obtained through [`validate`], so any value
//! that reaches the command builder has already passed exactly one grammar check.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Accepted `--enumerate` tokens for WordPress scans
pub const ENUMERATE_MODES: &[&str] = &["u", "p", "t", "vp", "vt", "tt", "cb", "dbe"];

lazy_static! {
    static ref HOST_PATH_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9._/\-]+$").unwrap();
    static ref PORT_RANGE_PATTERN: Regex = Regex::new(r"^[0-9,\-]+$").unwrap();
    static ref IDENTIFIER_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
    static ref EXTENSIONS_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9,.]+$").unwrap();
    static ref QUERY_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9\s.\-_()\[\]]+$").unwrap();
}

/// The grammar a parameter is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParamKind {
    /// Host name or IP address
    Host,
    /// Filesystem path (e.g. a wordlist)
    Path,
    /// Single TCP/UDP port
    Port,
    /// Port list such as `22,80,8000-8100`
    PortRange,
    /// `http://` or `https://` URL
    Url,
    /// SQL parameter or database name
    Identifier,
    /// WordPress enumeration token from [`ENUMERATE_MODES`]
    EnumerateMode,
    /// Comma separated file extensions
    Extensions,
    /// Exploit database search text
    FreeTextQuery,
}

impl ParamKind {
    /// Human-readable description of the accepted grammar
    pub fn grammar(&self) -> &'static str {
        match self {
            Self::Host | Self::Path => "letters, digits, '.', '_', '/', '-'",
            Self::Port => "an integer between 1 and 65535",
            Self::PortRange => "digits, ',' and '-'",
            Self::Url => "a URL starting with http:// or https://",
            Self::Identifier => "letters, digits and '_'",
            Self::EnumerateMode => "one of u, p, t, vp, vt, tt, cb, dbe",
            Self::Extensions => "letters, digits, ',' and '.'",
            Self::FreeTextQuery => "letters, digits, whitespace and . - _ ( ) [ ]",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Host => "Host",
            Self::Path => "Path",
            Self::Port => "Port",
            Self::PortRange => "PortRange",
            Self::Url => "Url",
            Self::Identifier => "Identifier",
            Self::EnumerateMode => "EnumerateMode",
            Self::Extensions => "Extensions",
            Self::FreeTextQuery => "FreeTextQuery",
        };
        f.write_str(name)
    }
}

/// Rule that a rejected value broke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Empty,
    InvalidCharacters,
    LeadingDash,
    NotANumber,
    PortOutOfRange(u64),
    BadScheme,
    NotInAllowList,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "value is empty"),
            Self::InvalidCharacters => write!(f, "value contains characters outside the allowed set"),
            Self::LeadingDash => write!(f, "value must not start with '-'"),
            Self::NotANumber => write!(f, "value is not a decimal integer"),
            Self::PortOutOfRange(n) => write!(f, "port {} is outside 1-65535", n),
            Self::BadScheme => write!(f, "value must start with http:// or https://"),
            Self::NotInAllowList => write!(f, "value is not an accepted token"),
        }
    }
}

/// Error returned when a raw parameter does not match its grammar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind} for '{field}': {violation} (expected {})", .kind.grammar())]
pub struct ValidationError {
    /// Name of the offending parameter
    pub field: String,

    /// Grammar the value was checked against
    pub kind: ParamKind,

    /// Rule that was broken
    pub violation: Violation,
}

/// A parameter value proven to conform to its grammar
///
/// Instances are immutable and can only be created by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedParam {
    kind: ParamKind,
    value: String,
}

impl ValidatedParam {
    /// Grammar this value passed
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// The validated (and for ports, normalized) value
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Port number, for values of kind [`ParamKind::Port`]
    pub fn port(&self) -> Option<u16> {
        match self.kind {
            ParamKind::Port => self.value.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ValidatedParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Validate a raw string for the named field against `kind`
///
/// Matching is always anchored at both ends. Rejections are returned as
/// [`ValidationError`] values naming the kind and the broken rule.
///
/// # Example
///
/// ```
/// use pentest_gateway::tools::{validate, ParamKind};
///
/// let port = validate("port", ParamKind::Port, "0080").unwrap();
/// assert_eq!(port.as_str(), "80");
///
/// assert!(validate("target", ParamKind::Host, "example.com; id").is_err());
/// ```
pub fn validate(field: &str, kind: ParamKind, raw: &str) -> Result<ValidatedParam, ValidationError> {
    let reject = |violation| ValidationError {
        field: field.to_string(),
        kind,
        violation,
    };

    if raw.is_empty() {
        return Err(reject(Violation::Empty));
    }

    let value = match kind {
        ParamKind::Host | ParamKind::Path => {
            check_pattern(&HOST_PATH_PATTERN, raw).map_err(reject)?;
            check_no_leading_dash(raw).map_err(reject)?;
            if raw.contains("..") {
                warn!(field, kind = %kind, "Accepted value containing '..'");
            }
            raw.to_string()
        }
        ParamKind::Port => {
            if !raw.bytes().all(|b| b.is_ascii_digit()) {
                return Err(reject(Violation::NotANumber));
            }
            let port: u64 = raw
                .parse()
                .map_err(|_| reject(Violation::PortOutOfRange(u64::MAX)))?;
            if !(1..=65535).contains(&port) {
                return Err(reject(Violation::PortOutOfRange(port)));
            }
            port.to_string()
        }
        ParamKind::PortRange => {
            check_pattern(&PORT_RANGE_PATTERN, raw).map_err(reject)?;
            check_no_leading_dash(raw).map_err(reject)?;
            raw.to_string()
        }
        ParamKind::Url => {
            if !(raw.starts_with("http://") || raw.starts_with("https://")) {
                return Err(reject(Violation::BadScheme));
            }
            // argv entries cannot carry NUL
            if raw.contains('\0') {
                return Err(reject(Violation::InvalidCharacters));
            }
            raw.to_string()
        }
        ParamKind::Identifier => {
            check_pattern(&IDENTIFIER_PATTERN, raw).map_err(reject)?;
            raw.to_string()
        }
        ParamKind::EnumerateMode => {
            if !ENUMERATE_MODES.contains(&raw) {
                return Err(reject(Violation::NotInAllowList));
            }
            raw.to_string()
        }
        ParamKind::Extensions => {
            check_pattern(&EXTENSIONS_PATTERN, raw).map_err(reject)?;
            raw.to_string()
        }
        ParamKind::FreeTextQuery => {
            check_pattern(&QUERY_PATTERN, raw).map_err(reject)?;
            check_no_leading_dash(raw).map_err(reject)?;
            raw.to_string()
        }
    };

    Ok(ValidatedParam { kind, value })
}

fn check_pattern(pattern: &Regex, raw: &str) -> Result<(), Violation> {
    if pattern.is_match(raw) {
        Ok(())
    } else {
        Err(Violation::InvalidCharacters)
    }
}

/// A leading '-' would be parsed as an option by the invoked tool
fn check_no_leading_dash(raw: &str) -> Result<(), Violation> {
    if raw.starts_with('-') {
        Err(Violation::LeadingDash)
    } else {
        Ok(())
    }
}
