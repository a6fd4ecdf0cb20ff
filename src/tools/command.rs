//! Command specification
//!
//! A [`CommandSpec`] is a pre-split argument vector plus its timeout. It is
//! handed to the executor as-is and never joined into a shell command line.

use super::timeout::ExecutionTimeout;
use super::validator::ValidatedParam;
use serde::Serialize;

/// Error raised when an operation's flag table produces an unusable command
///
/// These indicate a defect in the operation table, not bad caller input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Operation '{0}' produced an empty program name")]
    EmptyProgram(String),

    #[error("Operation '{operation}' produced an empty argument at position {position}")]
    EmptyArgument { operation: String, position: usize },
}

/// An ordered argument vector ready for launch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    timeout: ExecutionTimeout,
}

impl CommandSpec {
    /// Only the operation table and crate tests construct specs directly.
    pub(crate) fn new(program: &str, args: Vec<String>, timeout: ExecutionTimeout) -> Self {
        Self {
            program: program.to_string(),
            args,
            timeout,
        }
    }

    /// Program name (first argv entry)
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program name
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Wall-clock bound for this command
    pub fn timeout(&self) -> ExecutionTimeout {
        self.timeout
    }

    /// Full argument vector, program first
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Space-joined argv for humans; never re-parsed or executed
    pub fn display(&self) -> String {
        self.argv().join(" ")
    }

    /// Reject specs with an empty program or an empty token
    pub(crate) fn checked(self, operation: &str) -> Result<Self, BuildError> {
        if self.program.is_empty() {
            return Err(BuildError::EmptyProgram(operation.to_string()));
        }
        if let Some(position) = self.args.iter().position(|a| a.is_empty()) {
            return Err(BuildError::EmptyArgument {
                operation: operation.to_string(),
                position,
            });
        }
        Ok(self)
    }
}

/// Accumulates argv tokens from literals and validated values
///
/// Caller data enters only through [`ValidatedParam`].
pub(crate) struct ArgvBuilder {
    args: Vec<String>,
}

impl ArgvBuilder {
    pub(crate) fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Append fixed flags
    pub(crate) fn flags(mut self, flags: &[&'static str]) -> Self {
        self.args.extend(flags.iter().map(|f| f.to_string()));
        self
    }

    /// Append a validated value as its own token
    pub(crate) fn value(mut self, value: &ValidatedParam) -> Self {
        self.args.push(value.as_str().to_string());
        self
    }

    /// Append `flag` followed by the value, as two tokens
    pub(crate) fn option(mut self, flag: &'static str, value: &ValidatedParam) -> Self {
        self.args.push(flag.to_string());
        self.args.push(value.as_str().to_string());
        self
    }

    /// Append `flag value` when the value is present
    pub(crate) fn option_if(self, flag: &'static str, value: Option<&ValidatedParam>) -> Self {
        match value {
            Some(value) => self.option(flag, value),
            None => self,
        }
    }

    pub(crate) fn finish(self, program: &str, timeout: ExecutionTimeout) -> CommandSpec {
        CommandSpec::new(program, self.args, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::validator::{validate, ParamKind};

    #[test]
    fn test_argv_and_display() {
        let spec = CommandSpec::new(
            "echo",
            vec!["hello".to_string(), "world".to_string()],
            ExecutionTimeout::instant(),
        );
        assert_eq!(spec.argv(), vec!["echo", "hello", "world"]);
        assert_eq!(spec.display(), "echo hello world");
        assert_eq!(spec.program(), "echo");
        assert_eq!(spec.args().len(), 2);
    }

    #[test]
    fn test_builder_keeps_flag_and_value_separate() {
        let ports = validate("ports", ParamKind::PortRange, "22,80").unwrap();
        let target = validate("target", ParamKind::Host, "10.0.0.5").unwrap();

        let spec = ArgvBuilder::new()
            .flags(&["-sT"])
            .option("-p", &ports)
            .value(&target)
            .finish("nmap", ExecutionTimeout::standard());

        assert_eq!(spec.argv(), vec!["nmap", "-sT", "-p", "22,80", "10.0.0.5"]);
    }

    #[test]
    fn test_option_if_absent() {
        let spec = ArgvBuilder::new()
            .option_if("-p", None)
            .finish("nmap", ExecutionTimeout::standard());
        assert!(spec.args().is_empty());
    }

    #[test]
    fn test_checked_rejects_empty_program() {
        let spec = CommandSpec::new("", vec![], ExecutionTimeout::instant());
        assert_eq!(
            spec.checked("broken").unwrap_err(),
            BuildError::EmptyProgram("broken".to_string())
        );
    }

    #[test]
    fn test_checked_rejects_empty_token() {
        let spec = CommandSpec::new(
            "nmap",
            vec!["-sT".to_string(), String::new()],
            ExecutionTimeout::instant(),
        );
        assert!(matches!(
            spec.checked("nmap_scan"),
            Err(BuildError::EmptyArgument { position: 1, .. })
        ));
    }
}
