//! Mythril symbolic-execution adapter.

use std::{env, ffi::OsString, path::Path, time::Duration};

use infraforge_common::{
    env::MYTH_BIN,
    types::{AuditIssue, Severity},
};
use serde::Deserialize;

use crate::adapter::{Analyzer, ToolError};

/// Symbolic execution explores paths exhaustively and routinely takes
/// minutes on non-trivial contracts.
pub const MYTHRIL_TIMEOUT: Duration = Duration::from_secs(300);

const MYTHRIL: &str = "mythril";

/// Adapter for the mythril symbolic-execution analyzer.
///
/// Invokes `myth analyze <file> -o json` and reads the issue list from
/// stdout.
#[derive(Debug, Clone)]
pub struct Mythril {
    program: String,
}

impl Mythril {
    /// Adapter honoring the `MYTH_BIN` override when set, invoking `myth`
    /// from PATH otherwise.
    pub fn new() -> Self {
        Self { program: env::var(MYTH_BIN).unwrap_or_else(|_| "myth".to_string()) }
    }

    /// Adapter invoking an explicit binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for Mythril {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for Mythril {
    fn name(&self) -> &'static str {
        MYTHRIL
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn args(&self, target: &Path) -> Vec<OsString> {
        vec![
            OsString::from("analyze"),
            target.as_os_str().to_os_string(),
            OsString::from("-o"),
            OsString::from("json"),
        ]
    }

    fn timeout(&self) -> Duration {
        MYTHRIL_TIMEOUT
    }

    fn parse_output(&self, stdout: &str) -> Result<Vec<AuditIssue>, ToolError> {
        let output: MythrilOutput = serde_json::from_str(stdout)
            .map_err(|e| ToolError::Parse { tool: MYTHRIL, reason: e.to_string() })?;

        let error = output.error.filter(|e| !e.trim().is_empty());
        if !output.success || error.is_some() {
            let reason = error.unwrap_or_else(|| "mythril reported failure".to_string());
            return Err(ToolError::Failed { tool: MYTHRIL, reason });
        }

        Ok(output
            .issues
            .into_iter()
            .map(|issue| AuditIssue {
                tool: MYTHRIL.to_string(),
                severity: Severity::normalize(&issue.severity),
                description: issue.description.trim().to_string(),
                confidence: None,
                check: None,
                swc_id: issue.swc_id,
                line: issue.lineno,
            })
            .collect())
    }
}

// Envelope of `myth analyze -o json`.
#[derive(Debug, Deserialize)]
struct MythrilOutput {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    issues: Vec<MythrilIssue>,
}

#[derive(Debug, Deserialize)]
struct MythrilIssue {
    #[serde(default)]
    severity: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "swc-id", default)]
    swc_id: Option<String>,
    #[serde(default)]
    lineno: Option<u64>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_shape() {
        let mythril = Mythril::with_program("myth");
        let args = mythril.args(Path::new("/tmp/scratch/Contract.sol"));
        assert_eq!(
            args,
            vec![
                OsString::from("analyze"),
                OsString::from("/tmp/scratch/Contract.sol"),
                OsString::from("-o"),
                OsString::from("json")
            ]
        );
        assert_eq!(mythril.name(), "mythril");
        assert_eq!(mythril.timeout(), MYTHRIL_TIMEOUT);
    }

    #[test]
    fn issues_are_normalized() {
        let stdout = r#"{
            "success": true,
            "error": null,
            "issues": [
                {
                    "severity": "High",
                    "description": "Anyone can withdraw the contract balance.",
                    "swc-id": "105",
                    "lineno": 14
                },
                {
                    "severity": "Unknown",
                    "description": "Dependence on predictable environment variable."
                }
            ]
        }"#;

        let issues = Mythril::with_program("myth").parse_output(stdout).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].swc_id.as_deref(), Some("105"));
        assert_eq!(issues[0].line, Some(14));
        assert_eq!(issues[1].severity, Severity::Low);
        assert!(issues[1].swc_id.is_none());
    }

    #[test]
    fn reported_failure_is_an_error() {
        let stdout = r#"{"success": false, "error": "Solc experienced a fatal error", "issues": []}"#;
        let err = Mythril::with_program("myth").parse_output(stdout).unwrap_err();
        assert!(
            matches!(err, ToolError::Failed { reason, .. } if reason == "Solc experienced a fatal error")
        );
    }

    #[test]
    fn garbage_output_is_a_parse_error() {
        let err = Mythril::with_program("myth")
            .parse_output("mythril.exceptions.CriticalError")
            .unwrap_err();
        assert!(matches!(err, ToolError::Parse { tool: "mythril", .. }));
    }
}
