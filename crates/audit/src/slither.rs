//! Slither static-analysis adapter.

use std::{env, ffi::OsString, path::Path, time::Duration};

use infraforge_common::{
    env::SLITHER_BIN,
    types::{AuditIssue, Severity},
};
use serde::Deserialize;

use crate::adapter::{Analyzer, ToolError};

/// Static analysis finishes fast; a minute covers even large contracts.
pub const SLITHER_TIMEOUT: Duration = Duration::from_secs(60);

const SLITHER: &str = "slither";

/// Adapter for the slither static analyzer.
///
/// Invokes `slither <file> --json -` and reads detector results from the
/// JSON envelope on stdout.
#[derive(Debug, Clone)]
pub struct Slither {
    program: String,
}

impl Slither {
    /// Adapter honoring the `SLITHER_BIN` override when set, invoking
    /// `slither` from PATH otherwise.
    pub fn new() -> Self {
        Self { program: env::var(SLITHER_BIN).unwrap_or_else(|_| SLITHER.to_string()) }
    }

    /// Adapter invoking an explicit binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for Slither {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for Slither {
    fn name(&self) -> &'static str {
        SLITHER
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn args(&self, target: &Path) -> Vec<OsString> {
        vec![target.as_os_str().to_os_string(), OsString::from("--json"), OsString::from("-")]
    }

    fn timeout(&self) -> Duration {
        SLITHER_TIMEOUT
    }

    fn parse_output(&self, stdout: &str) -> Result<Vec<AuditIssue>, ToolError> {
        let output: SlitherOutput = serde_json::from_str(stdout)
            .map_err(|e| ToolError::Parse { tool: SLITHER, reason: e.to_string() })?;

        let error = output.error.filter(|e| !e.trim().is_empty());
        if !output.success || error.is_some() {
            let reason = error.unwrap_or_else(|| "slither reported failure".to_string());
            return Err(ToolError::Failed { tool: SLITHER, reason });
        }

        Ok(output
            .results
            .detectors
            .into_iter()
            .map(|detector| AuditIssue {
                tool: SLITHER.to_string(),
                severity: Severity::normalize(&detector.impact),
                description: detector.description.trim().to_string(),
                confidence: detector.confidence,
                check: detector.check,
                swc_id: None,
                line: None,
            })
            .collect())
    }
}

// Envelope of `slither <file> --json -`. Only the fields the normalizer
// reads are modeled; everything else in the report is ignored.
#[derive(Debug, Deserialize)]
struct SlitherOutput {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    results: SlitherResults,
}

#[derive(Debug, Default, Deserialize)]
struct SlitherResults {
    #[serde(default)]
    detectors: Vec<SlitherDetector>,
}

#[derive(Debug, Deserialize)]
struct SlitherDetector {
    #[serde(default)]
    impact: String,
    #[serde(default)]
    confidence: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    check: Option<String>,
}

fn default_true() -> bool {
    true
}
