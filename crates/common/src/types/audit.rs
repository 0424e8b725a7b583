// InfraForge - Multi-chain Smart Contract Deployment & Auditing
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Default filename given to audited source text inside an adapter's scratch
/// directory. Solidity tooling keys diagnostics on the filename, so it must
/// look like a real contract file.
pub const DEFAULT_AUDIT_FILENAME: &str = "Contract.sol";

fn default_audit_filename() -> String {
    DEFAULT_AUDIT_FILENAME.to_string()
}

/// A request to audit a piece of contract source code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRequest {
    /// Solidity source text to analyze.
    pub code: String,
    /// Filename under which the source is materialized for the tools.
    #[serde(default = "default_audit_filename")]
    pub filename: String,
}

/// Normalized severity of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Exploitable or funds-threatening.
    High,
    /// Significant but conditional.
    Medium,
    /// Informational or best-practice.
    Low,
}

impl Severity {
    /// Map a tool-reported severity string into the normalized set.
    ///
    /// Anything outside {high, medium, low} (case-insensitive) lands in
    /// [`Severity::Low`] so findings with unknown severities are kept
    /// rather than dropped.
    pub fn normalize(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// One finding from a security tool, normalized into the common shape.
///
/// Tool-specific auxiliary fields are carried through as optional values and
/// omitted from serialized output when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditIssue {
    /// Name of the tool that reported the issue.
    pub tool: String,
    /// Normalized severity.
    pub severity: Severity,
    /// Human-readable description of the finding.
    pub description: String,
    /// Tool confidence in the finding (slither).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    /// Identifier of the detector that fired (slither).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    /// Smart contract weakness classification id (mythril).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swc_id: Option<String>,
    /// Source line the finding points at, when the tool reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

/// Per-severity issue counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Number of high-severity issues.
    pub high: usize,
    /// Number of medium-severity issues.
    pub medium: usize,
    /// Number of low-severity issues.
    pub low: usize,
    /// Total issue count.
    pub total: usize,
}

/// The outcome of a single adapter run, as exposed by the per-tool endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolReport {
    /// Name of the tool.
    pub tool: String,
    /// Whether the tool ran to completion and produced usable output.
    pub success: bool,
    /// Normalized findings; empty when the tool failed.
    pub issues: Vec<AuditIssue>,
    /// Failure reason when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated audit outcome across all configured tools.
///
/// The error map and `tools_used` are disjoint and together cover every
/// configured adapter: a tool appears in exactly one of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Aggregate risk score, 100 (clean) down to 0, clamped.
    pub score: u8,
    /// Every normalized finding from every tool that produced output.
    pub issues: Vec<AuditIssue>,
    /// Per-severity counts over `issues`.
    pub summary: AuditSummary,
    /// Tools that produced usable output, in configured order.
    pub tools_used: Vec<String>,
    /// Failure reason per tool that produced no usable output.
    pub errors: BTreeMap<String, String>,
}
