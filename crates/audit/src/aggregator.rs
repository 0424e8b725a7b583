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

//! Concurrent fan-out over the configured analyzers and report assembly.
//!
//! Every analyzer runs to completion (or failure) independently; the
//! aggregate call never fails. In the degenerate case where no tool could
//! run, the report carries a clean score and an error map explaining the
//! gap.

use std::{collections::BTreeMap, fmt, sync::Arc};

use futures::future::join_all;
use infraforge_common::types::{
    AuditIssue, AuditReport, AuditRequest, AuditSummary, Severity, ToolReport,
};
use tracing::info;

use crate::{
    adapter::{self, Analyzer},
    mythril::Mythril,
    slither::Slither,
};

/// Runs the configured set of analyzers and folds their output into a
/// single scored report.
#[derive(Clone)]
pub struct Auditor {
    analyzers: Vec<Arc<dyn Analyzer>>,
}

impl Auditor {
    /// Auditor with the default toolchain: slither, then mythril.
    pub fn new() -> Self {
        Self::with_analyzers(vec![Arc::new(Slither::new()), Arc::new(Mythril::new())])
    }

    /// Auditor over an explicit analyzer set.
    pub fn with_analyzers(analyzers: Vec<Arc<dyn Analyzer>>) -> Self {
        Self { analyzers }
    }

    /// Names of the configured analyzers, in execution order.
    pub fn tools(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    /// Run every configured analyzer concurrently and assemble the report.
    ///
    /// Infallible: a tool that is missing, times out, crashes, or emits
    /// garbage turns into an entry in the report's error map while the
    /// remaining tools' findings are kept.
    pub async fn audit(&self, request: &AuditRequest) -> AuditReport {
        info!(tools = ?self.tools(), "starting security audit");

        let tasks: Vec<_> = self
            .analyzers
            .iter()
            .map(|analyzer| {
                let analyzer = Arc::clone(analyzer);
                let request = request.clone();
                tokio::spawn(async move {
                    adapter::run_to_report(analyzer.as_ref(), &request).await
                })
            })
            .collect();

        let outcomes = join_all(tasks).await;

        let reports = self
            .analyzers
            .iter()
            .zip(outcomes)
            .map(|(analyzer, outcome)| match outcome {
                Ok(report) => report,
                // A panicking adapter is contained the same way a failing
                // tool is.
                Err(e) => ToolReport {
                    tool: analyzer.name().to_string(),
                    success: false,
                    issues: Vec::new(),
                    error: Some(format!("analysis task failed: {e}")),
                },
            })
            .collect();

        let report = assemble_report(reports);
        info!(
            score = report.score,
            findings = report.issues.len(),
            tools_used = ?report.tools_used,
            "security audit complete"
        );
        report
    }

    /// Run a single configured analyzer by name.
    pub async fn run_tool(&self, name: &str, request: &AuditRequest) -> Option<ToolReport> {
        let analyzer = self.analyzers.iter().find(|a| a.name() == name)?;
        Some(adapter::run_to_report(analyzer.as_ref(), request).await)
    }
}

impl Default for Auditor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Auditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auditor").field("analyzers", &self.tools()).finish()
    }
}

/// Fold per-tool outcomes into the aggregate report.
///
/// Tool order is preserved in `tools_used`; failed tools appear only in the
/// error map, so the two views are disjoint and together cover every
/// configured analyzer.
pub fn assemble_report(reports: Vec<ToolReport>) -> AuditReport {
    let mut issues = Vec::new();
    let mut tools_used = Vec::new();
    let mut errors = BTreeMap::new();

    for report in reports {
        if report.success {
            tools_used.push(report.tool);
            issues.extend(report.issues);
        } else {
            let reason = report.error.unwrap_or_else(|| "analysis failed".to_string());
            errors.insert(report.tool, reason);
        }
    }

    let summary = summarize(&issues);
    AuditReport { score: score(&summary), issues, summary, tools_used, errors }
}

/// Count issues per severity bucket.
pub fn summarize(issues: &[AuditIssue]) -> AuditSummary {
    let mut summary = AuditSummary { total: issues.len(), ..Default::default() };
    for issue in issues {
        match issue.severity {
            Severity::High => summary.high += 1,
            Severity::Medium => summary.medium += 1,
            Severity::Low => summary.low += 1,
        }
    }
    summary
}

/// Aggregate risk score: start from 100, charge 25 per high, 10 per medium,
/// and 2 per low finding, clamped at zero.
pub fn score(summary: &AuditSummary) -> u8 {
    let penalty = 25 * summary.high + 10 * summary.medium + 2 * summary.low;
    100_usize.saturating_sub(penalty) as u8
}
