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

//! The [`Analyzer`] trait and the subprocess driver shared by every adapter.
//!
//! Adapters only describe their tool (binary, arguments, deadline, output
//! schema); [`run_analyzer`] owns the process lifecycle. Each run gets a
//! fresh scratch directory holding the source under audit, removed on every
//! exit path including deadline kills.

use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use infraforge_common::types::{AuditIssue, AuditRequest, ToolReport, DEFAULT_AUDIT_FILENAME};
use tempfile::TempDir;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::Command,
};
use tracing::{debug, warn};

/// Captured output beyond this many bytes per stream is discarded.
const MAX_CAPTURE_BYTES: u64 = 8 * 1024 * 1024;

/// Ways a single analyzer run can fail.
///
/// "Tool could not run" ([`Unavailable`], [`Timeout`]) is kept distinct from
/// "tool ran and produced nothing usable" ([`Failed`], [`Parse`]) so callers
/// can tell an environment problem apart from a verdict on the code.
///
/// [`Unavailable`]: ToolError::Unavailable
/// [`Timeout`]: ToolError::Timeout
/// [`Failed`]: ToolError::Failed
/// [`Parse`]: ToolError::Parse
#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolError {
    /// The analyzer binary could not be found.
    #[error("{tool} is not installed or not on PATH")]
    Unavailable {
        /// Name of the missing tool.
        tool: &'static str,
    },
    /// The analyzer exceeded its deadline and was killed.
    #[error("{tool} analysis timed out after {budget_secs}s")]
    Timeout {
        /// Name of the tool.
        tool: &'static str,
        /// The deadline that was exceeded, in seconds.
        budget_secs: u64,
    },
    /// The analyzer ran but produced no usable output.
    #[error("{tool} failed: {reason}")]
    Failed {
        /// Name of the tool.
        tool: &'static str,
        /// Captured stderr, or a description of what went wrong.
        reason: String,
    },
    /// The analyzer produced output the adapter could not decode.
    #[error("{tool} produced unparseable output: {reason}")]
    Parse {
        /// Name of the tool.
        tool: &'static str,
        /// Decode failure detail.
        reason: String,
    },
}

/// An external security analyzer.
///
/// Implementations describe how to invoke the tool and how to read its
/// output; the shared driver handles scratch setup, spawning, capture, and
/// the deadline uniformly for all of them.
pub trait Analyzer: Send + Sync {
    /// Tool identifier used in reports and error maps.
    fn name(&self) -> &'static str;

    /// Program to invoke. Implementations usually resolve this from an
    /// environment override, falling back to the bare tool name on PATH.
    fn program(&self) -> &str;

    /// Command-line arguments for analyzing `target`.
    fn args(&self, target: &Path) -> Vec<OsString>;

    /// Hard deadline for a single run.
    fn timeout(&self) -> Duration;

    /// Parse the tool's raw standard output into normalized findings.
    fn parse_output(&self, stdout: &str) -> Result<Vec<AuditIssue>, ToolError>;
}

// Client-supplied filenames are reduced to their final component so the
// source always lands inside the scratch directory.
fn scratch_file_name(filename: &str) -> PathBuf {
    Path::new(filename)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_AUDIT_FILENAME))
}

/// Run one analyzer against the request's source text.
///
/// Standard output decides success: these tools exit non-zero whenever they
/// have findings, so the exit code is ignored as long as there is output to
/// parse. An empty stdout is a failure carrying whatever stderr said.
pub async fn run_analyzer(
    analyzer: &dyn Analyzer,
    request: &AuditRequest,
) -> Result<Vec<AuditIssue>, ToolError> {
    let tool = analyzer.name();

    let scratch = TempDir::new().map_err(|e| ToolError::Failed {
        tool,
        reason: format!("failed to create scratch directory: {e}"),
    })?;
    let target = scratch.path().join(scratch_file_name(&request.filename));
    tokio::fs::write(&target, &request.code).await.map_err(|e| ToolError::Failed {
        tool,
        reason: format!("failed to materialize source: {e}"),
    })?;

    let budget = analyzer.timeout();
    debug!(tool, target = %target.display(), budget_secs = budget.as_secs(), "running analyzer");

    let mut child = Command::new(analyzer.program())
        .args(analyzer.args(&target))
        .current_dir(scratch.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ToolError::Unavailable { tool },
            _ => ToolError::Failed { tool, reason: format!("failed to spawn: {e}") },
        })?;

    // Drain both pipes concurrently; either stream can outgrow the kernel
    // pipe buffer before the other closes.
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let captured = tokio::time::timeout(budget, async {
        let (stdout_buf, stderr_buf) =
            tokio::try_join!(drain_capped(stdout_pipe), drain_capped(stderr_pipe))?;
        let status = child.wait().await?;

        Ok::<_, io::Error>((stdout_buf, stderr_buf, status))
    })
    .await;

    // The scratch directory outlives every branch below and is removed when
    // this function returns, killed child included.
    let (stdout_buf, stderr_buf, status) = match captured {
        Ok(Ok(buffers)) => buffers,
        Ok(Err(e)) => {
            let _ = child.kill().await;
            return Err(ToolError::Failed {
                tool,
                reason: format!("failed to capture output: {e}"),
            })
        }
        Err(_) => {
            warn!(tool, budget_secs = budget.as_secs(), "analyzer exceeded its deadline, killing");
            let _ = child.kill().await;
            return Err(ToolError::Timeout { tool, budget_secs: budget.as_secs() });
        }
    };
    debug!(tool, exit = ?status.code(), stdout_bytes = stdout_buf.len(), "analyzer finished");

    let stdout = String::from_utf8_lossy(&stdout_buf);
    if stdout.trim().is_empty() {
        let stderr = String::from_utf8_lossy(&stderr_buf);
        let reason = match stderr.trim() {
            "" => "analysis produced no output".to_string(),
            err => err.to_string(),
        };
        return Err(ToolError::Failed { tool, reason });
    }

    analyzer.parse_output(&stdout)
}

/// Read a pipe to EOF, keeping at most [`MAX_CAPTURE_BYTES`].
async fn drain_capped<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(reader) = pipe {
        reader.take(MAX_CAPTURE_BYTES).read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Run one analyzer and fold the outcome into a [`ToolReport`].
pub async fn run_to_report(analyzer: &dyn Analyzer, request: &AuditRequest) -> ToolReport {
    match run_analyzer(analyzer, request).await {
        Ok(issues) => {
            debug!(tool = analyzer.name(), findings = issues.len(), "analyzer succeeded");
            ToolReport {
                tool: analyzer.name().to_string(),
                success: true,
                issues,
                error: None,
            }
        }
        Err(e) => {
            warn!(tool = analyzer.name(), error = %e, "analyzer did not produce usable output");
            ToolReport {
                tool: analyzer.name().to_string(),
                success: false,
                issues: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
