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

//! Audit command - run the security toolchain against a local file

use eyre::{eyre, Result};
use infraforge_audit::aggregator::Auditor;
use infraforge_common::{
    logging::init_logging,
    types::{AuditRequest, DEFAULT_AUDIT_FILENAME},
};

/// Audit a Solidity file and print the report as pretty JSON.
///
/// With `--tool` only that analyzer runs and its per-tool report is printed
/// instead of the aggregate. A tool that fails still produces a report; only
/// an unknown tool name is an error.
pub async fn audit_file(args: crate::AuditArgs) -> Result<()> {
    init_logging("infraforge", false)?;

    let code = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|e| eyre!("failed to read {}: {e}", args.file.display()))?;
    let filename = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_AUDIT_FILENAME)
        .to_string();
    let request = AuditRequest { code, filename };

    let auditor = Auditor::new();
    match args.tool.as_deref() {
        Some(tool) => {
            let report = auditor.run_tool(tool, &request).await.ok_or_else(|| {
                eyre!("unknown analyzer {tool:?}, expected one of {:?}", auditor.tools())
            })?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        None => {
            let report = auditor.audit(&request).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
