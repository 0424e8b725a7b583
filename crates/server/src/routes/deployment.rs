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

//! Deployment, compilation, and estimation endpoints.

use alloy_json_abi::JsonAbi;
use alloy_primitives::Bytes;
use axum::{extract::State, Json};
use infraforge_common::{
    chains,
    types::{
        ChainInfo, CompileRequest, DeployRequest, DeploymentResult, EstimateRequest, GasEstimate,
    },
};
use infraforge_engine::{compiler, estimate::estimate};
use serde::Serialize;
use tracing::info;

use crate::{error::ApiError, ApiState};

/// How much of the bytecode hex `/compile` echoes back.
const BYTECODE_PREVIEW_CHARS: usize = 100;

/// Wire shape of `GET /api/deployment/chains`.
#[derive(Debug, Serialize)]
pub struct ChainsResponse {
    /// Every chain in the registry.
    pub chains: Vec<ChainInfo>,
}

/// Wire shape of `POST /api/deployment/compile`.
#[derive(Debug, Serialize)]
pub struct CompileResponse {
    /// Always true; failures surface as error responses instead.
    pub success: bool,
    /// Contract ABI as emitted by solc.
    pub abi: JsonAbi,
    /// Truncated bytecode hex, for display rather than deployment.
    pub bytecode: String,
    /// Human-readable outcome.
    pub message: String,
}

/// `GET /api/deployment/chains`
pub async fn chains() -> Json<ChainsResponse> {
    let chains = chains::CHAINS.iter().map(ChainInfo::from).collect();
    Json(ChainsResponse { chains })
}

/// `POST /api/deployment/compile`
pub async fn compile(
    Json(request): Json<CompileRequest>,
) -> Result<Json<CompileResponse>, ApiError> {
    let artifact =
        compiler::compile_blocking(&request.source_code, &request.contract_name).await?;
    Ok(Json(CompileResponse {
        success: true,
        abi: artifact.abi,
        bytecode: preview_bytecode(&artifact.bytecode),
        message: "Contract compiled successfully".to_string(),
    }))
}

/// `POST /api/deployment/deploy`
///
/// The private key in the request is consumed by the signer and never logged
/// or echoed back.
pub async fn deploy(
    State(state): State<ApiState>,
    Json(request): Json<DeployRequest>,
) -> Result<Json<DeploymentResult>, ApiError> {
    info!(chain = %request.chain, contract = %request.contract_name, "deployment requested");
    let result = state.deployer.deploy(&request).await?;
    Ok(Json(result))
}

/// `POST /api/deployment/estimate-gas`
pub async fn estimate_gas(
    Json(request): Json<EstimateRequest>,
) -> Result<Json<GasEstimate>, ApiError> {
    let result = estimate(&request).await?;
    Ok(Json(result))
}

// Full init code is often tens of kilobytes; responses carry a preview only.
// Deployment always recompiles server-side.
fn preview_bytecode(bytecode: &Bytes) -> String {
    let hex = bytecode.to_string();
    if hex.len() <= BYTECODE_PREVIEW_CHARS {
        hex
    } else {
        format!("{}...", &hex[..BYTECODE_PREVIEW_CHARS])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chains_lists_the_full_registry() {
        let Json(response) = chains().await;
        assert_eq!(response.chains.len(), chains::CHAINS.len());

        let mut ids: Vec<u64> = response.chains.iter().map(|c| c.chain_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), response.chains.len(), "chain ids must be unique");
    }

    #[test]
    fn bytecode_preview_truncates_long_hex() {
        let bytecode = Bytes::from(vec![0xAB; 120]);
        let preview = preview_bytecode(&bytecode);
        assert_eq!(preview.len(), BYTECODE_PREVIEW_CHARS + 3);
        assert!(preview.starts_with("0xabab"));
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn bytecode_preview_keeps_short_hex_intact() {
        let bytecode = Bytes::from(vec![0x60, 0x80]);
        assert_eq!(preview_bytecode(&bytecode), "0x6080");
    }
}
