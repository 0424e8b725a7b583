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

use std::fmt;

use alloy_primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};

use crate::chains::ChainDescriptor;

/// A request to deploy a contract to a supported chain.
#[derive(Clone, Serialize, Deserialize)]
pub struct DeployRequest {
    /// Registry key of the target chain, e.g. `"ethereum_sepolia"`.
    pub chain: String,
    /// Solidity source text containing the target contract.
    pub source_code: String,
    /// Name of the contract to deploy. A source may define several contracts.
    pub contract_name: String,
    /// Constructor arguments in declaration order, as human-readable strings
    /// coerced against the compiled constructor signature.
    #[serde(default)]
    pub constructor_args: Vec<String>,
    /// Hex-encoded private key of the deploying account.
    pub private_key: String,
}

// The signing credential must never appear in logs, so the derived Debug is
// replaced with one that redacts it.
impl fmt::Debug for DeployRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployRequest")
            .field("chain", &self.chain)
            .field("contract_name", &self.contract_name)
            .field("constructor_args", &self.constructor_args)
            .field("private_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// A request to estimate the deployment cost of a contract.
///
/// Estimation is read-only, so unlike [`DeployRequest`] there is no
/// credential field at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    /// Registry key of the target chain.
    pub chain: String,
    /// Solidity source text containing the target contract.
    pub source_code: String,
    /// Name of the contract to estimate deployment for.
    pub contract_name: String,
    /// Constructor arguments in declaration order.
    #[serde(default)]
    pub constructor_args: Vec<String>,
}

/// A request to compile a contract without deploying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileRequest {
    /// Solidity source text.
    pub source_code: String,
    /// Name of the contract whose artifact should be returned.
    pub contract_name: String,
}

/// Terminal status of a mined deployment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployStatus {
    /// The transaction was mined and the contract was created.
    Success,
    /// The transaction was mined but reverted.
    Failed,
}

impl fmt::Display for DeployStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The outcome of a confirmed deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentResult {
    /// Hash of the deployment transaction.
    pub tx_hash: TxHash,
    /// Address of the created contract, when the node reported one.
    pub contract_address: Option<Address>,
    /// Registry key of the chain the contract was deployed to.
    pub chain: String,
    /// Block explorer link for the deployed contract.
    pub explorer_url: Option<String>,
    /// Whether the mined transaction succeeded or reverted.
    pub status: DeployStatus,
}

/// Projected cost of deploying a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasEstimate {
    /// Estimated gas units for the deployment transaction.
    pub gas_estimate: u64,
    /// Current network gas price in wei.
    pub gas_price_wei: u128,
    /// Current network gas price scaled to gwei, as a decimal string.
    pub gas_price_gwei: String,
    /// Total cost in wei (`gas_estimate * gas_price_wei`).
    pub total_cost_wei: u128,
    /// Total cost scaled to the chain's native currency, as a decimal string.
    pub total_cost_eth: String,
    /// Registry key of the chain the estimate was made against.
    pub chain: String,
}

/// Registry entry as presented by the chain listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Registry key, e.g. `"bsc_testnet"`.
    pub id: String,
    /// Human-readable network name.
    pub name: String,
    /// Numeric chain id.
    pub chain_id: u64,
    /// Block explorer base URL.
    pub explorer: String,
    /// Whether the chain is a test network.
    pub testnet: bool,
}

impl From<&ChainDescriptor> for ChainInfo {
    fn from(chain: &ChainDescriptor) -> Self {
        Self {
            id: chain.id.to_string(),
            name: chain.name.to_string(),
            chain_id: chain.chain_id,
            explorer: chain.explorer.to_string(),
            testnet: chain.is_testnet(),
        }
    }
}
