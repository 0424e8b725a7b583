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

//! The deployment pipeline.
//!
//! A deployment moves through a linear chain of stages with no backward
//! transitions: connect, compile, build, sign, broadcast, confirm. Nonce and
//! gas price are fetched fresh per attempt while holding a per-account lock,
//! since stale values produce rejections or nonce collisions.
//!
//! A mined-but-reverted transaction is still a result, not an error: the
//! caller gets a [`DeploymentResult`] with [`DeployStatus::Failed`].

use std::{sync::Arc, time::Duration};

use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use dashmap::DashMap;
use infraforge_common::{
    chains::{self, ChainDescriptor},
    types::{DeployRequest, DeployStatus, DeploymentResult},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{compiler, constructor, error::EngineError};

/// Gas limit attached to every deployment transaction.
pub const DEPLOY_GAS_LIMIT: u64 = 3_000_000;

/// How long to wait for a broadcast transaction to be mined.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Executes deployment requests end to end.
///
/// Cheap to clone; all clones share the per-account serialization table, so
/// one `Deployer` should be created per process.
#[derive(Debug, Clone, Default)]
pub struct Deployer {
    // At most one in-flight deployment per (chain id, sender). Entries are
    // created on demand and live for the process lifetime.
    account_locks: Arc<DashMap<(u64, Address), Arc<Mutex<()>>>>,
}

impl Deployer {
    /// New deployer with an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a contract per `request` and wait for the transaction to be
    /// mined.
    ///
    /// The returned [`DeploymentResult`] reflects the mined transaction's
    /// status; errors are reserved for requests that never produced a mined
    /// transaction.
    pub async fn deploy(&self, request: &DeployRequest) -> Result<DeploymentResult, EngineError> {
        let chain = chains::resolve(&request.chain)
            .ok_or_else(|| EngineError::UnknownChain(request.chain.clone()))?;

        if request.private_key.trim().is_empty() {
            return Err(EngineError::ValidationError(
                "Private key is required for deployment".to_string(),
            ));
        }

        let provider = connect(chain).await?;

        let artifact =
            compiler::compile_blocking(&request.source_code, &request.contract_name).await?;
        let deploy_code = constructor::encode_deploy_code(
            &artifact.abi,
            &artifact.bytecode,
            &request.constructor_args,
        )?;

        // The sender is derived before building so the nonce is fetched for
        // the right account. The key itself is never logged.
        let signer: PrivateKeySigner = request
            .private_key
            .trim()
            .parse()
            .map_err(|e| EngineError::ValidationError(format!("Invalid private key: {e}")))?;
        let sender = signer.address();

        // Serialize against other in-flight deployments from the same
        // account on the same chain; racing here corrupts the nonce.
        let lock = self.account_lock(chain.chain_id, sender);
        let _guard = lock.lock().await;

        let nonce = provider
            .get_transaction_count(sender)
            .await
            .map_err(|e| connection_error(chain, e))?;
        let gas_price = provider.get_gas_price().await.map_err(|e| connection_error(chain, e))?;
        debug!(chain = chain.id, %sender, nonce, gas_price, "building deployment transaction");

        let tx = TransactionRequest::default()
            .with_from(sender)
            .with_deploy_code(deploy_code)
            .with_nonce(nonce)
            .with_chain_id(chain.chain_id)
            .with_gas_price(gas_price)
            .with_gas_limit(DEPLOY_GAS_LIMIT);

        let wallet = EthereumWallet::new(signer);
        let envelope = tx
            .build(&wallet)
            .await
            .map_err(|e| EngineError::ValidationError(format!("Failed to sign transaction: {e}")))?;

        let pending = provider
            .send_tx_envelope(envelope)
            .await
            .map_err(|e| EngineError::BroadcastError(e.to_string()))?;
        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, chain = chain.id, contract = request.contract_name, "deployment transaction broadcast");

        let receipt = pending
            .with_required_confirmations(1)
            .with_timeout(Some(CONFIRMATION_TIMEOUT))
            .get_receipt()
            .await
            .map_err(|e| {
                EngineError::BroadcastError(format!(
                    "transaction {tx_hash} was broadcast but confirmation failed: {e}"
                ))
            })?;

        let status = if receipt.status() { DeployStatus::Success } else { DeployStatus::Failed };
        let contract_address = receipt.contract_address;
        let explorer_url = contract_address.map(|address| chain.explorer_address_url(address));
        info!(
            %tx_hash,
            chain = chain.id,
            ?contract_address,
            %status,
            "deployment transaction mined"
        );

        Ok(DeploymentResult {
            tx_hash: receipt.transaction_hash,
            contract_address,
            chain: chain.id.to_string(),
            explorer_url,
            status,
        })
    }

    fn account_lock(&self, chain_id: u64, sender: Address) -> Arc<Mutex<()>> {
        self.account_locks.entry((chain_id, sender)).or_default().clone()
    }
}

/// Open a provider against the chain's RPC endpoint and verify liveness.
///
/// A dead endpoint is reported as [`EngineError::ConnectionError`] so
/// callers can tell "chain is down" apart from "chain is unknown".
pub(crate) async fn connect(chain: &ChainDescriptor) -> Result<impl Provider, EngineError> {
    let rpc_url = chain.rpc_url();
    let provider = ProviderBuilder::new()
        .connect(&rpc_url)
        .await
        .map_err(|e| connection_error(chain, e))?;

    // Liveness probe; also catches endpoints that answer for a different
    // network than the registry claims.
    let reported = provider.get_chain_id().await.map_err(|e| connection_error(chain, e))?;
    if reported != chain.chain_id {
        warn!(
            chain = chain.id,
            expected = chain.chain_id,
            reported,
            "RPC endpoint reports an unexpected chain id"
        );
    }

    Ok(provider)
}

pub(crate) fn connection_error(chain: &ChainDescriptor, e: impl std::fmt::Display) -> EngineError {
    EngineError::ConnectionError { chain: chain.name.to_string(), reason: e.to_string() }
}
