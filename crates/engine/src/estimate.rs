//! Deployment cost estimation.
//!
//! Runs the same connect, compile and encode stages as the deployment
//! pipeline, then asks the node to simulate the deployment instead of
//! signing it. No credentials are involved anywhere in this path; the
//! simulated transaction carries no sender.

use alloy_network::TransactionBuilder;
use alloy_primitives::{
    utils::{format_ether, format_units},
    U256,
};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use infraforge_common::{
    chains,
    types::{EstimateRequest, GasEstimate},
};
use tracing::debug;

use crate::{
    compiler, constructor,
    deploy::{self, connection_error},
    error::EngineError,
};

/// Estimate the gas and total cost of deploying a contract.
pub async fn estimate(request: &EstimateRequest) -> Result<GasEstimate, EngineError> {
    let chain = chains::resolve(&request.chain)
        .ok_or_else(|| EngineError::UnknownChain(request.chain.clone()))?;

    let provider = deploy::connect(chain).await?;

    let artifact = compiler::compile_blocking(&request.source_code, &request.contract_name).await?;
    let deploy_code = constructor::encode_deploy_code(
        &artifact.abi,
        &artifact.bytecode,
        &request.constructor_args,
    )?;

    let tx = TransactionRequest::default().with_deploy_code(deploy_code);

    // A failing simulation usually means the init code reverts, which is a
    // problem with the request rather than with the endpoint.
    let gas_estimate = provider
        .estimate_gas(tx)
        .await
        .map_err(|e| EngineError::ValidationError(format!("Gas estimation failed: {e}")))?;
    let gas_price = provider.get_gas_price().await.map_err(|e| connection_error(chain, e))?;
    debug!(chain = chain.id, gas_estimate, gas_price, "estimated deployment cost");

    let total_cost_wei = total_cost(gas_estimate, gas_price)?;

    Ok(GasEstimate {
        gas_estimate,
        gas_price_wei: gas_price,
        gas_price_gwei: format_gwei(gas_price),
        total_cost_wei,
        total_cost_eth: format_ether(U256::from(total_cost_wei)),
        chain: chain.id.to_string(),
    })
}

fn format_gwei(wei: u128) -> String {
    format_units(U256::from(wei), "gwei").unwrap_or_else(|_| wei.to_string())
}

// The gas price comes straight from the endpoint and cannot be trusted to
// keep the product inside u128.
fn total_cost(gas: u64, gas_price_wei: u128) -> Result<u128, EngineError> {
    u128::from(gas).checked_mul(gas_price_wei).ok_or_else(|| {
        EngineError::ValidationError(format!(
            "Deployment cost overflows: {gas} gas at {gas_price_wei} wei"
        ))
    })
}
