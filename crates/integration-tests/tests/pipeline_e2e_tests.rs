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

//! End-to-end tests for the deployment pipeline.
//!
//! The happy paths run against an in-process JSON-RPC node, so they cover
//! compile, sign, broadcast, and confirmation without a live network. The
//! failure paths use an unreachable endpoint and need no compiler at all,
//! since connectivity is checked before compilation starts.

use std::{env, str::FromStr};

use alloy_primitives::Address;
use infraforge_common::{
    chains,
    logging::ensure_test_logging,
    types::{DeployRequest, DeployStatus, EstimateRequest},
};
use infraforge_engine::{deploy::Deployer, error::EngineError, estimate};
use infraforge_integration_tests::mock_node::{
    MockNode, MOCK_CONTRACT_ADDRESS, MOCK_GAS_ESTIMATE, MOCK_GAS_PRICE, MOCK_TX_HASH,
};
use serial_test::serial;
use tracing::info;

/// Throwaway key; the first well-known development account shipped with
/// local test nodes.
const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const VAULT_SOURCE: &str = r#"
    // SPDX-License-Identifier: MIT
    pragma solidity ^0.8.20;

    contract Vault {
        uint256 public cap;

        constructor(uint256 _cap) {
            cap = _cap;
        }
    }
"#;

/// Point `chain`'s RPC override at `url`, returning the variable name for
/// cleanup.
fn override_rpc(chain: &str, url: &str) -> String {
    let var = chains::resolve(chain).expect("registry chain").rpc_env_var();
    env::set_var(&var, url);
    var
}

#[tokio::test]
#[serial]
#[ignore = "provisions solc 0.8.20 via svm"]
async fn deploy_runs_end_to_end_against_a_mock_node() {
    ensure_test_logging(None);

    let node = MockNode::start(11155111).await.unwrap();
    let var = override_rpc("ethereum_sepolia", &node.url());

    let request = DeployRequest {
        chain: "ethereum_sepolia".to_string(),
        source_code: VAULT_SOURCE.to_string(),
        contract_name: "Vault".to_string(),
        constructor_args: vec!["1000".to_string()],
        private_key: TEST_PRIVATE_KEY.to_string(),
    };

    let result = Deployer::new().deploy(&request).await.unwrap();
    env::remove_var(&var);

    assert_eq!(result.status, DeployStatus::Success);
    assert_eq!(result.tx_hash.to_string(), MOCK_TX_HASH);
    assert_eq!(result.contract_address, Some(Address::from_str(MOCK_CONTRACT_ADDRESS).unwrap()));
    assert_eq!(result.chain, "ethereum_sepolia");
    assert!(result
        .explorer_url
        .as_deref()
        .unwrap()
        .starts_with("https://sepolia.etherscan.io/address/0x"));

    let methods = node.methods_seen();
    assert!(methods.contains(&"eth_getTransactionCount".to_string()));
    assert!(methods.contains(&"eth_gasPrice".to_string()));
    assert!(methods.contains(&"eth_sendRawTransaction".to_string()));
    info!("deployment pipeline completed against the mock node");
}

#[tokio::test]
#[serial]
#[ignore = "provisions solc 0.8.20 via svm"]
async fn estimate_runs_end_to_end_against_a_mock_node() {
    ensure_test_logging(None);

    let node = MockNode::start(97).await.unwrap();
    let var = override_rpc("bsc_testnet", &node.url());

    let request = EstimateRequest {
        chain: "bsc_testnet".to_string(),
        source_code: VAULT_SOURCE.to_string(),
        contract_name: "Vault".to_string(),
        constructor_args: vec!["5".to_string()],
    };

    let result = estimate::estimate(&request).await.unwrap();
    env::remove_var(&var);

    assert_eq!(result.gas_estimate, MOCK_GAS_ESTIMATE);
    assert_eq!(result.gas_price_wei, MOCK_GAS_PRICE);
    assert_eq!(result.gas_price_gwei, "20.000000000");
    assert_eq!(result.total_cost_wei, u128::from(MOCK_GAS_ESTIMATE) * MOCK_GAS_PRICE);
    assert_eq!(result.total_cost_eth, "0.004000000000000000");
    assert_eq!(result.chain, "bsc_testnet");

    // Estimation never signs or broadcasts anything.
    let methods = node.methods_seen();
    assert!(methods.contains(&"eth_estimateGas".to_string()));
    assert!(!methods.contains(&"eth_sendRawTransaction".to_string()));
}

#[tokio::test]
async fn probe_measures_a_live_endpoint_and_rejects_a_dead_one() {
    ensure_test_logging(None);

    let node = MockNode::start(137).await.unwrap();
    let client = reqwest::Client::new();

    let latency = chains::probe_rpc(&client, &node.url()).await.unwrap();
    assert!(latency < 5_000, "local round-trip took {latency}ms");

    assert!(chains::probe_rpc(&client, "http://127.0.0.1:9").await.is_err());
}

#[tokio::test]
#[serial]
async fn deploy_reports_connection_error_when_node_is_unreachable() {
    ensure_test_logging(None);

    // Nothing listens on the discard port.
    let var = override_rpc("fantom", "http://127.0.0.1:9");
    let request = DeployRequest {
        chain: "fantom".to_string(),
        source_code: "contract A {}".to_string(),
        contract_name: "A".to_string(),
        constructor_args: vec![],
        private_key: TEST_PRIVATE_KEY.to_string(),
    };

    let err = Deployer::new().deploy(&request).await.unwrap_err();
    env::remove_var(&var);

    assert!(matches!(err, EngineError::ConnectionError { .. }));
    assert!(err.to_string().contains("Fantom Opera"));
    assert!(err.is_pre_broadcast());
}

#[tokio::test]
#[serial]
async fn estimate_reports_connection_error_when_node_is_unreachable() {
    ensure_test_logging(None);

    let var = override_rpc("avalanche", "http://127.0.0.1:9");
    let request = EstimateRequest {
        chain: "avalanche".to_string(),
        source_code: "contract A {}".to_string(),
        contract_name: "A".to_string(),
        constructor_args: vec![],
    };

    let err = estimate::estimate(&request).await.unwrap_err();
    env::remove_var(&var);

    assert!(matches!(err, EngineError::ConnectionError { .. }));
    assert!(err.to_string().contains("Avalanche"));
}
