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

//! HTTP facade tests over a real socket.
//!
//! Every test binds its own server on an ephemeral port, talks to it with a
//! plain HTTP client, and shuts it down. Only request validation paths are
//! exercised here; nothing reaches a chain or a compiler.

use infraforge_common::logging::ensure_test_logging;
use infraforge_server::ApiServer;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

async fn start_server() -> (ApiServer, String, JoinHandle<eyre::Result<()>>) {
    let server = ApiServer::new();
    let bound = server.bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let url = format!("http://{}", bound.local_addr());
    let task = tokio::spawn(bound.serve());
    (server, url, task)
}

async fn stop_server(server: ApiServer, task: JoinHandle<eyre::Result<()>>) {
    server.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn health_and_chain_listing_respond() {
    ensure_test_logging(None);
    let (server, url, task) = start_server().await;

    let health: Value =
        reqwest::get(format!("{url}/health")).await.unwrap().json().await.unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "infraforge");

    let chains: Value = reqwest::get(format!("{url}/api/deployment/chains"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let list = chains["chains"].as_array().unwrap();
    assert_eq!(list.len(), 9);
    assert!(list.iter().any(|c| c["id"] == "arbitrum" && c["chain_id"] == 42161));
    assert!(list.iter().any(|c| c["id"] == "bsc_testnet" && c["testnet"] == true));

    stop_server(server, task).await;
}

#[tokio::test]
async fn deploy_rejects_unknown_chain_with_404() {
    ensure_test_logging(None);
    let (server, url, task) = start_server().await;

    let response = reqwest::Client::new()
        .post(format!("{url}/api/deployment/deploy"))
        .json(&json!({
            "chain": "dogecoin",
            "source_code": "contract A {}",
            "contract_name": "A",
            "private_key": "0x01",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unsupported chain: dogecoin");

    stop_server(server, task).await;
}

#[tokio::test]
async fn deploy_rejects_a_blank_private_key_with_400() {
    ensure_test_logging(None);
    let (server, url, task) = start_server().await;

    let response = reqwest::Client::new()
        .post(format!("{url}/api/deployment/deploy"))
        .json(&json!({
            "chain": "ethereum_sepolia",
            "source_code": "contract A {}",
            "contract_name": "A",
            "private_key": "",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Private key is required"));

    stop_server(server, task).await;
}

#[tokio::test]
async fn deploy_rejects_a_request_missing_fields_with_422() {
    ensure_test_logging(None);
    let (server, url, task) = start_server().await;

    // No private_key field at all; the body never reaches the handler.
    let response = reqwest::Client::new()
        .post(format!("{url}/api/deployment/deploy"))
        .json(&json!({
            "chain": "ethereum_sepolia",
            "source_code": "contract A {}",
            "contract_name": "A",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    stop_server(server, task).await;
}

#[tokio::test]
async fn estimate_rejects_unknown_chain_with_404() {
    ensure_test_logging(None);
    let (server, url, task) = start_server().await;

    let response = reqwest::Client::new()
        .post(format!("{url}/api/deployment/estimate-gas"))
        .json(&json!({
            "chain": "solana",
            "source_code": "contract A {}",
            "contract_name": "A",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    stop_server(server, task).await;
}

#[tokio::test]
async fn unknown_routes_are_404() {
    ensure_test_logging(None);
    let (server, url, task) = start_server().await;

    let response = reqwest::get(format!("{url}/api/security/securify")).await.unwrap();
    assert_eq!(response.status(), 404);

    stop_server(server, task).await;
}

#[cfg(unix)]
mod stubbed_tools {
    use serial_test::serial;

    use super::*;

    #[tokio::test]
    #[serial]
    async fn audit_endpoints_isolate_broken_tools() {
        ensure_test_logging(None);

        // Both analyzers resolve to echo, which produces output that is not
        // JSON. The adapters are constructed when the server starts, so the
        // overrides only need to live through start_server.
        std::env::set_var("SLITHER_BIN", "echo");
        std::env::set_var("MYTH_BIN", "echo");
        let (server, url, task) = start_server().await;
        std::env::remove_var("SLITHER_BIN");
        std::env::remove_var("MYTH_BIN");

        let report: Value = reqwest::Client::new()
            .post(format!("{url}/api/security/audit"))
            .json(&json!({ "code": "contract Empty {}" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(report["score"], 100);
        assert_eq!(report["tools_used"], json!([]));
        assert!(report["errors"]["slither"].as_str().unwrap().contains("unparseable"));
        assert!(report["errors"]["mythril"].as_str().unwrap().contains("unparseable"));

        let tool: Value = reqwest::Client::new()
            .post(format!("{url}/api/security/slither"))
            .json(&json!({ "code": "contract Empty {}" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(tool["tool"], "slither");
        assert_eq!(tool["success"], false);
        assert!(tool["error"].as_str().unwrap().contains("unparseable"));

        stop_server(server, task).await;
    }
}
