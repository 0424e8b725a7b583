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

//! In-process Ethereum JSON-RPC stub for exercising the deployment pipeline
//! without a live network.

use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use axum::{extract::State, routing::post, Json, Router};
use eyre::Result;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::broadcast};
use tracing::debug;

/// Transaction hash the stub assigns to every submitted transaction.
pub const MOCK_TX_HASH: &str =
    "0x1111111111111111111111111111111111111111111111111111111111111111";

/// Address the stub reports as the created contract.
pub const MOCK_CONTRACT_ADDRESS: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

/// Gas price the stub quotes, in wei (20 gwei).
pub const MOCK_GAS_PRICE: u128 = 20_000_000_000;

/// Gas amount the stub returns for every estimation.
pub const MOCK_GAS_ESTIMATE: u64 = 200_000;

#[derive(Clone)]
struct NodeState {
    chain_id: u64,
    block_number: Arc<AtomicU64>,
    tx_submitted: Arc<AtomicBool>,
    methods: Arc<Mutex<Vec<String>>>,
}

/// A minimal JSON-RPC node answering the handful of methods the deployment
/// pipeline issues.
///
/// Submitted transactions are acknowledged with [`MOCK_TX_HASH`] and
/// immediately reported as mined with a successful receipt, so a deployment
/// runs its full broadcast-and-confirm path without a real chain.
pub struct MockNode {
    addr: SocketAddr,
    state: NodeState,
    shutdown_tx: broadcast::Sender<()>,
}

impl MockNode {
    /// Start the node on an ephemeral local port.
    pub async fn start(chain_id: u64) -> Result<Self> {
        let state = NodeState {
            chain_id,
            block_number: Arc::new(AtomicU64::new(0x10)),
            tx_submitted: Arc::new(AtomicBool::new(false)),
            methods: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new().route("/", post(handle)).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await;
        });

        Ok(Self { addr, state, shutdown_tx })
    }

    /// HTTP endpoint of the node.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every JSON-RPC method received so far, in order.
    pub fn methods_seen(&self) -> Vec<String> {
        self.state.methods.lock().map(|methods| methods.clone()).unwrap_or_default()
    }

    /// Stop the accept loop.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

impl Drop for MockNode {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn handle(State(state): State<NodeState>, Json(body): Json<Value>) -> Json<Value> {
    let response = match body {
        Value::Array(calls) => {
            Value::Array(calls.iter().map(|call| respond(&state, call)).collect())
        }
        call => respond(&state, &call),
    };
    Json(response)
}

fn respond(state: &NodeState, call: &Value) -> Value {
    let id = call.get("id").cloned().unwrap_or(Value::Null);
    let method = call.get("method").and_then(Value::as_str).unwrap_or_default().to_string();
    let params = call.get("params").cloned().unwrap_or(Value::Null);
    if let Ok(mut methods) = state.methods.lock() {
        methods.push(method.clone());
    }
    debug!(method, "mock node request");

    let result = match method.as_str() {
        "eth_chainId" => json!(format!("{:#x}", state.chain_id)),
        // Every poll advances the chain one block so confirmation watchers
        // always make progress.
        "eth_blockNumber" => {
            let number = state.block_number.fetch_add(1, Ordering::SeqCst) + 1;
            json!(format!("{number:#x}"))
        }
        "eth_gasPrice" => json!(format!("{MOCK_GAS_PRICE:#x}")),
        "eth_getTransactionCount" => json!("0x7"),
        "eth_estimateGas" => json!(format!("{MOCK_GAS_ESTIMATE:#x}")),
        "eth_sendRawTransaction" => {
            state.tx_submitted.store(true, Ordering::SeqCst);
            json!(MOCK_TX_HASH)
        }
        "eth_getTransactionReceipt" if state.tx_submitted.load(Ordering::SeqCst) => receipt(),
        "eth_getTransactionReceipt" => Value::Null,
        "eth_getBlockByNumber" | "eth_getBlockByHash" => block(state, &params),
        _ => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("method {method} not stubbed") },
            });
        }
    };

    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn block(state: &NodeState, params: &Value) -> Value {
    let number = params
        .get(0)
        .and_then(Value::as_str)
        .and_then(|tag| u64::from_str_radix(tag.trim_start_matches("0x"), 16).ok())
        .unwrap_or_else(|| state.block_number.load(Ordering::SeqCst));

    // Once a transaction has been submitted it shows up in every block, so
    // confirmation watchers find it regardless of which height they inspect.
    let transactions = if state.tx_submitted.load(Ordering::SeqCst) {
        json!([MOCK_TX_HASH])
    } else {
        json!([])
    };

    json!({
        "hash": format!("0x{:064x}", 0xb10c_0000_0000_u128 + u128::from(number)),
        "parentHash": format!("0x{:064x}", 0xb10c_0000_0000_u128 + u128::from(number) - 1),
        "sha3Uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
        "miner": "0x0000000000000000000000000000000000000000",
        "stateRoot": zeros(32),
        "transactionsRoot": zeros(32),
        "receiptsRoot": zeros(32),
        "logsBloom": zeros(256),
        "difficulty": "0x0",
        "number": format!("{number:#x}"),
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x5208",
        "timestamp": "0x66bb4a30",
        "extraData": "0x",
        "mixHash": zeros(32),
        "nonce": "0x0000000000000000",
        "baseFeePerGas": "0x3b9aca00",
        "totalDifficulty": "0x0",
        "size": "0x220",
        "transactions": transactions,
        "uncles": [],
    })
}

fn receipt() -> Value {
    json!({
        "type": "0x0",
        "status": "0x1",
        "cumulativeGasUsed": "0x27100",
        "logs": [],
        "logsBloom": zeros(256),
        "transactionHash": MOCK_TX_HASH,
        "transactionIndex": "0x0",
        "blockHash": format!("0x{:064x}", 0xb10c_0000_0010_u128),
        "blockNumber": "0x10",
        "gasUsed": "0x27100",
        "effectiveGasPrice": format!("{MOCK_GAS_PRICE:#x}"),
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": null,
        "contractAddress": MOCK_CONTRACT_ADDRESS,
    })
}

fn zeros(bytes: usize) -> String {
    format!("0x{}", "00".repeat(bytes))
}
