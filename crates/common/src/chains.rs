//! Chain registry for the supported deployment targets.
//!
//! The registry is a static table built into the binary: it is populated once
//! and read-only for the process lifetime, so lookups need no synchronization.
//! Each chain's RPC endpoint can be overridden with a `<ID>_RPC` environment
//! variable (e.g. `ETHEREUM_RPC`, `BSC_TESTNET_RPC`); chains without an
//! override fall back to a free public endpoint.

use eyre::Result;
use std::{env, time::Instant};

/// Connection and display metadata for one supported chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDescriptor {
    /// Registry key, e.g. `"ethereum_sepolia"`.
    pub id: &'static str,
    /// Human-readable network name.
    pub name: &'static str,
    /// Numeric chain id used in transaction signing.
    pub chain_id: u64,
    /// Public RPC endpoint used when no `<ID>_RPC` override is set.
    pub default_rpc: &'static str,
    /// Block explorer base URL, without a trailing slash.
    pub explorer: &'static str,
}

/// All chains InfraForge can deploy to.
///
/// Default endpoints are free public RPCs from chainlist.org.
pub const CHAINS: &[ChainDescriptor] = &[
    ChainDescriptor {
        id: "ethereum",
        name: "Ethereum Mainnet",
        chain_id: 1,
        default_rpc: "https://ethereum-rpc.publicnode.com",
        explorer: "https://etherscan.io",
    },
    ChainDescriptor {
        id: "ethereum_sepolia",
        name: "Ethereum Sepolia",
        chain_id: 11155111,
        default_rpc: "https://ethereum-sepolia-rpc.publicnode.com",
        explorer: "https://sepolia.etherscan.io",
    },
    ChainDescriptor {
        id: "bsc",
        name: "BNB Smart Chain",
        chain_id: 56,
        default_rpc: "https://bsc-rpc.publicnode.com",
        explorer: "https://bscscan.com",
    },
    ChainDescriptor {
        id: "bsc_testnet",
        name: "BSC Testnet",
        chain_id: 97,
        default_rpc: "https://bsc-testnet-rpc.publicnode.com",
        explorer: "https://testnet.bscscan.com",
    },
    ChainDescriptor {
        id: "polygon",
        name: "Polygon",
        chain_id: 137,
        default_rpc: "https://polygon-bor-rpc.publicnode.com",
        explorer: "https://polygonscan.com",
    },
    ChainDescriptor {
        id: "polygon_mumbai",
        name: "Polygon Mumbai",
        chain_id: 80001,
        default_rpc: "https://polygon-mumbai-bor-rpc.publicnode.com",
        explorer: "https://mumbai.polygonscan.com",
    },
    ChainDescriptor {
        id: "arbitrum",
        name: "Arbitrum One",
        chain_id: 42161,
        default_rpc: "https://arbitrum-one-rpc.publicnode.com",
        explorer: "https://arbiscan.io",
    },
    ChainDescriptor {
        id: "avalanche",
        name: "Avalanche C-Chain",
        chain_id: 43114,
        default_rpc: "https://avalanche-c-chain-rpc.publicnode.com",
        explorer: "https://snowtrace.io",
    },
    ChainDescriptor {
        id: "fantom",
        name: "Fantom Opera",
        chain_id: 250,
        default_rpc: "https://fantom-rpc.publicnode.com",
        explorer: "https://ftmscan.com",
    },
];

/// Look up a chain by its registry key.
///
/// Returns `None` for unknown keys so callers can reject a request before
/// any network connection is attempted.
pub fn resolve(chain: &str) -> Option<&'static ChainDescriptor> {
    CHAINS.iter().find(|c| c.id == chain)
}

impl ChainDescriptor {
    /// Name of the environment variable that overrides this chain's RPC
    /// endpoint, e.g. `ETHEREUM_SEPOLIA_RPC`.
    pub fn rpc_env_var(&self) -> String {
        format!("{}_RPC", self.id.to_uppercase())
    }

    /// The RPC endpoint to use: the `<ID>_RPC` override when set and
    /// non-empty, otherwise the built-in public endpoint.
    pub fn rpc_url(&self) -> String {
        match env::var(self.rpc_env_var()) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.default_rpc.to_string(),
        }
    }

    /// Whether this chain is a test network, derived from the registry key
    /// suffix.
    pub fn is_testnet(&self) -> bool {
        self.id.ends_with("_testnet")
            || self.id.ends_with("_sepolia")
            || self.id.ends_with("_mumbai")
    }

    /// Explorer URL for an address on this chain.
    pub fn explorer_address_url(&self, address: impl std::fmt::Display) -> String {
        format!("{}/address/{}", self.explorer, address)
    }
}

/// Check that an RPC endpoint is responsive with a single `eth_blockNumber`
/// round-trip. Returns the response time in milliseconds.
pub async fn probe_rpc(client: &reqwest::Client, url: &str) -> Result<u64> {
    let start = Instant::now();

    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "method": "eth_blockNumber",
        "params": [],
        "id": 1
    });

    let response =
        client.post(url).header("Content-Type", "application/json").json(&request).send().await?;

    let response_time = start.elapsed().as_millis() as u64;

    let json: serde_json::Value = response.json().await?;
    if json.get("result").is_some() {
        Ok(response_time)
    } else {
        Err(eyre::eyre!("Invalid response from RPC endpoint"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashSet;

    #[test]
    fn chain_ids_are_unique() {
        let mut seen = HashSet::new();
        for chain in CHAINS {
            assert!(seen.insert(chain.chain_id), "duplicate chain id {}", chain.chain_id);
        }
    }

    #[test]
    fn registry_keys_are_unique() {
        let mut seen = HashSet::new();
        for chain in CHAINS {
            assert!(seen.insert(chain.id), "duplicate registry key {}", chain.id);
        }
    }

    #[test]
    fn resolve_known_chains() {
        let eth = resolve("ethereum").unwrap();
        assert_eq!(eth.chain_id, 1);
        assert_eq!(eth.explorer, "https://etherscan.io");

        let sepolia = resolve("ethereum_sepolia").unwrap();
        assert_eq!(sepolia.chain_id, 11155111);

        let fantom = resolve("fantom").unwrap();
        assert_eq!(fantom.name, "Fantom Opera");
    }

    #[test]
    fn resolve_unknown_chain() {
        assert!(resolve("dogecoin").is_none());
        assert!(resolve("").is_none());
        assert!(resolve("Ethereum").is_none(), "registry keys are case-sensitive");
    }

    #[test]
    fn testnet_classification() {
        assert!(!resolve("ethereum").unwrap().is_testnet());
        assert!(resolve("ethereum_sepolia").unwrap().is_testnet());
        assert!(resolve("bsc_testnet").unwrap().is_testnet());
        assert!(resolve("polygon_mumbai").unwrap().is_testnet());
        assert!(!resolve("arbitrum").unwrap().is_testnet());
    }

    #[test]
    fn explorer_address_url_concatenation() {
        let bsc = resolve("bsc").unwrap();
        assert_eq!(
            bsc.explorer_address_url("0x1234"),
            "https://bscscan.com/address/0x1234"
        );
    }

    #[test]
    #[serial]
    fn rpc_url_env_override() {
        let eth = resolve("ethereum").unwrap();
        assert_eq!(eth.rpc_env_var(), "ETHEREUM_RPC");

        env::remove_var("ETHEREUM_RPC");
        assert_eq!(eth.rpc_url(), eth.default_rpc);

        env::set_var("ETHEREUM_RPC", "http://localhost:8545");
        assert_eq!(eth.rpc_url(), "http://localhost:8545");

        // Empty overrides are ignored rather than producing a dead endpoint.
        env::set_var("ETHEREUM_RPC", "  ");
        assert_eq!(eth.rpc_url(), eth.default_rpc);

        env::remove_var("ETHEREUM_RPC");
    }
}
