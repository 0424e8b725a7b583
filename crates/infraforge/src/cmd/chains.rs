//! Chains command - print the chain registry

use eyre::Result;
use futures::future::join_all;
use infraforge_common::{chains, logging::init_logging, types::ChainInfo};
use std::time::Duration;

/// How long a probe waits before declaring an endpoint unreachable.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Print the chain registry, optionally probing each RPC endpoint.
pub async fn list_chains(args: crate::ChainsArgs) -> Result<()> {
    init_logging("infraforge", false)?;

    let latencies = if args.probe { probe_all().await? } else { vec![None; chains::CHAINS.len()] };

    if args.json {
        let entries: Vec<serde_json::Value> = chains::CHAINS
            .iter()
            .zip(&latencies)
            .map(|(chain, latency)| {
                let mut entry = serde_json::to_value(ChainInfo::from(chain))?;
                if args.probe {
                    entry["latency_ms"] = match latency {
                        Some(ms) => (*ms).into(),
                        None => serde_json::Value::Null,
                    };
                }
                Ok(entry)
            })
            .collect::<Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print_table(&latencies, args.probe);
    }

    Ok(())
}

/// Probe every registry endpoint concurrently.
///
/// Unreachable endpoints come back as `None` rather than failing the whole
/// listing.
async fn probe_all() -> Result<Vec<Option<u64>>> {
    let client = reqwest::Client::builder().timeout(PROBE_TIMEOUT).build()?;

    Ok(join_all(chains::CHAINS.iter().map(|chain| {
        let client = client.clone();
        async move { chains::probe_rpc(&client, &chain.rpc_url()).await.ok() }
    }))
    .await)
}

fn print_table(latencies: &[Option<u64>], probed: bool) {
    if probed {
        println!("{:<18} {:>9}  {:<22} {:>9}  RPC", "ID", "CHAIN ID", "NAME", "LATENCY");
    } else {
        println!("{:<18} {:>9}  {:<22} RPC", "ID", "CHAIN ID", "NAME");
    }

    for (chain, latency) in chains::CHAINS.iter().zip(latencies) {
        if probed {
            let latency = match latency {
                Some(ms) => format!("{ms} ms"),
                None => "-".to_string(),
            };
            println!(
                "{:<18} {:>9}  {:<22} {:>9}  {}",
                chain.id,
                chain.chain_id,
                chain.name,
                latency,
                chain.rpc_url()
            );
        } else {
            println!(
                "{:<18} {:>9}  {:<22} {}",
                chain.id,
                chain.chain_id,
                chain.name,
                chain.rpc_url()
            );
        }
    }
}
