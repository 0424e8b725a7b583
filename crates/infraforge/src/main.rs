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

//! InfraForge command-line interface
//!
//! Runs the HTTP deployment/audit API, inspects the chain registry, and
//! drives the security toolchain against local Solidity files.

use clap::{Parser, Subcommand};
use eyre::Result;
use std::path::PathBuf;

mod cmd;

/// Command-line interface for InfraForge
#[derive(Parser, Debug)]
#[command(name = "infraforge")]
#[command(about = "InfraForge - Multi-chain smart contract deployment and security auditing")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (repeat for more: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the deployment and audit API server
    Serve(ServeArgs),
    /// List the chains InfraForge can deploy to
    Chains(ChainsArgs),
    /// Audit a local Solidity file with the security toolchain
    Audit(AuditArgs),
}

/// Server mode arguments
#[derive(Parser, Debug)]
struct ServeArgs {
    /// Address to bind to
    /// Example: --host 0.0.0.0
    #[arg(long, env = "INFRAFORGE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "INFRAFORGE_PORT", default_value = "8000")]
    port: u16,
}

/// Chain listing arguments
#[derive(Parser, Debug)]
struct ChainsArgs {
    /// Emit the registry as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Probe every RPC endpoint and report its response time
    #[arg(long)]
    probe: bool,
}

/// Audit mode arguments
#[derive(Parser, Debug)]
struct AuditArgs {
    /// Path to the Solidity source file
    file: PathBuf,

    /// Run a single analyzer (slither or mythril) instead of the full toolchain
    #[arg(long)]
    tool: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let args = Args::parse();

    // Set RUST_LOG based on verbosity
    if std::env::var("RUST_LOG").is_err() {
        let level = match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    match args.command {
        Commands::Serve(serve_args) => cmd::run_server(serve_args).await,
        Commands::Chains(chains_args) => cmd::list_chains(chains_args).await,
        Commands::Audit(audit_args) => cmd::audit_file(audit_args).await,
    }
}
