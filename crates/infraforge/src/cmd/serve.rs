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

//! Serve command - the long-running deployment and audit API

use eyre::Result;
use infraforge_common::logging::init_logging;
use infraforge_server::ApiServer;
use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
};
use tracing::info;

/// Bind the API server and run it until Ctrl+C.
pub async fn run_server(args: crate::ServeArgs) -> Result<()> {
    init_logging("infraforge-server", true)?;

    let ip = IpAddr::from_str(&args.host)?;
    let addr = SocketAddr::from((ip, args.port));

    let server = ApiServer::new();
    let bound = server.bind(addr).await?;
    println!("InfraForge API on http://{}", bound.local_addr());

    let mut server_handle = tokio::spawn(bound.serve());

    tokio::select! {
        result = &mut server_handle => {
            // The accept loop only exits early on a hard error.
            return result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            server.shutdown();
        }
    }

    server_handle.await??;
    info!("Server shut down cleanly");
    Ok(())
}
