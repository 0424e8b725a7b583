// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! InfraForge HTTP API server.
//!
//! A thin JSON façade over the deployment engine and the security audit
//! aggregator. Handlers translate engine errors into HTTP statuses and
//! otherwise pass the structured results through unchanged.

/// Engine-to-HTTP error translation
pub mod error;
/// Route table and endpoint handlers
pub mod routes;

use std::net::SocketAddr;

use axum::Router;
use eyre::Result;
use infraforge_audit::Auditor;
use infraforge_engine::Deployer;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct ApiState {
    /// Deployment pipeline with its per-account serialization table.
    pub deployer: Deployer,
    /// Audit fan-out over the configured analyzers.
    pub auditor: Auditor,
}

impl ApiState {
    /// State with a fresh deployer and the default analyzer set.
    pub fn new() -> Self {
        Self { deployer: Deployer::new(), auditor: Auditor::new() }
    }
}

impl Default for ApiState {
    fn default() -> Self {
        Self::new()
    }
}

/// The InfraForge API server.
///
/// Bind first, then serve; binding separately lets callers learn the local
/// address before the accept loop starts, which is how tests drive an
/// ephemeral-port instance.
#[derive(Clone)]
pub struct ApiServer {
    state: ApiState,
    shutdown_tx: broadcast::Sender<()>,
}

impl ApiServer {
    /// Server over fresh state.
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self { state: ApiState::new(), shutdown_tx }
    }

    /// Signal every serving instance to stop accepting and drain.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Bind the listening socket.
    pub async fn bind(&self, addr: SocketAddr) -> Result<BoundApiServer> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        Ok(BoundApiServer {
            app: routes::router(self.state.clone()),
            listener,
            local_addr,
            shutdown_rx: self.shutdown_tx.subscribe(),
        })
    }
}

impl Default for ApiServer {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound, not-yet-serving API server.
pub struct BoundApiServer {
    app: Router,
    listener: TcpListener,
    local_addr: SocketAddr,
    shutdown_rx: broadcast::Receiver<()>,
}

impl BoundApiServer {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run the accept loop until shutdown is signalled.
    pub async fn serve(self) -> Result<()> {
        let Self { app, listener, local_addr, mut shutdown_rx } = self;
        info!("InfraForge API listening on {local_addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("shutdown signal received, stopping server gracefully");
            })
            .await?;

        Ok(())
    }
}
