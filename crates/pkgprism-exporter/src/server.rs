//! Exposition server lifecycle.
//!
//! The listener is bound before `start` returns so bind errors reach the
//! caller; serving then continues on its own tokio task until the process
//! exits or the handle is aborted.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use pkgprism_core::error::{PkgPrismError, Result};

use crate::{app_state::AppState, obs::Registry, ops, router};

pub struct ServerHandle {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop serving.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Let the server outlive the handle.
    pub fn detach(self) {
        drop(self.task);
    }
}

pub async fn start(listen: SocketAddr, registries: Vec<Arc<Registry>>) -> Result<ServerHandle> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| PkgPrismError::Internal(format!("bind {listen} failed: {e}")))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| PkgPrismError::Internal(format!("local_addr failed: {e}")))?;

    let app = router::build_router(AppState::new(registries));

    tracing::info!(port = local_addr.port(), route = ops::METRICS_ROUTE, "pkgprism exporter listening");
    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "metrics server stopped");
        }
    });

    Ok(ServerHandle { local_addr, task })
}
