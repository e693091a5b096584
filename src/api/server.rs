//! HTTP server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel.
//! `serve_until` is the foreground variant used by the binary.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::core_state::CoreState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Handle to a server running in a background task.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

async fn bind(addr: SocketAddr) -> Result<tokio::net::TcpListener, ServerError> {
    tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Start the server in a background task. Port 0 picks an ephemeral port;
/// the bound address is on the returned handle.
pub async fn start_server(core: Arc<CoreState>, addr: SocketAddr) -> Result<ApiServer, ServerError> {
    let listener = bind(addr).await?;
    let addr = listener.local_addr()?;
    let app = api_router(core);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Serve on `addr` in the current task until `shutdown` resolves.
pub async fn serve_until<F>(
    core: Arc<CoreState>,
    addr: SocketAddr,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = bind(addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "LexAid listening");

    axum::serve(listener, api_router(core))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("LexAid stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::config::AppConfig;
    use crate::pipeline::llm::gateway::testing::ScriptedLlmClient;
    use crate::pipeline::llm::ModelGateway;
    use crate::pipeline::rag::ContextBuilder;
    use crate::pipeline::LegalOrchestrator;
    use crate::vault::{LocalDocumentStore, Vault};

    fn test_core(dir: &std::path::Path) -> Arc<CoreState> {
        let mut config = AppConfig::default();
        config.static_dir = dir.join("static");
        config.upload_dir = dir.join("uploads");
        config.supabase = None;

        let gateway = ModelGateway::new(Box::new(ScriptedLlmClient::default()), "m", 0.5);
        let orchestrator =
            LegalOrchestrator::new(gateway, ContextBuilder::truncating(), config.context_cap);
        let vault = Vault::new(
            None,
            Box::new(LocalDocumentStore::new(config.upload_dir.clone())),
        );
        Arc::new(CoreState::new(config, orchestrator, vault, None))
    }

    fn loopback() -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = start_server(test_core(dir.path()), loopback()).await.unwrap();
        assert!(server.addr.port() > 0);

        let url = format!("http://{}/api/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "ok");

        server.shutdown();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = start_server(test_core(dir.path()), loopback()).await.unwrap();

        let url = format!("http://{}/nonexistent", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = start_server(test_core(dir.path()), loopback()).await.unwrap();
        server.shutdown();
        server.shutdown();
    }

    #[tokio::test]
    async fn serve_until_returns_after_signal() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve_until(test_core(dir.path()), loopback(), async move {
            let _ = rx.await;
        }));

        let _ = tx.send(());
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = start_server(test_core(dir.path()), loopback()).await.unwrap();
        let result = start_server(test_core(dir.path()), first.addr).await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));
        first.shutdown();
    }
}
