//! Helpers for tests that drive blocking HTTP clients against a local server.

use std::net::SocketAddr;

use axum::Router;

/// An axum app served on its own runtime. Dropping it stops the server.
pub(crate) struct BackgroundServer {
    pub addr: SocketAddr,
    _runtime: tokio::runtime::Runtime,
}

impl BackgroundServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// Serve `app` on an ephemeral port. Blocking clients can be called from
/// the test thread while the server runs on the runtime's worker.
pub(crate) fn serve_in_background(app: Router) -> BackgroundServer {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();

    let listener = runtime
        .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
        .unwrap();
    let addr = listener.local_addr().unwrap();
    runtime.spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    BackgroundServer {
        addr,
        _runtime: runtime,
    }
}

/// An address nothing listens on.
pub(crate) fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}
