//! HTTP server for browser-based access to promptrepo.
//!
//! Exposes the store operations as JSON endpoints under `/api`, and
//! optionally serves a static web UI for every other path.

mod routes;
mod state;

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

pub use routes::ApiResponse;
pub use state::SharedState;

/// Handle to a server running on its own thread.
#[derive(Default)]
pub struct HttpServerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<std::thread::JoinHandle<()>>,
}

impl HttpServerHandle {
    /// Check if the server is running.
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }

    /// Stop the server gracefully and wait for its thread.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.join();
        }
    }
}

impl Drop for HttpServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Build the application router.
///
/// When `static_dir` is given, requests that match no API route are served
/// from that directory.
pub fn router(state: Arc<SharedState>, static_dir: Option<PathBuf>) -> Router {
    let mut app = routes::api_routes()
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(
    state: Arc<SharedState>,
    addr: SocketAddr,
    static_dir: Option<PathBuf>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state, static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            log::info!("HTTP server shutting down");
        })
        .await
}

/// Start the server on a separate thread with its own tokio runtime.
///
/// Returns a handle that stops the server when asked or dropped.
pub fn start(
    state: Arc<SharedState>,
    host: &str,
    port: u16,
    static_dir: Option<PathBuf>,
) -> Result<HttpServerHandle, String> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("Invalid address: {e}"))?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create tokio runtime: {e}");
                return;
            }
        };

        rt.block_on(async move {
            let shutdown = async {
                shutdown_rx.await.ok();
            };
            if let Err(e) = serve(state, addr, static_dir, shutdown).await {
                log::error!("HTTP server on {addr} failed: {e}");
            }
        });
    });

    Ok(HttpServerHandle {
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use promptrepo_core::PromptStore;

    fn test_state(dir: &tempfile::TempDir) -> Arc<SharedState> {
        let store = Arc::new(PromptStore::open(dir.path().join("prompts.json")).unwrap());
        Arc::new(SharedState::new(store))
    }

    #[test]
    fn http_server_handle_default() {
        let handle = HttpServerHandle::default();
        assert!(!handle.is_running());
    }

    #[test]
    fn threaded_server_starts_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = start(test_state(&dir), "127.0.0.1", 0, None).unwrap();

        assert!(handle.is_running());
        std::thread::sleep(std::time::Duration::from_millis(100));

        handle.stop();
        assert!(!handle.is_running());
    }

    #[test]
    fn start_rejects_bad_address() {
        let dir = tempfile::tempdir().unwrap();
        assert!(start(test_state(&dir), "not a host", 5003, None).is_err());
    }

    #[tokio::test]
    async fn server_starts_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let task = tokio::spawn(serve(state, addr, None, async {
            shutdown_rx.await.ok();
        }));

        shutdown_tx.send(()).unwrap();
        task.await.unwrap().unwrap();
    }
}
