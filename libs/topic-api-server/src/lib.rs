mod http;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;

use topic_engine::Broker;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("axum serve: {0}")]
    Serve(std::io::Error),
}

#[derive(Clone)]
struct AppState {
    broker: Arc<Broker>,
}

/// Routes of the broker HTTP API.
///
/// - `POST /producer` — append `{"topic", "data"}`, returns the new length.
/// - `GET /consumer?topic=&s_offset=&e_offset=` — read a range.
/// - `GET /api/topics` — list topic names.
pub fn router(broker: Arc<Broker>) -> Router {
    Router::new()
        .route("/producer", post(http::handle_produce))
        .route("/consumer", get(http::handle_consume))
        .route("/api/topics", get(http::handle_list_topics))
        .with_state(AppState { broker })
}

/// Serve the broker API on `listen` until `shutdown` is cancelled.
///
/// In-flight requests are drained before returning.
pub async fn run(
    listen: &str,
    broker: Arc<Broker>,
    shutdown: CancellationToken,
) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|source| ServeError::Bind {
            addr: listen.to_string(),
            source,
        })?;
    serve(listener, broker, shutdown).await
}

/// Like [`run`], on an already bound listener.
pub async fn serve(
    listener: tokio::net::TcpListener,
    broker: Arc<Broker>,
    shutdown: CancellationToken,
) -> Result<(), ServeError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "broker api listening");
    }

    axum::serve(listener, router(broker))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(ServeError::Serve)?;

    tracing::info!("broker api stopped");
    Ok(())
}
