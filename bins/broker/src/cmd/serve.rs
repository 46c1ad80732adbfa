use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Effective;
use crate::error::BrokerServerError;
use topic_api_server::ServeError;
use topic_engine::Broker;

pub async fn run(eff: Effective) -> Result<(), BrokerServerError> {
    tracing::info!("procon-broker starting");

    let broker = Arc::new(Broker::new());

    // --- CancellationToken for graceful shutdown ---
    let token = CancellationToken::new();

    // --- API server (HTTP) ---
    tracing::info!(listen = %eff.listen, "starting api server");
    let api_listen = eff.listen.clone();
    let api_broker = broker.clone();
    let api_token = token.clone();
    let mut api_handle = tokio::spawn(async move {
        topic_api_server::run(&api_listen, api_broker, api_token).await
    });

    // --- Wait for SIGINT/SIGTERM, or the server dying on its own (e.g. bind failure) ---
    tokio::select! {
        res = &mut api_handle => {
            res??;
            tracing::warn!("api server exited without a shutdown signal");
            return Ok(());
        }
        res = shutdown_signal() => {
            res?;
        }
    }
    tracing::info!("shutting down...");

    drain(&token, api_handle, eff.shutdown_grace).await?;

    tracing::info!(topics = broker.directory().len(), "shutdown complete");
    Ok(())
}

/// How the API task ended after shutdown was requested.
#[derive(Debug, PartialEq, Eq)]
enum Drained {
    Clean,
    Aborted,
}

/// Cancel `token` and give the API task `grace` to finish in-flight requests,
/// aborting it afterwards.
async fn drain(
    token: &CancellationToken,
    mut handle: JoinHandle<Result<(), ServeError>>,
    grace: Duration,
) -> Result<Drained, BrokerServerError> {
    token.cancel();

    match tokio::time::timeout(grace, &mut handle).await {
        Ok(res) => {
            res??;
            Ok(Drained::Clean)
        }
        Err(_) => {
            tracing::warn!(?grace, "api server did not drain in time, aborting");
            handle.abort();
            Ok(Drained::Aborted)
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<(), BrokerServerError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = sigterm.recv() => tracing::info!("SIGTERM received"),
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<(), BrokerServerError> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drain_waits_for_cooperative_task() {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            task_token.cancelled().await;
            Ok(())
        });

        let drained = drain(&token, handle, Duration::from_secs(5)).await.unwrap();
        assert_eq!(drained, Drained::Clean);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn drain_aborts_task_past_grace() {
        let token = CancellationToken::new();
        let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            // Ignores cancellation; the sender is dropped only when the task is aborted.
            let _done = done_tx;
            std::future::pending::<()>().await;
            Ok(())
        });

        let drained = drain(&token, handle, Duration::ZERO).await.unwrap();
        assert_eq!(drained, Drained::Aborted);
        // Aborting drops the task's future, closing the channel.
        assert!(done_rx.await.is_err());
    }

    #[tokio::test]
    async fn drain_surfaces_server_errors() {
        let token = CancellationToken::new();
        let handle = tokio::spawn(async {
            Err(ServeError::Serve(std::io::Error::other("boom")))
        });

        let err = drain(&token, handle, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, BrokerServerError::Serve(ServeError::Serve(_))));
    }
}
