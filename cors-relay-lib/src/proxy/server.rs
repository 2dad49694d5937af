use std::future::Future;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::proxy::connection::ConnectionManager;
use crate::proxy::context::RelayContext;
use crate::proxy::handler::handle_relay_request;

/// Bind the configured address and serve until SIGINT or SIGTERM
pub async fn run(config: Arc<RelayConfig>) -> Result<()> {
    let ctx = RelayContext::new(config.clone())?;
    let listener = TcpListener::bind(config.listen).await.map_err(RelayError::Io)?;
    serve(listener, ctx, shutdown_signal()?).await
}

/// Serve connections from `listener` until `shutdown` resolves, then wait up to
/// the configured shutdown timeout for open connections to finish
pub async fn serve<F>(listener: TcpListener, ctx: RelayContext, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let addr = listener.local_addr().map_err(RelayError::Io)?;
    let builder = ConnBuilder::new(TokioExecutor::new());
    let connections = Arc::new(ConnectionManager::new(ctx.config.security.max_connections));

    info!(%addr, mode = ctx.config.mode.name(), "cors relay listening (h1/h2)");

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections");
                connections.begin_shutdown();
                break;
            }
            result = listener.accept() => {
                let (stream, peer) = match result {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "accept error");
                        continue;
                    }
                };

                let guard = match connections.try_accept(peer) {
                    Ok(guard) => guard,
                    Err(e) => {
                        debug!(?peer, error = %e, "connection rejected");
                        drop(stream);
                        continue;
                    }
                };

                let builder = builder.clone();
                let ctx = ctx.clone();

                tokio::spawn(async move {
                    let _guard = guard;
                    let svc = hyper::service::service_fn(move |req: Request<Incoming>| {
                        let ctx = ctx.clone();
                        async move {
                            Ok::<_, std::convert::Infallible>(
                                handle_relay_request(req, peer, &ctx).await,
                            )
                        }
                    });

                    if let Err(e) = builder.serve_connection(TokioIo::new(stream), svc).await {
                        debug!(?peer, error = %e, "serve_connection error");
                    }
                });
            }
        }
    }

    let timeout = ctx.config.timeout.shutdown();
    info!(
        active_connections = connections.active(),
        "Waiting for active connections to finish (timeout: {}s)",
        timeout.as_secs()
    );
    connections.wait_for_drain(timeout).await;
    info!("Relay stopped");
    Ok(())
}

/// Resolves on the first SIGTERM or SIGINT
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).map_err(|e| {
        RelayError::Io(std::io::Error::other(format!("Failed to setup SIGTERM handler: {e}")))
    })?;
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).map_err(|e| {
        RelayError::Io(std::io::Error::other(format!("Failed to setup SIGINT handler: {e}")))
    })?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
            _ = sigint.recv() => info!("Received SIGINT, initiating graceful shutdown"),
        }
    })
}
