//! Server loop
//!
//! Binds the listener and runs the router until the shutdown future
//! resolves.

use std::future::Future;
use std::path::Path;

use tokio::net::TcpListener;
use tracing::info;

use crate::broker::Broker;
use crate::config::Settings;
use crate::transport::routes::router;
use crate::utils::error::Result;

/// Bind to the configured address and serve until `shutdown` resolves.
pub async fn start_websocket_server<F>(settings: &Settings, broker: Broker, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(settings.bind_addr()).await?;
    serve(listener, broker, &settings.server.web_root, shutdown).await
}

/// Serve the application on an already bound listener.
///
/// Returns once `shutdown` resolves and in-flight HTTP requests finish.
/// Upgraded WebSocket connections are not waited for; they end when the
/// broker shuts down and retires their subscriptions.
pub async fn serve<F>(listener: TcpListener, broker: Broker, web_root: impl AsRef<Path>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("WebSocket server listening on ws://{addr}");

    axum::serve(listener, router(broker, web_root))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("WebSocket server stopped");
    Ok(())
}
