//! HTTP listener lifecycle.

use std::future::Future;
use std::net::SocketAddr;

use tracing::info;

use super::routes::routes;
use super::state::AppState;
use crate::error::{Error, Result};

/// Serve the API on `addr` until `shutdown` resolves.
///
/// # Errors
/// Returns an error if the address cannot be bound.
pub async fn serve(
    state: &AppState,
    addr: SocketAddr,
    cors_any_origin: bool,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let (bound, server) = warp::serve(routes(state, cors_any_origin))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(|e| Error::Connection(format!("bind {addr}: {e}")))?;
    info!(addr = %bound, "http server listening");
    server.await;
    info!("http server stopped");
    Ok(())
}
