mod connection;

pub use connection::{MAX_LINE_BYTES, handle_connection};

use crate::Registry;
use crate::error::{AppResult, InfraError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn bind(addr: SocketAddr) -> AppResult<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| InfraError::Net(format!("cannot bind {addr}: {e}")))?;
    Ok(listener)
}

/// Run the accept loop.
///
/// Each accepted connection is registered first and then handled on its own task,
/// so a slow or idle client never holds up the next accept.
pub async fn serve(listener: TcpListener, registry: Arc<Registry>) -> AppResult<()> {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let sess = registry.sessions.register(peer);
                let session_id = sess.read().id;
                tracing::info!(%peer, session = %session_id, "client connected");

                let registry = registry.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, registry, sess).await {
                        tracing::error!(%peer, session = %session_id, error = %e, "connection error");
                    }
                    tracing::info!(%peer, session = %session_id, "client disconnected");
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to accept connection");
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            }
        }
    }
}
