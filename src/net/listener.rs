//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind the requested address before a server is registered, so a bind
//!   failure reaches the caller instead of a background log line
//! - Log the bound address (useful with port 0)

use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::GracefulError;

/// Bind `addr` (`host:port`, hostnames resolved) and return the listener with
/// its actual local address.
pub async fn bind(addr: &str) -> Result<(TcpListener, SocketAddr), GracefulError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| GracefulError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listener bound");

    Ok((listener, local_addr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_ephemeral_port() {
        let (_listener, addr) = bind("127.0.0.1:0").await.unwrap();
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn malformed_address_is_bind_error() {
        let err = bind("not-an-address").await.unwrap_err();
        assert!(matches!(err, GracefulError::Bind { ref addr, .. } if addr == "not-an-address"));
    }

    #[tokio::test]
    async fn port_in_use_is_bind_error() {
        let (_held, addr) = bind("127.0.0.1:0").await.unwrap();
        let err = bind(&addr.to_string()).await.unwrap_err();
        assert!(matches!(err, GracefulError::Bind { .. }));
    }
}
