//! TCP transport layer.
//!
//! One plain TCP connection per target, opened under a connect timeout and
//! released by scope (the stream drops when the probe sequence for its
//! target ends, on every exit path including cancellation).
//!
//! # Connect Classification
//!
//! Connect failures are classified so the report can distinguish a dead
//! host from a slow one:
//!
//! | Failure | Error |
//! |---------|-------|
//! | Deadline elapsed | [`Error::ConnectTimeout`] |
//! | Hostname did not resolve | [`Error::Dns`] |
//! | RST on connect | [`Error::ConnectionRefused`] |
//! | Anything else | [`Error::Connect`] |
//!
//! The connect timeout covers DNS resolution plus the TCP handshake; the
//! returned stream carries no read/write deadline of its own. Read-phase
//! timeouts belong to the client layer.

// ============================================================================
// Imports
// ============================================================================

use std::io::{Error as IoError, ErrorKind};
use std::time::Duration;

use tokio::net::{TcpStream, lookup_host};
use tokio::time::timeout;
use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// Connect
// ============================================================================

/// Opens a TCP connection to `host:port`, bounded by `connect_timeout`.
///
/// Resolution picks the first address the resolver returns, matching a
/// single connect attempt per target.
///
/// # Errors
///
/// Returns a classified connect error; see the module table.
pub async fn connect(host: &str, port: u16, connect_timeout: Duration) -> Result<TcpStream> {
    let attempt = async {
        let mut addrs = lookup_host((host, port))
            .await
            .map_err(|e| Error::dns(host, e.to_string()))?;
        let addr = addrs
            .next()
            .ok_or_else(|| Error::dns(host, "no addresses returned"))?;

        debug!(%addr, "resolved target");

        TcpStream::connect(addr)
            .await
            .map_err(classify_connect_error)
    };

    match timeout(connect_timeout, attempt).await {
        Ok(result) => result,
        Err(_) => Err(Error::connect_timeout(connect_timeout.as_millis() as u64)),
    }
}

/// Maps a TCP connect [`IoError`] onto the probe's error taxonomy.
///
/// Kept separate from [`connect`] so the mapping is testable without a
/// network.
#[must_use]
pub fn classify_connect_error(err: IoError) -> Error {
    match err.kind() {
        ErrorKind::ConnectionRefused => Error::ConnectionRefused,
        ErrorKind::TimedOut => Error::connect_timeout(0),
        _ => Error::connect(err.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_refused() {
        let err = IoError::new(ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            classify_connect_error(err),
            Error::ConnectionRefused
        ));
    }

    #[test]
    fn test_classify_os_timeout() {
        let err = IoError::new(ErrorKind::TimedOut, "timed out");
        assert!(classify_connect_error(err).is_timeout());
    }

    #[test]
    fn test_classify_other() {
        let err = IoError::new(ErrorKind::NetworkUnreachable, "unreachable");
        assert!(matches!(
            classify_connect_error(err),
            Error::Connect { .. }
        ));
    }

    #[tokio::test]
    async fn test_connect_refused_classification() {
        // Bind then drop to find a port with no listener.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let err = connect("127.0.0.1", port, Duration::from_secs(5))
            .await
            .expect_err("connect should fail");
        assert!(err.is_connect_error());
    }

    #[tokio::test]
    async fn test_connect_dns_failure() {
        let err = connect("host.invalid", 50001, Duration::from_secs(5))
            .await
            .expect_err("resolution should fail");
        // RFC 6761 reserves .invalid; either a Dns classification or, on
        // resolvers that stall, a connect timeout.
        assert!(err.is_connect_error());
    }

    #[tokio::test]
    async fn test_connect_deadline_elapsed() {
        use tokio::net::TcpSocket;

        // A backlog-1 listener that never accepts: once the accept and SYN
        // queues fill, a further connect gets no SYN-ACK and hangs until
        // the deadline.
        let socket = TcpSocket::new_v4().expect("socket");
        socket
            .bind("127.0.0.1:0".parse().expect("loopback addr"))
            .expect("bind");
        let listener = socket.listen(1).expect("listen");
        let addr = listener.local_addr().expect("addr");

        let mut saturators = Vec::new();
        for _ in 0..3 {
            if let Ok(Ok(stream)) =
                timeout(Duration::from_millis(200), TcpStream::connect(addr)).await
            {
                saturators.push(stream);
            }
        }

        let err = connect("127.0.0.1", addr.port(), Duration::from_millis(250))
            .await
            .expect_err("connect should exceed the deadline");
        assert!(matches!(err, Error::ConnectTimeout { .. }));

        drop(saturators);
        drop(listener);
    }

    #[tokio::test]
    async fn test_connect_success() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("addr").port();

        let stream = connect("127.0.0.1", port, Duration::from_secs(5))
            .await
            .expect("connect");
        assert!(stream.peer_addr().is_ok());
    }
}
