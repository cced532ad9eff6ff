//! Framed JSON-RPC client.
//!
//! One request per call: serialize, write the newline-terminated line,
//! accumulate response bytes until the stream goes quiet, then correlate
//! the buffer with the outstanding request id.
//!
//! # Idle Detection
//!
//! Electrum servers do not announce response length, so end-of-message is
//! presumed from quiescence. The read loop is an explicit two-stage state
//! machine:
//!
//! ```text
//! Reading ──timeout, buffer empty──────────────► done (no data)
//! Reading ──timeout, buffer non-empty──► FinalCheck
//! FinalCheck ──one short-timeout read───► done (fragment appended or not)
//! ```
//!
//! A zero-byte read (remote close) ends the loop from either stage, as
//! does a socket error; whatever was accumulated before an error still
//! goes through matching.

// ============================================================================
// Imports
// ============================================================================

use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::protocol::{MatchOutcome, Request, Response, match_response};

// ============================================================================
// Constants
// ============================================================================

/// Read buffer chunk size (64 KiB).
const READ_CHUNK: usize = 64 * 1024;

/// Timeout for the single trailing-fragment read after the stream goes quiet.
const FINAL_CHECK_TIMEOUT: Duration = Duration::from_millis(100);

// ============================================================================
// CallReply
// ============================================================================

/// A response delivered by [`call`].
#[derive(Debug, Clone)]
pub struct CallReply {
    /// The correlated (or degraded-match) response.
    pub response: Response,
    /// `true` when the response id did not confirm correlation and the
    /// first parseable object was returned instead.
    pub degraded: bool,
}

// ============================================================================
// ReadStage
// ============================================================================

/// State of the idle-detection read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadStage {
    /// Normal accumulation under the idle timeout.
    Reading,
    /// The one extra short-timeout read after quiescence.
    FinalCheck,
}

// ============================================================================
// Call
// ============================================================================

/// Sends one JSON-RPC request and reads the correlated response.
///
/// The elapsed duration spans from just before the write to the point the
/// result is determined, and is returned on every path, failures included.
///
/// # Errors (in the result slot)
///
/// - [`Error::NoData`] if nothing arrived before `idle_timeout`
/// - [`Error::Decode`] if the accumulated bytes are not UTF-8
/// - [`Error::Unmatched`] if nothing in the buffer parsed as a JSON object
/// - [`Error::Io`] / [`Error::Json`] on write or serialization failure
pub async fn call<S>(
    stream: &mut S,
    method: &str,
    params: Vec<Value>,
    id: u64,
    idle_timeout: Duration,
) -> (Result<CallReply>, Duration)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let started = Instant::now();
    let result = call_inner(stream, method, params, id, idle_timeout).await;
    (result, started.elapsed())
}

async fn call_inner<S>(
    stream: &mut S,
    method: &str,
    params: Vec<Value>,
    id: u64,
    idle_timeout: Duration,
) -> Result<CallReply>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = Request::new(id, method, params);
    let wire = request.to_wire()?;

    stream.write_all(&wire).await?;
    trace!(id, method, bytes = wire.len(), "request written");

    let buffer = read_until_idle(stream, idle_timeout).await;
    if buffer.is_empty() {
        return Err(Error::NoData);
    }

    // Decode failure is terminal for the call; nothing is re-read.
    let text = String::from_utf8(buffer)?;
    debug!(id, chars = text.len(), "response buffer decoded");

    match match_response(&text, id) {
        MatchOutcome::Matched(response) => Ok(CallReply {
            response,
            degraded: false,
        }),
        MatchOutcome::Degraded(response) => {
            warn!(
                id,
                response_id = ?response.id,
                "no response matched the request id; using first parseable object"
            );
            Ok(CallReply {
                response,
                degraded: true,
            })
        }
        MatchOutcome::NoMatch => Err(Error::unmatched(&text)),
    }
}

/// Accumulates response bytes until the stream goes quiet.
///
/// Never fails: a socket error ends accumulation and the caller matches
/// against whatever arrived before it.
async fn read_until_idle<S>(stream: &mut S, idle_timeout: Duration) -> Vec<u8>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK];
    let mut stage = ReadStage::Reading;

    loop {
        let deadline = match stage {
            ReadStage::Reading => idle_timeout,
            ReadStage::FinalCheck => FINAL_CHECK_TIMEOUT,
        };

        match timeout(deadline, stream.read(&mut chunk)).await {
            Ok(Ok(0)) => {
                trace!("remote closed the connection");
                break;
            }
            Ok(Ok(n)) => {
                buffer.extend_from_slice(&chunk[..n]);
                trace!(bytes = n, total = buffer.len(), "chunk received");
                if stage == ReadStage::FinalCheck {
                    // Exactly one extra read; a trailing fragment does not
                    // reopen accumulation.
                    break;
                }
            }
            Ok(Err(e)) => {
                debug!(error = %e, received = buffer.len(), "socket read error, matching what was accumulated");
                break;
            }
            Err(_) => match stage {
                ReadStage::Reading if !buffer.is_empty() => {
                    trace!("idle timeout, running final check");
                    stage = ReadStage::FinalCheck;
                }
                _ => break,
            },
        }
    }

    buffer
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use tokio::io::duplex;

    const IDLE: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_call_matches_response_by_id() {
        let (mut client, mut server) = duplex(READ_CHUNK);

        let task = tokio::spawn(async move {
            let mut line = Vec::new();
            let mut byte = [0u8; 1];
            loop {
                server.read_exact(&mut byte).await.expect("read request");
                if byte[0] == b'\n' {
                    break;
                }
                line.push(byte[0]);
            }
            let request: Value = serde_json::from_slice(&line).expect("request json");
            assert_eq!(request["method"], "server.version");

            server
                .write_all(b"{\"id\":1,\"result\":[\"ServerX/1.4\",\"1.4\"]}\n")
                .await
                .expect("write response");
            // Drop closes the server half, ending the read loop promptly.
        });

        let (result, elapsed) = call(
            &mut client,
            "server.version",
            vec![json!("probe"), json!("1.4")],
            1,
            IDLE,
        )
        .await;

        let reply = result.expect("matched reply");
        assert!(!reply.degraded);
        assert!(reply.response.id_matches(1));
        assert!(elapsed > Duration::ZERO);
        task.await.expect("server task");
    }

    #[tokio::test]
    async fn test_call_no_data_reports_elapsed() {
        let (mut client, _server) = duplex(READ_CHUNK);

        let (result, elapsed) = call(&mut client, "server.version", vec![], 1, IDLE).await;

        assert!(matches!(result, Err(Error::NoData)));
        // The wait itself is part of the measured phase.
        assert!(elapsed >= IDLE);
    }

    #[tokio::test]
    async fn test_call_degraded_match() {
        let (mut client, mut server) = duplex(READ_CHUNK);

        tokio::spawn(async move {
            let mut sink = vec![0u8; 256];
            let _ = server.read(&mut sink).await;
            server
                .write_all(b"{\"id\":42,\"result\":\"stale\"}\n")
                .await
                .expect("write");
        });

        let (result, _) = call(&mut client, "blockchain.transaction.get", vec![], 2, IDLE).await;
        let reply = result.expect("degraded reply");
        assert!(reply.degraded);
        assert!(reply.response.id_matches(42));
    }

    #[tokio::test]
    async fn test_call_unparseable_response() {
        let (mut client, mut server) = duplex(READ_CHUNK);

        tokio::spawn(async move {
            let mut sink = vec![0u8; 256];
            let _ = server.read(&mut sink).await;
            server.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n").await.expect("write");
        });

        let (result, _) = call(&mut client, "server.version", vec![], 1, IDLE).await;
        match result {
            Err(Error::Unmatched { preview }) => assert!(preview.starts_with("HTTP/1.1")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_invalid_utf8() {
        let (mut client, mut server) = duplex(READ_CHUNK);

        tokio::spawn(async move {
            let mut sink = vec![0u8; 256];
            let _ = server.read(&mut sink).await;
            server.write_all(&[0xff, 0xfe, 0xfd]).await.expect("write");
        });

        let (result, _) = call(&mut client, "server.version", vec![], 1, IDLE).await;
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn test_final_check_catches_trailing_fragment() {
        let (mut client, mut server) = duplex(READ_CHUNK);

        tokio::spawn(async move {
            let mut sink = vec![0u8; 256];
            let _ = server.read(&mut sink).await;
            server.write_all(b"{\"id\":2,\"result\":").await.expect("write head");
            // Pause past the idle timeout, then complete within the
            // final-check window.
            tokio::time::sleep(IDLE + Duration::from_millis(20)).await;
            server.write_all(b"\"tail\"}\n").await.expect("write tail");
            // Keep the half open so only the final check can pick this up.
            tokio::time::sleep(Duration::from_millis(500)).await;
        });

        let (result, _) = call(&mut client, "blockchain.transaction.get", vec![], 2, IDLE).await;
        let reply = result.expect("reassembled reply");
        assert!(!reply.degraded);
        assert_eq!(reply.response.result, Some(json!("tail")));
    }

    #[tokio::test]
    async fn test_read_stops_after_final_check() {
        let (mut client, mut server) = duplex(READ_CHUNK);

        tokio::spawn(async move {
            let mut sink = vec![0u8; 256];
            let _ = server.read(&mut sink).await;
            server.write_all(b"{\"id\":2,\"result\":1}\n").await.expect("write");
            tokio::time::sleep(IDLE + Duration::from_millis(20)).await;
            server.write_all(b"{\"id\":9,\"result\":2}\n").await.expect("late write");
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        let started = Instant::now();
        let (result, _) = call(&mut client, "blockchain.transaction.get", vec![], 2, IDLE).await;

        // One idle window plus one final check, never a second cycle.
        assert!(started.elapsed() < IDLE * 3);
        assert!(result.expect("reply").response.id_matches(2));
    }
}
