//! Probe sequencer.
//!
//! Per target the sequence is a straight line, terminal on the first
//! failure:
//!
//! ```text
//! Start ──connect──► Connected ──server.version──► VersionNegotiated
//!        ──blockchain.transaction.get──► QueryComplete
//! ```
//!
//! Every phase that is attempted records its duration whether it succeeds
//! or fails; phases never reached stay unset and render as `N/A`. The
//! connection is dropped when the sequence ends, on every exit path.
//!
//! Targets run strictly one at a time; the only state crossing target
//! boundaries is the append-only record list the caller collects.

// ============================================================================
// Imports
// ============================================================================

use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::client::{self, CallReply};
use crate::error::Result;
use crate::report;
use crate::target::{CLIENT_NAME, PROTOCOL_VERSION, TX_HASH, Target};
use crate::transport;

// ============================================================================
// Constants
// ============================================================================

/// Request id for the `server.version` handshake.
const HANDSHAKE_ID: u64 = 1;

/// Request id for the diagnostic query.
const QUERY_ID: u64 = 2;

/// Diagnostic query method.
const QUERY_METHOD: &str = "blockchain.transaction.get";

// ============================================================================
// ProbeConfig
// ============================================================================

/// Run parameters. Compiled-in; there is no external configuration surface.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Bound on DNS resolution plus TCP connect, per target.
    pub connect_timeout: Duration,
    /// Read-phase quiescence timeout, per call.
    pub idle_timeout: Duration,
    /// Client name sent in the handshake.
    pub client_name: String,
    /// Protocol version offered in the handshake.
    pub protocol_version: String,
    /// Transaction hash for the diagnostic query.
    pub tx_hash: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(2),
            client_name: CLIENT_NAME.to_string(),
            protocol_version: PROTOCOL_VERSION.to_string(),
            tx_hash: TX_HASH.to_string(),
        }
    }
}

// ============================================================================
// TimingRecord
// ============================================================================

/// Per-target timing and outcome record.
///
/// Duration fields are unset for phases that were never reached. `total`
/// is set once the connect phase succeeds and sums the recorded phases.
#[derive(Debug, Clone)]
pub struct TimingRecord {
    /// The probed target.
    pub target: Target,
    /// Time spent in the connect phase (set whether it succeeded or failed).
    pub connect: Option<Duration>,
    /// Time spent in the `server.version` handshake.
    pub handshake: Option<Duration>,
    /// Time spent in the diagnostic query.
    pub query: Option<Duration>,
    /// Sum of the recorded phases; unset when the connect failed.
    pub total: Option<Duration>,
    /// `true` only when the query returned a non-error response with a
    /// populated result.
    pub succeeded: bool,
}

impl TimingRecord {
    fn new(target: Target) -> Self {
        Self {
            target,
            connect: None,
            handshake: None,
            query: None,
            total: None,
            succeeded: false,
        }
    }

    /// Sums the recorded phase durations into `total`.
    ///
    /// Called only once the connection was established; a connect failure
    /// leaves `total` unset so the summary shows `N/A`.
    fn finalize(&mut self) {
        let total = [self.connect, self.handshake, self.query]
            .into_iter()
            .flatten()
            .sum();
        self.total = Some(total);
    }
}

// ============================================================================
// Sequencer
// ============================================================================

/// Probes every target in order, one at a time.
///
/// Each target fully completes, teardown included, before the next starts.
/// Failures are terminal for their target only.
pub async fn run(targets: &[Target], config: &ProbeConfig) -> Vec<TimingRecord> {
    let mut records = Vec::with_capacity(targets.len());
    for target in targets {
        records.push(probe_target(target, config).await);
    }
    records
}

/// Runs the connect → handshake → query sequence against one target.
pub async fn probe_target(target: &Target, config: &ProbeConfig) -> TimingRecord {
    let mut record = TimingRecord::new(target.clone());

    report::target_header(target);

    // Phase 1: connect.
    report::phase(1, &format!("Connecting to {}:{}...", target.host, target.port));
    let started = Instant::now();
    let connected = transport::connect(&target.host, target.port, config.connect_timeout).await;
    record.connect = Some(started.elapsed());

    let mut stream = match connected {
        Ok(stream) => {
            report::ok("Connected successfully");
            stream
        }
        Err(err) => {
            report::fail(&format!("Failed to connect: {err}"));
            info!(target = %target, error = %err, "connect failed");
            return record;
        }
    };

    // Phase 2: mandatory version negotiation.
    report::phase(2, "Negotiating protocol version (server.version)...");
    let (result, elapsed) = client::call(
        &mut stream,
        "server.version",
        vec![
            json!(config.client_name),
            json!(config.protocol_version),
        ],
        HANDSHAKE_ID,
        config.idle_timeout,
    )
    .await;
    record.handshake = Some(elapsed);

    if !handshake_accepted(result) {
        record.finalize();
        return record;
    }

    // Phase 3: diagnostic query. Terminal either way; the stream drops
    // when this function returns.
    report::phase(3, &format!("Sending {QUERY_METHOD} request..."));
    report::detail("Transaction hash", &config.tx_hash);

    let (result, elapsed) = client::call(
        &mut stream,
        QUERY_METHOD,
        vec![json!(config.tx_hash), json!(true)],
        QUERY_ID,
        config.idle_timeout,
    )
    .await;
    record.query = Some(elapsed);
    record.succeeded = query_succeeded(result);
    record.finalize();

    debug!(
        target = %target,
        succeeded = record.succeeded,
        total_ms = record.total.map(|d| d.as_millis() as u64),
        "target sequence finished"
    );
    record
}

// ============================================================================
// Phase Evaluation
// ============================================================================

/// Evaluates the handshake reply; `false` ends the target's sequence.
///
/// A two-element array result is the normal shape (server software
/// version, negotiated protocol version). Other non-null shapes are
/// accepted but logged as non-standard; an error response or a missing
/// result is terminal.
fn handshake_accepted(result: Result<CallReply>) -> bool {
    let reply = match result {
        Ok(reply) => reply,
        Err(err) => {
            report::fail(&format!("Failed to negotiate protocol version: {err}"));
            return false;
        }
    };

    if let Some(error) = &reply.response.error {
        report::fail("Version negotiation error:");
        report::rpc_error(error.code, &error.message, error.data.as_ref());
        return false;
    }

    match &reply.response.result {
        Some(Value::Array(items)) if items.len() >= 2 => {
            report::ok("Protocol version negotiated");
            report::detail("Server version", &stringify(&items[0]));
            report::detail("Protocol version", &stringify(&items[1]));
            true
        }
        Some(Value::Null) | None => {
            report::fail("Version negotiation response has no result");
            false
        }
        Some(other) => {
            report::ok("Version negotiation successful");
            report::detail("Response", &other.to_string());
            warn!(result = %other, "non-standard server.version result shape");
            true
        }
    }
}

/// Evaluates the query reply against the success criterion: a non-error
/// response carrying a populated result.
fn query_succeeded(result: Result<CallReply>) -> bool {
    let reply = match result {
        Ok(reply) => reply,
        Err(err) => {
            report::fail(&format!("Failed to get response from server: {err}"));
            return false;
        }
    };
    report::ok("Received response");

    report::phase(4, "Response:");

    if let Some(error) = &reply.response.error {
        report::rpc_error(error.code, &error.message, error.data.as_ref());
        return false;
    }

    if !reply.response.has_populated_result() {
        report::warn_line("Response has no result field");
        return false;
    }

    if reply.degraded {
        report::warn_line("Response id did not match the request (degraded match)");
    }
    if let Some(result) = &reply.response.result {
        report::query_result(result);
    }
    true
}

/// Renders a JSON value for a detail line, unquoting plain strings.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
