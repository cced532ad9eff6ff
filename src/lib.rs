//! Electrum server probe - reachability and latency diagnostics.
//!
//! This crate connects to a fixed list of Electrum JSON-RPC servers over
//! plain TCP, performs the mandatory `server.version` handshake, issues
//! one verbose `blockchain.transaction.get` query, times every phase, and
//! renders a comparative report.
//!
//! # Design
//!
//! - One TCP connection per target, opened under a connect timeout and
//!   released by scope on every exit path
//! - Newline-framed JSON-RPC 2.0 with quiescence-based end-of-message
//!   detection (servers do not announce response length)
//! - Response correlation by request id with a documented degraded-match
//!   fallback for misbehaving servers
//! - Strictly sequential: one target at a time, no retries, each target
//!   attempted exactly once per run
//!
//! # Quick Start
//!
//! ```no_run
//! use electrum_probe::{probe, report, target};
//!
//! #[tokio::main]
//! async fn main() {
//!     let targets = target::builtin_targets();
//!     let config = probe::ProbeConfig::default();
//!
//!     let records = probe::run(&targets, &config).await;
//!     report::print_summary(&records);
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Framed RPC call with two-stage idle read |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`probe`] | Per-target sequencer and timing records |
//! | [`protocol`] | JSON-RPC message types and response matching |
//! | [`report`] | Progress output and summary table |
//! | [`target`] | Compiled-in target list and run constants |
//! | [`transport`] | TCP connect with error classification |

// ============================================================================
// Modules
// ============================================================================

/// Framed JSON-RPC client.
pub mod client;

/// Error types and result aliases.
pub mod error;

/// Probe sequencer and timing records.
pub mod probe;

/// JSON-RPC protocol message types and response matching.
pub mod protocol;

/// Console rendering.
pub mod report;

/// Probe targets and built-in run parameters.
pub mod target;

/// TCP transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Client types
pub use client::CallReply;

// Probe types
pub use probe::{ProbeConfig, TimingRecord};

// Protocol types
pub use protocol::{MatchOutcome, Request, Response, RpcError};

// Target types
pub use target::{Target, builtin_targets};
