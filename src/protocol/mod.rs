//! JSON-RPC protocol message types and response matching.
//!
//! Electrum servers speak JSON-RPC 2.0 framed as one message per line over
//! plain TCP. This module defines the wire types and the matching logic
//! that correlates an accumulated read buffer with the outstanding request.
//!
//! # Message Flow
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | `Request` | Probe → Server | `server.version` handshake, diagnostic query |
//! | `Response` | Server → Probe | `{id, result}` or `{id, error}` |
//! | notification | Server → Probe | No `id`; skipped during matching |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `request` | Request construction and wire serialization |
//! | `response` | Response and RPC error types |
//! | `matcher` | Buffer-to-request correlation with fallback chain |

// ============================================================================
// Submodules
// ============================================================================

/// Response matching over an accumulated read buffer.
pub mod matcher;

/// JSON-RPC request construction.
pub mod request;

/// JSON-RPC response types.
pub mod response;

// ============================================================================
// Re-exports
// ============================================================================

pub use matcher::{MatchOutcome, match_response};
pub use request::Request;
pub use response::{Response, RpcError};
