//! Probe targets and built-in run parameters.
//!
//! The target list and diagnostic transaction hash are compiled in; there
//! is deliberately no flag, environment, or file configuration surface.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Transaction hash queried in the diagnostic phase.
pub const TX_HASH: &str = "adf3a2698e31900f9b710da73d71748cda96ce26b12bddcb8d69eaa835bedc73";

/// Client name sent in the `server.version` handshake.
pub const CLIENT_NAME: &str = "electrum-probe/0.1";

/// Protocol version offered in the `server.version` handshake.
pub const PROTOCOL_VERSION: &str = "1.4";

// ============================================================================
// Target
// ============================================================================

/// A single Electrum server endpoint to probe.
///
/// Immutable; the full list is declared at startup and never changes
/// during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Human-readable name used in progress output and the summary table.
    pub name: String,
    /// Server hostname (resolved at connect time).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Target {
    /// Creates a new target.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.host, self.port)
    }
}

// ============================================================================
// Built-in Target List
// ============================================================================

/// Returns the compiled-in list of servers to probe, in source order.
///
/// Source order matters: fastest-server ties are broken by the first
/// target encountered.
#[must_use]
pub fn builtin_targets() -> Vec<Target> {
    vec![
        Target::new(
            "Electrum Server 1 (cipig.net)",
            "kmd.electrum3.cipig.net",
            10001,
        ),
        Target::new(
            "Electrum Server 2 (kmdclassic.com)",
            "electrum.kmdclassic.com",
            50001,
        ),
    ]
}

// ============================================================================
// Tests
// ============================================================================
