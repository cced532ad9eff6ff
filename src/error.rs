//! Error types for the Electrum probe.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use electrum_probe::{Result, transport};
//!
//! async fn example() -> Result<()> {
//!     let stream = transport::connect("example.com", 50001, timeout).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Connect | [`Error::ConnectTimeout`], [`Error::Dns`], [`Error::ConnectionRefused`], [`Error::Connect`] |
//! | Read | [`Error::NoData`], [`Error::Decode`] |
//! | Protocol | [`Error::Rpc`], [`Error::Unmatched`] |
//! | External | [`Error::Io`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;
use std::string::FromUtf8Error;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for the per-phase diagnostic
/// lines the probe prints when a target fails.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Connect Errors
    // ========================================================================
    /// TCP connect (including DNS resolution) exceeded the connect timeout.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Hostname could not be resolved.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// Hostname that failed to resolve.
        host: String,
        /// Resolver error description.
        message: String,
    },

    /// Remote end actively refused the connection.
    #[error("Connection refused")]
    ConnectionRefused,

    /// Any other connect failure.
    #[error("Connection error: {message}")]
    Connect {
        /// Description of the connect failure.
        message: String,
    },

    // ========================================================================
    // Read Errors
    // ========================================================================
    /// No response bytes arrived before the idle timeout.
    #[error("No response data received")]
    NoData,

    /// Accumulated response bytes were not valid UTF-8.
    ///
    /// Terminal for the call; the response is not re-read.
    #[error("Response decode error: {0}")]
    Decode(#[from] FromUtf8Error),

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// The matched response carried a JSON-RPC `error` object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },

    /// No received candidate parsed as a JSON object at all.
    ///
    /// Carries a truncated prefix of the raw text for diagnosis. This is
    /// distinct from a degraded match, which still yields a usable response.
    #[error("No parseable response; received: {preview}")]
    Unmatched {
        /// Prefix of the raw received text.
        preview: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error on an established connection.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error building the request line.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a connect timeout error.
    #[inline]
    pub fn connect_timeout(timeout_ms: u64) -> Self {
        Self::ConnectTimeout { timeout_ms }
    }

    /// Creates a DNS resolution error.
    #[inline]
    pub fn dns(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dns {
            host: host.into(),
            message: message.into(),
        }
    }

    /// Creates a generic connect error.
    #[inline]
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Creates an RPC error from a response `error` object.
    #[inline]
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Creates an unmatched-response error with a raw-text preview.
    ///
    /// The preview is truncated to 500 characters, matching the amount the
    /// diagnostic output shows.
    pub fn unmatched(raw: &str) -> Self {
        let mut preview: String = raw.chars().take(500).collect();
        if raw.chars().count() > 500 {
            preview.push_str("...");
        }
        Self::Unmatched { preview }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ConnectTimeout { .. } | Self::NoData)
    }

    /// Returns `true` if this error occurred during the connect phase.
    #[inline]
    #[must_use]
    pub fn is_connect_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectTimeout { .. }
                | Self::Dns { .. }
                | Self::ConnectionRefused
                | Self::Connect { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
