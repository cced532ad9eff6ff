//! JSON-RPC response types.
//!
//! Responses are deserialized leniently: every field is optional because
//! misbehaving servers are exactly what this tool exists to diagnose. The
//! `id` is kept as a raw [`Value`] so an off-shape echo still parses and
//! can be reported, but only a numeric id confirms correlation.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// Response
// ============================================================================

/// A JSON-RPC response: either `{id, result}` or `{id, error}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Echo of the request id, if the server sent one.
    #[serde(default)]
    pub id: Option<Value>,

    /// Result payload (success case).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error payload (failure case).
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl Response {
    /// Returns `true` if the response carries an `error` object.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns `true` if this response's id equals `request_id`.
    ///
    /// Only a numeric id matches; a server echoing the id back as a
    /// string fails correlation and falls through to the degraded path.
    #[must_use]
    pub fn id_matches(&self, request_id: u64) -> bool {
        match &self.id {
            Some(Value::Number(n)) => n.as_u64() == Some(request_id),
            _ => false,
        }
    }

    /// Returns `true` if the result is present and non-empty.
    ///
    /// Null, `false`, `""`, `[]`, and `{}` all count as empty; the probe's
    /// success criterion requires a populated result.
    #[must_use]
    pub fn has_populated_result(&self) -> bool {
        match &self.result {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
            Some(Value::Number(_)) => true,
        }
    }

    /// Extracts the result value, converting an error response into
    /// [`Error::Rpc`].
    pub fn into_result(self) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(Error::rpc(error.code, error.message));
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

// ============================================================================
// RpcError
// ============================================================================

/// The `error` member of a failed JSON-RPC response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    /// Numeric error code.
    #[serde(default)]
    pub code: i64,

    /// Human-readable error message.
    #[serde(default)]
    pub message: String,

    /// Optional server-specific detail.
    #[serde(default)]
    pub data: Option<Value>,
}

// ============================================================================
// Tests
// ============================================================================
