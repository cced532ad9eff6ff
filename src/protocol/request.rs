//! JSON-RPC request construction.
//!
//! Electrum speaks JSON-RPC 2.0 with one message per line; [`Request::to_wire`]
//! produces the newline-terminated line the transport writes.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Request
// ============================================================================

/// A JSON-RPC 2.0 request.
///
/// # Format
///
/// ```json
/// {"jsonrpc":"2.0","id":1,"method":"server.version","params":["electrum-probe/0.1","1.4"]}
/// ```
///
/// The `id` must be unique within a connection's lifetime so the matching
/// response can be correlated.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Protocol version marker, always `"2.0"`.
    pub jsonrpc: &'static str,

    /// Identifier for request/response correlation.
    pub id: u64,

    /// RPC method name, e.g. `blockchain.transaction.get`.
    pub method: String,

    /// Positional parameters.
    pub params: Vec<Value>,
}

impl Request {
    /// Creates a new request.
    #[inline]
    #[must_use]
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }

    /// Serializes the request to its wire form: one JSON line terminated
    /// by a single `\n`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_form() {
        let request = Request::new(1, "server.version", vec![json!("probe/1.0"), json!("1.4")]);
        let wire = request.to_wire().expect("serialize");

        assert_eq!(*wire.last().expect("non-empty"), b'\n');

        let text = std::str::from_utf8(&wire).expect("utf-8");
        let parsed: Value = serde_json::from_str(text.trim_end()).expect("parse");
        assert_eq!(parsed["jsonrpc"], "2.0");
        assert_eq!(parsed["id"], 1);
        assert_eq!(parsed["method"], "server.version");
        assert_eq!(parsed["params"][1], "1.4");
    }

    #[test]
    fn test_single_newline() {
        let request = Request::new(2, "blockchain.transaction.get", vec![json!("ab"), json!(true)]);
        let wire = request.to_wire().expect("serialize");
        let newlines = wire.iter().filter(|b| **b == b'\n').count();
        assert_eq!(newlines, 1);
    }
}
