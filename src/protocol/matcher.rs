//! Response matching over an accumulated read buffer.
//!
//! An Electrum server may deliver the reply to a request interleaved with
//! notifications, split across lines, or concatenated without delimiters.
//! [`match_response`] applies a fixed fallback chain over the decoded text,
//! first match wins:
//!
//! 1. Per-line: any newline-delimited candidate that parses as a JSON
//!    object whose `id` equals the outstanding request id.
//! 2. Whole-buffer: the entire text parsed as one JSON object with a
//!    matching `id` (covers servers that emit multi-line JSON with no
//!    intermediate delimiter).
//! 3. Degraded: the first candidate that parses as a JSON object at all,
//!    returned without id confirmation.
//! 4. No match.
//!
//! The degraded branch can hand back a response that does not belong to
//! the current request when a server misbehaves or pipelines; that is
//! deliberate, long-standing behavior and callers surface it as a warning.
//!
//! The function is pure: same input, same outcome, no iteration-order
//! dependence.

// ============================================================================
// Imports
// ============================================================================

use super::Response;

// ============================================================================
// MatchOutcome
// ============================================================================

/// Result of matching a read buffer against an outstanding request id.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// A response whose id equals the outstanding request id.
    Matched(Response),
    /// A parseable JSON object whose id did not confirm correlation.
    Degraded(Response),
    /// Nothing in the buffer parsed as a JSON object.
    NoMatch,
}

impl MatchOutcome {
    /// Returns `true` for [`MatchOutcome::Matched`].
    #[inline]
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Returns `true` for [`MatchOutcome::Degraded`].
    #[inline]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Matches the decoded response text against `request_id`.
///
/// Candidate messages are the newline-separated, non-blank segments of
/// `text`. A candidate that fails to parse as JSON is skipped without
/// affecting the others.
#[must_use]
pub fn match_response(text: &str, request_id: u64) -> MatchOutcome {
    let candidates: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    // Pass 1: newline-delimited candidate with a matching id.
    for line in &candidates {
        if let Ok(response) = serde_json::from_str::<Response>(line)
            && response.id_matches(request_id)
        {
            return MatchOutcome::Matched(response);
        }
    }

    // Pass 2: the whole buffer as a single JSON object.
    if let Ok(response) = serde_json::from_str::<Response>(text.trim())
        && response.id_matches(request_id)
    {
        return MatchOutcome::Matched(response);
    }

    // Pass 3: first candidate that is a JSON object at all.
    for line in &candidates {
        if let Ok(response) = serde_json::from_str::<Response>(line) {
            return MatchOutcome::Degraded(response);
        }
    }

    MatchOutcome::NoMatch
}

// ============================================================================
// Tests
// ============================================================================
