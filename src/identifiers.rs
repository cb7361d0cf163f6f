//! Correlation identifiers for protocol messages.
//!
//! The embedded web checkout correlates a response to its originating
//! request by structural equality of the `id` field. The id arrives as
//! either a JSON string or a JSON number, and the reply must echo it
//! with the same JSON type, so [`RequestId`] preserves the decoded form
//! instead of normalizing to one representation.
//!
//! # Format
//!
//! ```json
//! { "id": "a1b2c3" }
//! { "id": 42 }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

// ============================================================================
// RequestId
// ============================================================================

/// Correlation id carried by request-type messages.
///
/// Deserializes from a JSON string or number and serializes back to the
/// same JSON type. The remote end matches replies by structural equality,
/// so `"7"` and `7` are distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// String-form id.
    Text(String),

    /// Numeric-form id.
    Number(Number),
}

impl RequestId {
    /// Returns the id as a string slice if it is string-form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    /// Returns the id as a JSON number if it is numeric-form.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Text(_) => None,
            Self::Number(number) => Some(number),
        }
    }

    /// Returns `true` if the id is string-form.
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns `true` if the id is numeric-form.
    #[inline]
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for RequestId {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RequestId {
    #[inline]
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for RequestId {
    #[inline]
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<i64> for RequestId {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

// ============================================================================
// Tests
// ============================================================================
