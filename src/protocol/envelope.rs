//! Envelope codec: inbound parse and outbound encode.
//!
//! Every message crossing the WebView boundary travels inside a JSON-RPC
//! 2.0 envelope. Inbound parsing is total: malformed JSON, a non-object,
//! or a version mismatch all yield `None`, never a panic or an error —
//! inbound text from the web layer is untrusted and subject to version
//! skew, so the bridge degrades instead of failing.
//!
//! # Format
//!
//! Inbound:
//! ```json
//! {
//!   "jsonrpc": "2.0",
//!   "method": "checkout.addressChangeRequested",
//!   "params": { ... },
//!   "id": "a1b2c3"
//! }
//! ```
//!
//! Outbound response:
//! ```json
//! {
//!   "jsonrpc": "2.0",
//!   "id": "a1b2c3",
//!   "result": { ... }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::RequestId;

// ============================================================================
// Constants
// ============================================================================

/// Supported protocol version; envelopes carrying any other value are
/// rejected before their remaining fields are inspected.
pub const PROTOCOL_VERSION: &str = "2.0";

// ============================================================================
// Envelope
// ============================================================================

/// The outer JSON object carrying version, method, params, and optional
/// correlation id.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// Protocol version, always [`PROTOCOL_VERSION`] after a successful parse.
    pub jsonrpc: String,

    /// Method name in `checkout.methodName` format.
    #[serde(default)]
    pub method: Option<String>,

    /// Method-specific parameters.
    #[serde(default)]
    pub params: Option<Value>,

    /// Correlation id, present only on request-type messages.
    #[serde(default)]
    pub id: Option<RequestId>,
}

impl Envelope {
    /// Parses a raw inbound string into an envelope.
    ///
    /// The version gate runs first: if `jsonrpc` is absent or is not
    /// [`PROTOCOL_VERSION`], parsing stops without inspecting the other
    /// fields. Returns `None` on any failure; never panics.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(error) => {
                debug!(%error, "Dropping unparseable inbound message");
                return None;
            }
        };

        // Version gate before any other field is touched.
        match value.get("jsonrpc").and_then(Value::as_str) {
            Some(PROTOCOL_VERSION) => {}
            Some(version) => {
                debug!(version, "Dropping envelope with unsupported version");
                return None;
            }
            None => {
                debug!("Dropping envelope without version field");
                return None;
            }
        }

        match serde_json::from_value(value) {
            Ok(envelope) => Some(envelope),
            Err(error) => {
                debug!(%error, "Dropping malformed envelope");
                None
            }
        }
    }

    /// Returns `true` if the envelope carries a correlation id.
    #[inline]
    #[must_use]
    pub fn is_request(&self) -> bool {
        self.id.is_some()
    }
}

// ============================================================================
// Outbound Envelopes
// ============================================================================

/// Response envelope addressed by the echoed correlation id.
///
/// The id is echoed verbatim: the remote side correlates replies by
/// structural equality, so its JSON type must survive the round trip.
#[derive(Debug, Serialize)]
struct ResponseEnvelope<'a, T: Serialize> {
    jsonrpc: &'static str,
    id: &'a RequestId,
    result: &'a T,
}

/// Notification envelope for SDK-to-web messages; carries no id.
#[derive(Debug, Serialize)]
struct NotificationEnvelope<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<&'a Value>,
}

/// Encodes a response payload into a wire envelope addressed by `id`.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if the payload cannot be
/// serialized.
pub fn encode_response<T: Serialize>(payload: &T, id: &RequestId) -> Result<String> {
    let envelope = ResponseEnvelope {
        jsonrpc: PROTOCOL_VERSION,
        id,
        result: payload,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Encodes an SDK-to-web notification envelope (no id, no expected reply).
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if the params cannot be
/// serialized.
pub fn encode_notification(method: &str, params: Option<&Value>) -> Result<String> {
    let envelope = NotificationEnvelope {
        jsonrpc: PROTOCOL_VERSION,
        method,
        params,
    };
    Ok(serde_json::to_string(&envelope)?)
}

// ============================================================================
// Tests
// ============================================================================
