//! Bridge façade tying the protocol pieces together.
//!
//! [`CheckoutBridge`] owns the method registry and a weakly-held transport,
//! and runs the inbound pipeline: raw string → envelope parse → registry
//! dispatch → handler callback. It also carries the two SDK-to-web
//! notifications (`checkout.presented`, `checkout.instrumentation`).
//!
//! All parsing and dispatch happens synchronously on the thread that calls
//! [`receive`](CheckoutBridge::receive); the bridge performs no I/O and no
//! thread marshalling.
//!
//! # Thread Safety
//!
//! `CheckoutBridge` is `Send + Sync`. The handler slot is behind a mutex;
//! dispatch holds it only for the duration of the callback.

// ============================================================================
// Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Weak;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::protocol::envelope::{Envelope, encode_notification};
use crate::protocol::message::Message;
use crate::protocol::registry::MethodRegistry;
use crate::transport::MessageTransport;

// ============================================================================
// Constants
// ============================================================================

/// Method name of the SDK-to-web presented notification.
pub const METHOD_PRESENTED: &str = "checkout.presented";

/// Method name of the SDK-to-web instrumentation notification.
pub const METHOD_INSTRUMENTATION: &str = "checkout.instrumentation";

// ============================================================================
// Types
// ============================================================================

/// Handler callback invoked for each decoded inbound message.
pub type MessageHandler = Box<dyn Fn(Message) + Send + Sync>;

// ============================================================================
// CheckoutBridge
// ============================================================================

/// Message bridge between the native host and the embedded web checkout.
///
/// The host feeds raw inbound strings to [`receive`](Self::receive) and
/// supplies the outbound channel as a `Weak<dyn MessageTransport>`; the
/// bridge never keeps the channel alive.
pub struct CheckoutBridge {
    /// Outbound channel; dead at teardown, which the bridge tolerates.
    transport: Weak<dyn MessageTransport>,

    /// Immutable dispatch table.
    registry: MethodRegistry,

    /// Host message handler (shared with whichever thread dispatches).
    handler: Mutex<Option<MessageHandler>>,
}

impl CheckoutBridge {
    /// Creates a bridge with the standard checkout methods.
    #[must_use]
    pub fn new(transport: Weak<dyn MessageTransport>) -> Self {
        Self::with_registry(transport, MethodRegistry::standard())
    }

    /// Creates a bridge with a caller-built registry.
    #[must_use]
    pub fn with_registry(transport: Weak<dyn MessageTransport>, registry: MethodRegistry) -> Self {
        Self {
            transport,
            registry,
            handler: Mutex::new(None),
        }
    }

    /// Returns the dispatch table.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Sets the message handler callback.
    ///
    /// The handler is called synchronously from [`receive`](Self::receive)
    /// for each decoded message.
    pub fn set_message_handler(&self, handler: MessageHandler) {
        let mut guard = self.handler.lock();
        *guard = Some(handler);
    }

    /// Clears the message handler.
    pub fn clear_message_handler(&self) {
        let mut guard = self.handler.lock();
        *guard = None;
    }

    /// Runs the inbound pipeline on one raw message.
    ///
    /// Malformed input, unknown methods, and malformed params are dropped
    /// with a diagnostic log. A decoded message with no handler registered
    /// is also dropped.
    pub fn receive(&self, raw: &str) {
        let Some(message) = self.decode(raw) else {
            return;
        };

        let guard = self.handler.lock();
        match &*guard {
            Some(handler) => handler(message),
            None => debug!(method = message.method(), "No handler registered, dropping message"),
        }
    }

    /// Decodes one raw message without delivering it.
    ///
    /// Useful for hosts that route messages themselves instead of
    /// registering a handler.
    #[must_use]
    pub fn decode(&self, raw: &str) -> Option<Message> {
        let envelope = Envelope::parse(raw)?;
        self.registry.decode(&envelope, &self.transport)
    }

    /// Notifies the web checkout that the sheet became visible.
    pub fn notify_presented(&self) {
        self.send_notification(METHOD_PRESENTED, None);
    }

    /// Forwards an instrumentation sample into the web checkout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the payload cannot
    /// be serialized. A dead transport is not an error.
    pub fn send_instrumentation(&self, payload: &InstrumentationPayload) -> Result<()> {
        let params = serde_json::to_value(payload)?;
        self.send_notification(METHOD_INSTRUMENTATION, Some(params));
        Ok(())
    }

    /// Encodes and sends one SDK-to-web notification, tolerating a dead
    /// channel silently.
    fn send_notification(&self, method: &str, params: Option<Value>) {
        let Some(transport) = self.transport.upgrade() else {
            debug!(method, "Transport gone, dropping notification");
            return;
        };

        match encode_notification(method, params.as_ref()) {
            Ok(json) => transport.send(&json),
            Err(error) => warn!(method, %error, "Failed to encode notification"),
        }
    }
}

// ============================================================================
// InstrumentationPayload
// ============================================================================

/// One instrumentation sample forwarded into the web checkout.
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentationPayload {
    /// Metric name.
    pub name: String,

    /// Sample value.
    pub value: u64,

    /// Metric type.
    #[serde(rename = "type")]
    pub kind: InstrumentationType,

    /// Free-form dimension tags.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

impl InstrumentationPayload {
    /// Creates a payload without tags.
    #[must_use]
    pub fn new(name: impl Into<String>, value: u64, kind: InstrumentationType) -> Self {
        Self {
            name: name.into(),
            value,
            kind,
            tags: HashMap::new(),
        }
    }
}

/// Instrumentation metric types understood by the web checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstrumentationType {
    /// Distribution sample.
    #[serde(rename = "histogram")]
    Histogram,

    /// Counter increment.
    #[serde(rename = "incrementCounter")]
    IncrementCounter,
}

// ============================================================================
// Tests
// ============================================================================
