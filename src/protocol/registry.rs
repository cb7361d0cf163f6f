//! Method dispatch registry.
//!
//! Maps wire method names to parameter decoders. The table is built once
//! (normally via [`MethodRegistry::standard`]) and read-only afterward;
//! dispatch takes it by shared reference, so there is no lock on the hot
//! path and no hidden global state.
//!
//! # Dispatch Policy
//!
//! Inbound messages from the web layer are untrusted and version-skewed,
//! so dispatch degrades leniently: an unknown method or malformed params
//! yield `None` with a diagnostic log, never an error. The bridge must
//! survive anything the web content sends.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Weak;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::identifiers::RequestId;
use crate::transport::MessageTransport;

use super::envelope::Envelope;
use super::message::{
    AddressChangeRequest, AddressChangeRequestPayload, CheckoutCompleted, CheckoutStarted, Message,
};

// ============================================================================
// Constants
// ============================================================================

/// Method name of the checkout-started notification.
pub const METHOD_START: &str = "checkout.start";

/// Method name of the checkout-completed notification.
pub const METHOD_COMPLETE: &str = "checkout.complete";

/// Method name of the address-change request.
pub const METHOD_ADDRESS_CHANGE: &str = "checkout.addressChangeRequested";

// ============================================================================
// Types
// ============================================================================

/// Whether a method is one-way or expects a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Fire-and-forget; no id, no reply.
    Notification,
    /// Carries an id and pairs with exactly one response.
    Request,
}

/// Decoding context handed to a method's decoder.
///
/// Request-kind decoders bind `transport` into the message they produce so
/// the host can answer later without holding the bridge.
pub struct DecodeContext<'a> {
    /// The envelope's `params` field, if present.
    pub params: Option<&'a Value>,
    /// The envelope's correlation id, if present.
    pub id: Option<&'a RequestId>,
    /// Non-owning reference to the outbound channel.
    pub transport: &'a Weak<dyn MessageTransport>,
}

/// Converts an envelope's params into a typed [`Message`].
///
/// Returns `None` when the params do not decode; the registry logs and
/// drops the message.
pub type MessageDecoder = Box<dyn Fn(DecodeContext<'_>) -> Option<Message> + Send + Sync>;

/// One registered method: its kind plus the params decoder.
pub struct MethodRegistration {
    kind: MethodKind,
    decoder: MessageDecoder,
}

impl MethodRegistration {
    /// Creates a registration.
    #[must_use]
    pub fn new(kind: MethodKind, decoder: MessageDecoder) -> Self {
        Self { kind, decoder }
    }

    /// Returns the method's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MethodKind {
        self.kind
    }
}

// ============================================================================
// MethodRegistry
// ============================================================================

/// Table mapping method names to parameter decoders.
pub struct MethodRegistry {
    methods: FxHashMap<String, MethodRegistration>,
}

impl MethodRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            methods: FxHashMap::default(),
        }
    }

    /// Creates the registry with the standard checkout methods.
    ///
    /// Exactly three methods are registered:
    ///
    /// | Method | Kind |
    /// |--------|------|
    /// | [`METHOD_START`] | notification |
    /// | [`METHOD_COMPLETE`] | notification |
    /// | [`METHOD_ADDRESS_CHANGE`] | request |
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.register(
            METHOD_START,
            MethodRegistration::new(
                MethodKind::Notification,
                Box::new(|ctx| {
                    let payload: CheckoutStarted = decode_params(METHOD_START, ctx.params)?;
                    Some(Message::Started(payload))
                }),
            ),
        );

        registry.register(
            METHOD_COMPLETE,
            MethodRegistration::new(
                MethodKind::Notification,
                Box::new(|ctx| {
                    let payload: CheckoutCompleted = decode_params(METHOD_COMPLETE, ctx.params)?;
                    Some(Message::Completed(payload))
                }),
            ),
        );

        registry.register(
            METHOD_ADDRESS_CHANGE,
            MethodRegistration::new(
                MethodKind::Request,
                Box::new(|ctx| {
                    let id = ctx.id?.clone();
                    let payload: AddressChangeRequestPayload =
                        decode_params(METHOD_ADDRESS_CHANGE, ctx.params)?;
                    Some(Message::AddressChange(AddressChangeRequest::new(
                        id,
                        payload,
                        Weak::clone(ctx.transport),
                    )))
                }),
            ),
        );

        registry
    }

    /// Registers a method, replacing any previous registration.
    pub fn register(&mut self, method: impl Into<String>, registration: MethodRegistration) {
        self.methods.insert(method.into(), registration);
    }

    /// Returns `true` if `method` has a registration.
    #[inline]
    #[must_use]
    pub fn is_registered(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Returns the set of registered method names.
    pub fn registered_methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Returns the registered kind of `method`, if any.
    #[inline]
    #[must_use]
    pub fn method_kind(&self, method: &str) -> Option<MethodKind> {
        self.methods.get(method).map(MethodRegistration::kind)
    }

    /// Dispatches a parsed envelope to its method's decoder.
    ///
    /// Returns `None` when the envelope has no method, the method is
    /// unregistered, a request arrives without an id, or the params fail
    /// to decode. All of these are logged and dropped, never propagated.
    #[must_use]
    pub fn decode(
        &self,
        envelope: &Envelope,
        transport: &Weak<dyn MessageTransport>,
    ) -> Option<Message> {
        let Some(method) = envelope.method.as_deref() else {
            debug!("Dropping envelope without method");
            return None;
        };

        let Some(registration) = self.methods.get(method) else {
            debug!(method, "Dropping envelope for unsupported method");
            return None;
        };

        if registration.kind == MethodKind::Request && envelope.id.is_none() {
            warn!(method, "Dropping request-kind envelope without id");
            return None;
        }

        let context = DecodeContext {
            params: envelope.params.as_ref(),
            id: envelope.id.as_ref(),
            transport,
        };
        (registration.decoder)(context)
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Decodes `params` into `T`, treating absent params as an empty object.
///
/// Logs and returns `None` on failure.
fn decode_params<T: DeserializeOwned>(method: &str, params: Option<&Value>) -> Option<T> {
    let value = match params {
        Some(params) => params.clone(),
        None => Value::Object(serde_json::Map::new()),
    };

    match serde_json::from_value(value) {
        Ok(payload) => Some(payload),
        Err(error) => {
            warn!(method, %error, "Dropping envelope with malformed params");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    struct NullTransport;

    impl MessageTransport for NullTransport {
        fn send(&self, _message: &str) {}
    }

    fn live_transport() -> (Arc<NullTransport>, Weak<dyn MessageTransport>) {
        let transport = Arc::new(NullTransport);
        let weak: Weak<dyn MessageTransport> =
            Arc::downgrade(&(Arc::clone(&transport) as Arc<dyn MessageTransport>));
        (transport, weak)
    }

    fn parse(raw: &str) -> Envelope {
        Envelope::parse(raw).expect("valid envelope")
    }

    #[test]
    fn test_standard_registers_exactly_three_methods() {
        let registry = MethodRegistry::standard();

        let mut methods: Vec<_> = registry.registered_methods().collect();
        methods.sort_unstable();
        assert_eq!(
            methods,
            vec![METHOD_ADDRESS_CHANGE, METHOD_COMPLETE, METHOD_START]
        );
        assert!(registry.is_registered(METHOD_START));
        assert!(!registry.is_registered("checkout.unknown"));
    }

    #[test]
    fn test_method_kinds() {
        let registry = MethodRegistry::standard();

        assert_eq!(
            registry.method_kind(METHOD_START),
            Some(MethodKind::Notification)
        );
        assert_eq!(
            registry.method_kind(METHOD_ADDRESS_CHANGE),
            Some(MethodKind::Request)
        );
        assert_eq!(registry.method_kind("checkout.unknown"), None);
    }

    #[test]
    fn test_decode_start_notification() {
        let registry = MethodRegistry::standard();
        let (_transport, weak) = live_transport();

        let envelope = parse(
            r#"{"jsonrpc":"2.0","method":"checkout.start","params":{"token":"tok"}}"#,
        );
        let message = registry.decode(&envelope, &weak).expect("decoded message");

        assert_eq!(message.method(), METHOD_START);
        match message {
            Message::Started(started) => assert_eq!(started.token.as_deref(), Some("tok")),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_decode_start_without_params() {
        let registry = MethodRegistry::standard();
        let (_transport, weak) = live_transport();

        let envelope = parse(r#"{"jsonrpc":"2.0","method":"checkout.start"}"#);
        assert!(registry.decode(&envelope, &weak).is_some());
    }

    #[test]
    fn test_decode_address_change_request() {
        let registry = MethodRegistry::standard();
        let (_transport, weak) = live_transport();

        let envelope = parse(
            r#"{
                "jsonrpc": "2.0",
                "method": "checkout.addressChangeRequested",
                "params": {"addressType": "shipping"},
                "id": 12
            }"#,
        );
        let message = registry.decode(&envelope, &weak).expect("decoded message");

        match message {
            Message::AddressChange(request) => {
                assert_eq!(request.id(), &RequestId::from(12u64));
                assert_eq!(request.payload().address_type.as_deref(), Some("shipping"));
                assert!(!request.has_responded());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_decode_unknown_method_returns_none() {
        let registry = MethodRegistry::standard();
        let (_transport, weak) = live_transport();

        let envelope = parse(r#"{"jsonrpc":"2.0","method":"checkout.teardown"}"#);
        assert!(registry.decode(&envelope, &weak).is_none());
    }

    #[test]
    fn test_decode_malformed_params_returns_none() {
        let registry = MethodRegistry::standard();
        let (_transport, weak) = live_transport();

        // checkout.complete requires an orderDetails object.
        let envelope = parse(r#"{"jsonrpc":"2.0","method":"checkout.complete","params":{}}"#);
        assert!(registry.decode(&envelope, &weak).is_none());

        let envelope = parse(
            r#"{"jsonrpc":"2.0","method":"checkout.complete","params":"not an object"}"#,
        );
        assert!(registry.decode(&envelope, &weak).is_none());
    }

    #[test]
    fn test_decode_request_without_id_returns_none() {
        let registry = MethodRegistry::standard();
        let (_transport, weak) = live_transport();

        let envelope = parse(
            r#"{"jsonrpc":"2.0","method":"checkout.addressChangeRequested","params":{}}"#,
        );
        assert!(registry.decode(&envelope, &weak).is_none());
    }

    #[test]
    fn test_decode_missing_method_returns_none() {
        let registry = MethodRegistry::standard();
        let (_transport, weak) = live_transport();

        let envelope = parse(r#"{"jsonrpc":"2.0","params":{}}"#);
        assert!(registry.decode(&envelope, &weak).is_none());
    }

    #[test]
    fn test_all_registered_methods_decode() {
        let registry = MethodRegistry::standard();
        let (_transport, weak) = live_transport();

        let raws = [
            r#"{"jsonrpc":"2.0","method":"checkout.start","params":{}}"#,
            r#"{"jsonrpc":"2.0","method":"checkout.complete",
                "params":{"orderDetails":{"id":"o1"}}}"#,
            r#"{"jsonrpc":"2.0","method":"checkout.addressChangeRequested",
                "params":{},"id":"r1"}"#,
        ];

        for raw in raws {
            let envelope = parse(raw);
            let method = envelope.method.clone().expect("method present");
            let message = registry.decode(&envelope, &weak).expect("decoded message");
            assert_eq!(message.method(), method);
        }
    }
}
