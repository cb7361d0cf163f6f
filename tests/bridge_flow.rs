//! End-to-end bridge flow tests.
//!
//! Exercises the full inbound pipeline against a fake transport: dispatch
//! of all three checkout methods, the deferred address-change response,
//! and the error/pixel channels alongside it.

use std::sync::{Arc, Mutex, Weak};

use anyhow::Result;

use checkout_bridge::{
    AddressChangeResponse, CheckoutBridge, CheckoutException, MailingAddress, Message,
    MessageTransport, PixelEvent, decode_error_payloads, decode_pixel_event, map_first_error,
};

// ============================================================================
// Fixtures
// ============================================================================

/// Transport capturing every message sent to the web content.
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<String>>,
}

impl RecordingTransport {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("lock poisoned").clone()
    }
}

impl MessageTransport for RecordingTransport {
    fn send(&self, message: &str) {
        self.sent.lock().expect("lock poisoned").push(message.to_string());
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn new_bridge() -> (Arc<RecordingTransport>, CheckoutBridge) {
    init_tracing();
    let transport = Arc::new(RecordingTransport::default());
    let weak: Weak<dyn MessageTransport> =
        Arc::downgrade(&(Arc::clone(&transport) as Arc<dyn MessageTransport>));
    (transport, CheckoutBridge::new(weak))
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn lifecycle_notifications_reach_the_handler() {
    let (_transport, bridge) = new_bridge();
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();

    let sink = Arc::clone(&seen);
    bridge.set_message_handler(Box::new(move |message| {
        sink.lock().expect("lock poisoned").push(message.method().to_string());
    }));

    bridge.receive(r#"{"jsonrpc":"2.0","method":"checkout.start","params":{}}"#);
    bridge.receive(
        r#"{"jsonrpc":"2.0","method":"checkout.complete",
            "params":{"orderDetails":{"id":"order-1","email":"a@b.c"}}}"#,
    );

    assert_eq!(
        *seen.lock().expect("lock poisoned"),
        vec!["checkout.start".to_string(), "checkout.complete".to_string()]
    );
}

#[test]
fn deferred_address_change_response_is_sent_once() -> Result<()> {
    let (transport, bridge) = new_bridge();
    let pending: Arc<Mutex<Vec<checkout_bridge::AddressChangeRequest>>> = Arc::default();

    let slot = Arc::clone(&pending);
    bridge.set_message_handler(Box::new(move |message| {
        if let Message::AddressChange(request) = message {
            slot.lock().expect("lock poisoned").push(request);
        }
    }));

    bridge.receive(
        r#"{"jsonrpc":"2.0","method":"checkout.addressChangeRequested",
            "params":{"addressType":"shipping"},"id":42}"#,
    );

    // Answer later, the way a host would after its address-picker flow.
    let request = pending.lock().expect("lock poisoned").pop().expect("pending request");
    let response = AddressChangeResponse::new(MailingAddress {
        address1: Some("151 O'Connor St".to_string()),
        city: Some("Ottawa".to_string()),
        country: Some("CA".to_string()),
        ..MailingAddress::default()
    });
    request.respond_with(&response)?;
    request.respond_with(&response)?;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1, "double response must be suppressed");

    let value: serde_json::Value = serde_json::from_str(&sent[0])?;
    assert_eq!(value["jsonrpc"], "2.0");
    assert_eq!(value["id"], 42, "numeric id must stay numeric");
    assert_eq!(value["result"]["address"]["city"], "Ottawa");
    Ok(())
}

#[test]
fn response_after_webview_teardown_is_dropped() -> Result<()> {
    let (transport, bridge) = new_bridge();

    let message = bridge
        .decode(
            r#"{"jsonrpc":"2.0","method":"checkout.addressChangeRequested",
                "params":{},"id":"late"}"#,
        )
        .expect("decoded request");
    let Message::AddressChange(request) = message else {
        panic!("expected address change request");
    };

    // WebView goes away before the host answers.
    drop(bridge);
    drop(transport);

    request.respond_with(&AddressChangeResponse::default())?;
    Ok(())
}

#[test]
fn error_channel_maps_first_error_to_host_exception() -> Result<()> {
    init_tracing();
    let raw = r#"[
        {"group":"configuration","flowType":"regular","type":"error",
         "code":"customer_account_required","reason":"Sign in required"},
        {"group":"expired","flowType":"regular","type":"error","code":"invalid_cart"}
    ]"#;

    let payloads = decode_error_payloads(raw)?;
    let exception = map_first_error(&payloads).expect("mapped exception");

    assert!(matches!(exception, CheckoutException::Authentication { .. }));
    assert_eq!(exception.code(), "customer_account_required");
    assert!(!exception.is_recoverable());
    Ok(())
}

#[test]
fn pixel_channel_decodes_alongside_protocol_traffic() {
    let (_transport, bridge) = new_bridge();
    bridge.receive(r#"{"jsonrpc":"2.0","method":"checkout.start","params":{}}"#);

    let raw = r#"{
        "name": "cart_viewed",
        "event": {
            "id": "evt-9",
            "name": "cart_viewed",
            "timestamp": "2026-08-24T10:15:00Z",
            "data": {"cart": {"totalQuantity": 2}}
        }
    }"#;

    let event = decode_pixel_event(raw).expect("decoded pixel event");
    let PixelEvent::CartViewed(cart_viewed) = event;
    assert_eq!(cart_viewed.id, "evt-9");
}
