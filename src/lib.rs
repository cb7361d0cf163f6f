//! Checkout Bridge - message protocol between native hosts and embedded
//! web checkout.
//!
//! This library implements the bidirectional JSON message protocol spoken
//! across a WebView boundary: envelope parsing, method dispatch, typed
//! request/response handling, checkout error mapping, and web pixel
//! analytics decoding. It is transport-agnostic — the host owns the
//! WebView and feeds raw strings in.
//!
//! # Architecture
//!
//! Inbound flow:
//!
//! - **Envelope codec**: validates the JSON-RPC 2.0 envelope (version gate
//!   first) and extracts method, params, and correlation id
//! - **Method registry**: immutable table dispatching method names to
//!   typed parameter decoders
//! - **Messages**: notifications are fire-and-forget; the address-change
//!   request carries an id and answers at most once via a weakly-held
//!   transport
//!
//! Key design principles:
//!
//! - Inbound text is untrusted: malformed envelopes are logged and
//!   dropped, never surfaced as errors
//! - The error report channel is the exception — it is authoritative, so
//!   decode failures there propagate
//! - The bridge never owns the channel to the web content; a dead channel
//!   at response time is a silent no-op
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use checkout_bridge::{CheckoutBridge, Message, MessageTransport};
//!
//! struct WebViewChannel;
//!
//! impl MessageTransport for WebViewChannel {
//!     fn send(&self, message: &str) {
//!         // evaluate into the WebView
//!         let _ = message;
//!     }
//! }
//!
//! let channel: Arc<dyn MessageTransport> = Arc::new(WebViewChannel);
//! let bridge = CheckoutBridge::new(Arc::downgrade(&channel));
//!
//! bridge.set_message_handler(Box::new(|message| match message {
//!     Message::Started(_) => println!("checkout started"),
//!     Message::Completed(completed) => {
//!         println!("order {}", completed.order_details.id);
//!     }
//!     Message::AddressChange(request) => {
//!         // hold the request, answer later via request.respond_with(...)
//!         let _ = request.id();
//!     }
//! }));
//!
//! // Raw strings arrive from the WebView's message channel.
//! bridge.receive(r#"{"jsonrpc":"2.0","method":"checkout.start","params":{}}"#);
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | [`CheckoutBridge`] façade and SDK-to-web notifications |
//! | [`error`] | Error types, [`Result`] alias, checkout exception taxonomy |
//! | [`identifiers`] | [`RequestId`] correlation id |
//! | [`pixel`] | Web pixel analytics event decoding |
//! | [`protocol`] | Envelope codec, method registry, typed messages |
//! | [`transport`] | [`MessageTransport`] outbound seam |

// ============================================================================
// Modules
// ============================================================================

/// Bridge façade tying the protocol pieces together.
///
/// Use [`CheckoutBridge::new`] with a weak transport reference.
pub mod bridge;

/// Error types and result aliases.
///
/// Bridge failures use [`Result<T>`]; checkout-reported failures are
/// [`CheckoutException`] values.
pub mod error;

/// Correlation identifiers for protocol messages.
///
/// [`RequestId`] preserves the id's JSON type across the round trip.
pub mod identifiers;

/// Web pixel analytics events.
///
/// Best-effort decoding of the `{name, event}` analytics channel.
pub mod pixel;

/// Checkout protocol message types.
///
/// Envelope codec, dispatch registry, typed messages, and error report
/// decoding.
pub mod protocol;

/// Outbound message transport seam.
///
/// The host implements [`MessageTransport`]; the bridge holds it weakly.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Bridge types
pub use bridge::{
    CheckoutBridge, InstrumentationPayload, InstrumentationType, METHOD_INSTRUMENTATION,
    METHOD_PRESENTED, MessageHandler,
};

// Error types
pub use error::{CheckoutErrorCode, CheckoutException, Error, Result};

// Identifier types
pub use identifiers::RequestId;

// Pixel types
pub use pixel::{CartViewedEvent, PixelEvent, PixelEventDecoder, decode_pixel_event};

// Protocol types
pub use protocol::{
    AddressChangeRequest, AddressChangeRequestPayload, AddressChangeResponse, Envelope,
    ErrorGroup, ErrorPayload, MailingAddress, Message, MethodKind, MethodRegistry,
    PROTOCOL_VERSION, decode_error_payloads, encode_response, map_first_error,
};

// Transport types
pub use transport::MessageTransport;
