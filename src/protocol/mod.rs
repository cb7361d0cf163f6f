//! Checkout protocol message types.
//!
//! This module defines the JSON-RPC 2.0 message format exchanged between
//! the native host and the embedded web checkout, and the dispatch table
//! that turns raw inbound text into typed messages.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | Notification envelope | Web → Native | Lifecycle events (`start`, `complete`) |
//! | Request envelope | Web → Native | Address-change request (carries `id`) |
//! | Response envelope | Native → Web | Answer keyed by the echoed `id` |
//! | Notification envelope | Native → Web | `presented`, `instrumentation` |
//!
//! # Method Naming
//!
//! Methods follow `checkout.methodName` format:
//!
//! - `checkout.start`
//! - `checkout.complete`
//! - `checkout.addressChangeRequested`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `envelope` | Envelope parse and outbound encode |
//! | `error_payload` | Error report decode and exception mapping |
//! | `message` | Typed messages and payloads |
//! | `registry` | Method dispatch table |

// ============================================================================
// Submodules
// ============================================================================

/// Envelope codec: inbound parse and outbound encode.
pub mod envelope;

/// Error report decoding and exception mapping.
pub mod error_payload;

/// Typed protocol messages and their payloads.
pub mod message;

/// Method dispatch registry.
pub mod registry;

// ============================================================================
// Re-exports
// ============================================================================

pub use envelope::{Envelope, PROTOCOL_VERSION, encode_notification, encode_response};
pub use error_payload::{ErrorGroup, ErrorPayload, decode_error_payloads, map_first_error};
pub use message::{
    AddressChangeRequest, AddressChangeRequestPayload, AddressChangeResponse, CartInfo, CartLine,
    CheckoutCompleted, CheckoutStarted, MailingAddress, Message, OrderDetails, Price,
};
pub use registry::{
    DecodeContext, METHOD_ADDRESS_CHANGE, METHOD_COMPLETE, METHOD_START, MessageDecoder,
    MethodKind, MethodRegistration, MethodRegistry,
};
