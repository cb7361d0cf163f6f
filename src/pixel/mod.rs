//! Web pixel analytics events.
//!
//! The checkout forwards web pixel events to the native side on a channel
//! separate from the protocol envelopes, wrapped as `{"name": ..., "event":
//! ...}`. Decoding is two-stage: the wrapper first, then a typed decode of
//! `event` dispatched on `name`.
//!
//! Analytics are best-effort: unrecognized names and malformed payloads
//! decode to `None` with a diagnostic log and never interrupt the checkout.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `decoder` | Two-stage wrapper/event decode |
//! | `event` | Typed event payloads |

// ============================================================================
// Submodules
// ============================================================================

/// Two-stage pixel event decoding.
pub mod decoder;

/// Typed pixel event payloads.
pub mod event;

// ============================================================================
// Re-exports
// ============================================================================

pub use decoder::{PixelEventDecoder, decode_pixel_event};
pub use event::{
    CartViewedData, CartViewedEvent, PixelCart, PixelCartCost, PixelEvent, PixelEventEnvelope,
    PixelMoney,
};
