//! Two-stage pixel event decoding.
//!
//! Stage one decodes the `{name, event}` wrapper; stage two dispatches on
//! `name` into a typed decode of the `event` blob. Both stages are total:
//! any failure yields `None` with a diagnostic log and never propagates —
//! a broken analytics event must not take down the checkout.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, warn};

use super::event::{CartViewedEvent, PixelEvent, PixelEventEnvelope};

// ============================================================================
// Constants
// ============================================================================

/// Wire name of the cart-viewed pixel event.
pub(crate) const EVENT_CART_VIEWED: &str = "cart_viewed";

// ============================================================================
// Decoding
// ============================================================================

/// Decodes a raw pixel channel body into a typed event.
///
/// Returns `None` for malformed wrappers, unrecognized names, and event
/// bodies that fail their typed decode.
#[must_use]
pub fn decode_pixel_event(raw: &str) -> Option<PixelEvent> {
    let envelope: PixelEventEnvelope = match serde_json::from_str(raw) {
        Ok(envelope) => envelope,
        Err(error) => {
            warn!(%error, "Dropping unparseable pixel event");
            return None;
        }
    };

    match envelope.name.as_str() {
        EVENT_CART_VIEWED => {
            match serde_json::from_value::<CartViewedEvent>(envelope.event) {
                Ok(event) => Some(PixelEvent::CartViewed(event)),
                Err(error) => {
                    warn!(name = EVENT_CART_VIEWED, %error, "Dropping malformed pixel event body");
                    None
                }
            }
        }
        name => {
            debug!(name, "Dropping unrecognized pixel event");
            None
        }
    }
}

// ============================================================================
// PixelEventDecoder
// ============================================================================

/// Stateless decoder for the pixel channel.
///
/// Exists so hosts can hold the decoder behind a seam; it carries no state
/// and is free to copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelEventDecoder;

impl PixelEventDecoder {
    /// Creates a decoder.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decodes a raw pixel channel body; see [`decode_pixel_event`].
    #[inline]
    #[must_use]
    pub fn decode(&self, raw: &str) -> Option<PixelEvent> {
        decode_pixel_event(raw)
    }
}

// ============================================================================
// Tests
// ============================================================================
