//! Typed pixel event payloads.
//!
//! # Format
//!
//! ```json
//! {
//!   "name": "cart_viewed",
//!   "event": {
//!     "id": "evt-1",
//!     "name": "cart_viewed",
//!     "timestamp": "2026-08-24T10:15:00Z",
//!     "data": { "cart": { ... } }
//!   }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// PixelEventEnvelope
// ============================================================================

/// First-stage wrapper around a pixel event.
///
/// `event` stays an opaque JSON blob until `name` selects the second-stage
/// decode.
#[derive(Debug, Clone, Deserialize)]
pub struct PixelEventEnvelope {
    /// Event name discriminator.
    pub name: String,

    /// Undecoded event body.
    pub event: Value,
}

// ============================================================================
// PixelEvent
// ============================================================================

/// A recognized, fully decoded pixel event.
#[derive(Debug, Clone)]
pub enum PixelEvent {
    /// Buyer viewed the cart.
    CartViewed(CartViewedEvent),
}

impl PixelEvent {
    /// Returns the event's wire name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CartViewed(_) => super::decoder::EVENT_CART_VIEWED,
        }
    }
}

// ============================================================================
// CartViewedEvent
// ============================================================================

/// Body of a `cart_viewed` pixel event.
#[derive(Debug, Clone, Deserialize)]
pub struct CartViewedEvent {
    /// Event instance id.
    pub id: String,

    /// Event name, repeated inside the body.
    pub name: String,

    /// Event timestamp as delivered by the pixel runtime.
    pub timestamp: String,

    /// Event data.
    pub data: CartViewedData,
}

/// Data section of a `cart_viewed` event.
#[derive(Debug, Clone, Deserialize)]
pub struct CartViewedData {
    /// Cart snapshot; the pixel runtime may send `null`.
    #[serde(default)]
    pub cart: Option<PixelCart>,
}

/// Cart snapshot carried by cart pixel events.
#[derive(Debug, Clone, Deserialize)]
pub struct PixelCart {
    /// Cart id.
    #[serde(default)]
    pub id: Option<String>,

    /// Total number of items.
    #[serde(default, rename = "totalQuantity")]
    pub total_quantity: Option<u64>,

    /// Cart cost summary.
    #[serde(default)]
    pub cost: Option<PixelCartCost>,

    /// Line items, left undecoded.
    #[serde(default)]
    pub lines: Vec<Value>,
}

/// Cost section of a pixel cart snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct PixelCartCost {
    /// Total cart amount.
    #[serde(default, rename = "totalAmount")]
    pub total_amount: Option<PixelMoney>,
}

/// A monetary value in pixel event payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct PixelMoney {
    /// Decimal amount.
    #[serde(default)]
    pub amount: Option<f64>,

    /// ISO 4217 currency code.
    #[serde(default, rename = "currencyCode")]
    pub currency_code: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
