//! Typed protocol messages and their payloads.
//!
//! An inbound envelope decodes into one [`Message`] variant. Notifications
//! (`Started`, `Completed`) are fire-and-forget; the request variant
//! (`AddressChange`) carries a correlation id and pairs with exactly one
//! response sent through [`AddressChangeRequest::respond_with`].
//!
//! All payload structs tolerate unknown keys so the web side can add
//! fields without breaking older SDK builds.
//!
//! # Message Types
//!
//! | Method | Variant | Kind |
//! |--------|---------|------|
//! | `checkout.start` | [`Message::Started`] | notification |
//! | `checkout.complete` | [`Message::Completed`] | notification |
//! | `checkout.addressChangeRequested` | [`Message::AddressChange`] | request |

// ============================================================================
// Imports
// ============================================================================

use std::sync::Weak;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::Result;
use crate::identifiers::RequestId;
use crate::transport::MessageTransport;

use super::envelope::encode_response;

// ============================================================================
// Message
// ============================================================================

/// A decoded inbound protocol message.
#[derive(Debug)]
pub enum Message {
    /// Checkout flow started rendering.
    Started(CheckoutStarted),

    /// Checkout flow completed with an order.
    Completed(CheckoutCompleted),

    /// Web checkout requests an address from the native side.
    AddressChange(AddressChangeRequest),
}

impl Message {
    /// Returns the wire method name this message decoded from.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::Started(_) => super::registry::METHOD_START,
            Self::Completed(_) => super::registry::METHOD_COMPLETE,
            Self::AddressChange(_) => super::registry::METHOD_ADDRESS_CHANGE,
        }
    }

    /// Returns `true` if this message expects a response.
    #[inline]
    #[must_use]
    pub fn is_request(&self) -> bool {
        matches!(self, Self::AddressChange(_))
    }
}

// ============================================================================
// AddressChangeRequest
// ============================================================================

/// A pending address-change request from the web checkout.
///
/// Carries the correlation id and a non-owning reference to the transport
/// bound at dispatch time. The host may hold this object for as long as it
/// needs (for example, across a separate address-picker flow) and answer
/// from any thread.
///
/// # At-Most-Once Delivery
///
/// The first [`respond_with`](Self::respond_with) call sends the response;
/// every later call is a silent no-op. A double response would desynchronize
/// the web checkout's pending-promise bookkeeping, so the guard is atomic.
#[derive(Debug)]
pub struct AddressChangeRequest {
    /// Correlation id, echoed verbatim in the response.
    id: RequestId,

    /// Decoded request parameters.
    payload: AddressChangeRequestPayload,

    /// Transport bound at dispatch time; does not keep the channel alive.
    transport: Weak<dyn MessageTransport>,

    /// Set on the first response attempt.
    responded: AtomicBool,
}

impl AddressChangeRequest {
    /// Creates a pending request bound to `transport`.
    #[must_use]
    pub(crate) fn new(
        id: RequestId,
        payload: AddressChangeRequestPayload,
        transport: Weak<dyn MessageTransport>,
    ) -> Self {
        Self {
            id,
            payload,
            transport,
            responded: AtomicBool::new(false),
        }
    }

    /// Returns the correlation id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &RequestId {
        &self.id
    }

    /// Returns the wire method name.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &'static str {
        super::registry::METHOD_ADDRESS_CHANGE
    }

    /// Returns the decoded request parameters.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &AddressChangeRequestPayload {
        &self.payload
    }

    /// Returns `true` if a response has already been sent (or attempted).
    #[inline]
    #[must_use]
    pub fn has_responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }

    /// Sends the response for this request, at most once.
    ///
    /// The response envelope echoes the correlation id verbatim. A second
    /// call returns `Ok(())` without sending. If the transport has been
    /// dropped, the response is silently discarded — the channel's death
    /// means there is no web content left to desynchronize.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the response payload
    /// cannot be serialized. Serialization runs before the at-most-once
    /// flag is consumed, so a failed attempt may be retried.
    pub fn respond_with(&self, response: &AddressChangeResponse) -> Result<()> {
        let message = encode_response(response, &self.id)?;

        if self.responded.swap(true, Ordering::SeqCst) {
            trace!(id = %self.id, "Suppressing duplicate response");
            return Ok(());
        }

        match self.transport.upgrade() {
            Some(transport) => {
                transport.send(&message);
                trace!(id = %self.id, "Response sent");
            }
            None => {
                debug!(id = %self.id, "Transport gone, dropping response");
            }
        }

        Ok(())
    }
}

// ============================================================================
// Lifecycle Payloads
// ============================================================================

/// Parameters of the `checkout.start` notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutStarted {
    /// Checkout session token, when the web side provides one.
    #[serde(default)]
    pub token: Option<String>,

    /// URL of the checkout being rendered.
    #[serde(default)]
    pub url: Option<String>,
}

/// Parameters of the `checkout.complete` notification.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutCompleted {
    /// Details of the completed order.
    #[serde(rename = "orderDetails")]
    pub order_details: OrderDetails,
}

/// Order summary delivered on checkout completion.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetails {
    /// Order identifier.
    pub id: String,

    /// Buyer email, when collected.
    #[serde(default)]
    pub email: Option<String>,

    /// Phone number, when collected.
    #[serde(default)]
    pub phone: Option<String>,

    /// Cart the order was placed from.
    #[serde(default)]
    pub cart: Option<CartInfo>,

    /// Payment method identifiers used for the order.
    #[serde(default, rename = "paymentMethods")]
    pub payment_methods: Vec<String>,
}

/// Cart contents attached to a completed order.
#[derive(Debug, Clone, Deserialize)]
pub struct CartInfo {
    /// Cart token.
    #[serde(default)]
    pub token: Option<String>,

    /// Line items.
    #[serde(default)]
    pub lines: Vec<CartLine>,

    /// Total price of the cart.
    #[serde(default)]
    pub price: Option<Price>,
}

/// One line item of a cart.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    /// Product title.
    pub title: String,

    /// Quantity purchased.
    pub quantity: u32,

    /// Line price.
    #[serde(default)]
    pub price: Option<Price>,

    /// Merchandise identifier.
    #[serde(default, rename = "merchandiseId")]
    pub merchandise_id: Option<String>,

    /// Product image URL.
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// A monetary amount with its currency.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Price {
    /// Decimal amount.
    #[serde(default)]
    pub amount: Option<f64>,

    /// ISO 4217 currency code.
    #[serde(default, rename = "currencyCode")]
    pub currency_code: Option<String>,
}

// ============================================================================
// Address Change Payloads
// ============================================================================

/// Parameters of the `checkout.addressChangeRequested` request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressChangeRequestPayload {
    /// Which address the checkout is asking for (for example `"shipping"`).
    #[serde(default, rename = "addressType")]
    pub address_type: Option<String>,
}

/// Response payload answering an address-change request.
///
/// Serialized under the envelope's `result` key, which is the field the
/// web checkout's pending-promise resolver reads.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddressChangeResponse {
    /// The selected address.
    pub address: MailingAddress,
}

impl AddressChangeResponse {
    /// Creates a response carrying `address`.
    #[inline]
    #[must_use]
    pub fn new(address: MailingAddress) -> Self {
        Self { address }
    }
}

/// A postal address in the checkout's wire shape.
///
/// Absent fields are omitted from the wire rather than sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingAddress {
    /// First address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,

    /// Second address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,

    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Given name.
    #[serde(default, rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Family name.
    #[serde(default, rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Postal or ZIP code.
    #[serde(default, rename = "postalCode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// Province, state, or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use parking_lot::Mutex;

    /// Transport that records every sent message.
    #[derive(Default)]
    struct FakeTransport {
        sent: Mutex<Vec<String>>,
        send_count: AtomicUsize,
    }

    impl MessageTransport for FakeTransport {
        fn send(&self, message: &str) {
            self.sent.lock().push(message.to_string());
            self.send_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pending_request(transport: &Arc<FakeTransport>) -> AddressChangeRequest {
        let weak: Weak<dyn MessageTransport> =
            Arc::downgrade(&(Arc::clone(transport) as Arc<dyn MessageTransport>));
        AddressChangeRequest::new(
            RequestId::from("req-1"),
            AddressChangeRequestPayload {
                address_type: Some("shipping".to_string()),
            },
            weak,
        )
    }

    fn sample_response() -> AddressChangeResponse {
        AddressChangeResponse::new(MailingAddress {
            address1: Some("33 New Montgomery St".to_string()),
            city: Some("San Francisco".to_string()),
            country: Some("US".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            postal_code: Some("94105".to_string()),
            ..MailingAddress::default()
        })
    }

    #[test]
    fn test_respond_with_sends_exactly_once() {
        let transport = Arc::new(FakeTransport::default());
        let request = pending_request(&transport);

        request.respond_with(&sample_response()).expect("first send");
        request.respond_with(&sample_response()).expect("second call is no-op");
        request.respond_with(&sample_response()).expect("third call is no-op");

        assert_eq!(transport.send_count.load(Ordering::SeqCst), 1);
        assert!(request.has_responded());
    }

    #[test]
    fn test_respond_with_echoes_id_and_wraps_in_result() {
        let transport = Arc::new(FakeTransport::default());
        let request = pending_request(&transport);

        request.respond_with(&sample_response()).expect("send");

        let sent = transport.sent.lock();
        let value: serde_json::Value = serde_json::from_str(&sent[0]).expect("valid JSON");
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], "req-1");
        assert_eq!(value["result"]["address"]["firstName"], "Ada");
    }

    #[test]
    fn test_respond_with_dead_transport_is_silent_noop() {
        let transport = Arc::new(FakeTransport::default());
        let request = pending_request(&transport);
        drop(transport);

        // Channel is gone; the response must vanish without error.
        request.respond_with(&sample_response()).expect("silent no-op");
        assert!(request.has_responded());
    }

    #[test]
    fn test_respond_with_concurrent_callers_send_once() {
        let transport = Arc::new(FakeTransport::default());
        let request = Arc::new(pending_request(&transport));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let request = Arc::clone(&request);
                std::thread::spawn(move || {
                    request.respond_with(&sample_response()).expect("no error");
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread join");
        }

        assert_eq!(transport.send_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_message_method_names() {
        let transport = Arc::new(FakeTransport::default());
        let request = pending_request(&transport);

        let started = Message::Started(CheckoutStarted::default());
        let address = Message::AddressChange(request);

        assert_eq!(started.method(), "checkout.start");
        assert!(!started.is_request());
        assert_eq!(address.method(), "checkout.addressChangeRequested");
        assert!(address.is_request());
    }

    #[test]
    fn test_completed_payload_decoding() {
        let json = r#"{
            "orderDetails": {
                "id": "gid://shopify/Order/1001",
                "email": "ada@example.com",
                "cart": {
                    "token": "cart-token",
                    "lines": [
                        {"title": "T-Shirt", "quantity": 2,
                         "price": {"amount": 19.99, "currencyCode": "USD"}}
                    ],
                    "price": {"amount": 39.98, "currencyCode": "USD"}
                },
                "paymentMethods": ["card"]
            }
        }"#;

        let completed: CheckoutCompleted = serde_json::from_str(json).expect("decode");
        let order = &completed.order_details;
        assert_eq!(order.id, "gid://shopify/Order/1001");
        assert_eq!(order.email.as_deref(), Some("ada@example.com"));
        let cart = order.cart.as_ref().expect("cart present");
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(order.payment_methods, vec!["card".to_string()]);
    }

    #[test]
    fn test_payloads_tolerate_unknown_fields() {
        let json = r#"{"token": "tok", "url": "https://shop.example/checkout", "extra": 1}"#;
        let started: CheckoutStarted = serde_json::from_str(json).expect("decode");
        assert_eq!(started.token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_mailing_address_omits_absent_fields() {
        let address = MailingAddress {
            city: Some("Ottawa".to_string()),
            ..MailingAddress::default()
        };
        let json = serde_json::to_string(&address).expect("serialize");

        assert_eq!(json, r#"{"city":"Ottawa"}"#);
    }
}
