//! Error report decoding and exception mapping.
//!
//! The checkout reports failures on a dedicated channel as a JSON array of
//! error objects. Unlike the envelope path, a report that cannot be parsed
//! is surfaced as [`Error::ErrorReport`] — this channel is the checkout's
//! authoritative failure signal and swallowing it would hide real failures
//! from the host.
//!
//! Each payload maps to at most one [`CheckoutException`] through a fixed
//! group/code table; groups the host is not expected to act on map to
//! `None`. When a report carries several entries, only the first is mapped
//! (first-error-wins).
//!
//! # Format
//!
//! ```json
//! [{"group":"expired","flowType":"regular","type":"error",
//!   "code":"invalid_cart","reason":"Cart is invalid"}]
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{CheckoutErrorCode, CheckoutException, Error, Result};

// ============================================================================
// ErrorGroup
// ============================================================================

/// Coarse category of a checkout-side error.
///
/// Wire values are lowercase. Unknown values decode to [`Unsupported`]
/// rather than failing, so new server-side categories degrade gracefully
/// instead of breaking older SDK builds.
///
/// [`Unsupported`]: Self::Unsupported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorGroup {
    /// Authentication failures.
    Authentication,
    /// Shop or SDK configuration failures.
    Configuration,
    /// Failures the web checkout cannot recover from on its own.
    Unrecoverable,
    /// Checkout-flow failures.
    Checkout,
    /// The cart or checkout session expired.
    Expired,
    /// Any group this SDK build does not recognize.
    #[serde(other)]
    Unsupported,
}

// ============================================================================
// ErrorPayload
// ============================================================================

/// One error object from the checkout's error report channel.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorPayload {
    /// Coarse error category.
    pub group: ErrorGroup,

    /// Checkout flow the error occurred in.
    #[serde(default, rename = "flowType")]
    pub flow_type: String,

    /// Error type within the group.
    #[serde(default, rename = "type")]
    pub error_type: String,

    /// Specific error code.
    #[serde(default)]
    pub code: String,

    /// Human-readable reason, when provided.
    #[serde(default)]
    pub reason: Option<String>,
}

impl ErrorPayload {
    /// Maps this payload to a typed exception, or `None` for groups the
    /// host ignores.
    ///
    /// The table is priority-ordered on (group, code); first match wins.
    /// The `unrecoverable` group deliberately maps to `recoverable = true`
    /// — this mirrors the checkout's observed contract and hosts depend on
    /// it for retry flows, so it is preserved verbatim.
    #[must_use]
    pub fn to_exception(&self) -> Option<CheckoutException> {
        match self.group {
            ErrorGroup::Configuration => Some(match self.code.as_str() {
                "customer_account_required" => CheckoutException::Authentication {
                    code: CheckoutErrorCode::CustomerAccountRequired,
                    recoverable: false,
                },
                "storefront_password_required" => CheckoutException::Configuration {
                    code: CheckoutErrorCode::StorefrontPasswordRequired,
                    recoverable: false,
                },
                _ => CheckoutException::Configuration {
                    code: CheckoutErrorCode::Unknown,
                    recoverable: false,
                },
            }),

            ErrorGroup::Unrecoverable => Some(CheckoutException::Client {
                code: self.code.clone(),
                recoverable: true,
            }),

            ErrorGroup::Expired => Some(CheckoutException::CheckoutExpired {
                code: match self.code.as_str() {
                    "invalid_cart" => CheckoutErrorCode::InvalidCart,
                    "cart_completed" => CheckoutErrorCode::CartCompleted,
                    _ => CheckoutErrorCode::CartExpired,
                },
                recoverable: false,
            }),

            ErrorGroup::Authentication | ErrorGroup::Checkout | ErrorGroup::Unsupported => None,
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes the error report channel's raw text into payloads.
///
/// # Errors
///
/// Returns [`Error::ErrorReport`] if `raw` is not a valid array of error
/// objects. This failure is intentionally not swallowed; see the module
/// docs.
pub fn decode_error_payloads(raw: &str) -> Result<Vec<ErrorPayload>> {
    serde_json::from_str(raw).map_err(|error| Error::error_report(error.to_string()))
}

/// Maps the first payload of a report to an exception.
///
/// Remaining entries are discarded; the checkout lists them in descending
/// relevance and hosts act on one failure at a time.
#[must_use]
pub fn map_first_error(payloads: &[ErrorPayload]) -> Option<CheckoutException> {
    payloads.first().and_then(ErrorPayload::to_exception)
}

// ============================================================================
// Tests
// ============================================================================
