//! Error types for the checkout bridge.
//!
//! Two distinct failure surfaces exist in this crate and they must not be
//! conflated:
//!
//! - [`Error`] — failures of the bridge itself (a malformed error report,
//!   a payload that cannot be serialized). These propagate via [`Result<T>`].
//! - [`CheckoutException`] — typed failures reported *by the checkout*,
//!   produced by mapping an [`ErrorPayload`](crate::protocol::ErrorPayload)
//!   through its taxonomy. These are values delivered to the host, not Rust
//!   errors raised by this crate.
//!
//! Malformed inbound envelopes never produce either: they are dropped with
//! a diagnostic log (see [`MethodRegistry`](crate::protocol::MethodRegistry)).
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Protocol | [`Error::Protocol`] |
//! | Error report | [`Error::ErrorReport`] |
//! | External | [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::result::Result as StdResult;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    /// Protocol violation on an outbound message.
    ///
    /// Returned when a response or notification cannot be produced in a
    /// form the embedded web content would accept.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Error report channel delivered unparseable content.
    ///
    /// Returned by [`decode_error_payloads`](crate::protocol::decode_error_payloads)
    /// when the raw text is not a valid array of error objects. This is the
    /// one inbound path where failure is surfaced instead of swallowed: an
    /// error report that cannot be parsed must not vanish silently.
    #[error("Malformed error report: {message}")]
    ErrorReport {
        /// Description of the decode failure.
        message: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an error report error.
    #[inline]
    pub fn error_report(message: impl Into<String>) -> Self {
        Self::ErrorReport {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a malformed-error-report error.
    #[inline]
    #[must_use]
    pub fn is_error_report(&self) -> bool {
        matches!(self, Self::ErrorReport { .. })
    }

    /// Returns `true` if this is a protocol error.
    #[inline]
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }
}

// ============================================================================
// CheckoutErrorCode
// ============================================================================

/// Known error codes carried by a [`CheckoutException`].
///
/// Wire values are snake_case, matching the `code` field of the checkout's
/// error report objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutErrorCode {
    /// Shop requires a signed-in customer account.
    CustomerAccountRequired,
    /// Storefront is password protected.
    StorefrontPasswordRequired,
    /// The cart backing this checkout is no longer valid.
    InvalidCart,
    /// The cart backing this checkout was already completed.
    CartCompleted,
    /// The cart backing this checkout has expired.
    CartExpired,
    /// Unrecognized configuration failure.
    Unknown,
}

impl fmt::Display for CheckoutErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::CustomerAccountRequired => "customer_account_required",
            Self::StorefrontPasswordRequired => "storefront_password_required",
            Self::InvalidCart => "invalid_cart",
            Self::CartCompleted => "cart_completed",
            Self::CartExpired => "cart_expired",
            Self::Unknown => "unknown",
        };
        f.write_str(code)
    }
}

// ============================================================================
// CheckoutException
// ============================================================================

/// Typed failure reported by the checkout, delivered to the host.
///
/// Produced by [`ErrorPayload::to_exception`](crate::protocol::ErrorPayload::to_exception)
/// from the fixed group/code mapping table. The `recoverable` flag tells the
/// host whether retrying the checkout may succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutException {
    /// Checkout requires authentication the session does not have.
    #[error("Authentication error: {code}")]
    Authentication {
        /// Specific error code.
        code: CheckoutErrorCode,
        /// Whether retrying may succeed.
        recoverable: bool,
    },

    /// Shop or SDK configuration prevents checkout.
    #[error("Configuration error: {code}")]
    Configuration {
        /// Specific error code.
        code: CheckoutErrorCode,
        /// Whether retrying may succeed.
        recoverable: bool,
    },

    /// Checkout's backing cart expired or was consumed.
    #[error("Checkout expired: {code}")]
    CheckoutExpired {
        /// Specific error code.
        code: CheckoutErrorCode,
        /// Whether retrying may succeed.
        recoverable: bool,
    },

    /// Client-side failure reported by the checkout.
    ///
    /// Carries the report's code verbatim; the set of codes on this path
    /// is open-ended server-side.
    #[error("Client error: {code}")]
    Client {
        /// Error code, passed through from the report.
        code: String,
        /// Whether retrying may succeed.
        recoverable: bool,
    },
}

impl CheckoutException {
    /// Returns whether retrying the checkout may succeed.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Authentication { recoverable, .. }
            | Self::Configuration { recoverable, .. }
            | Self::CheckoutExpired { recoverable, .. }
            | Self::Client { recoverable, .. } => *recoverable,
        }
    }

    /// Returns the error code as a snake_case string.
    #[inline]
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Authentication { code, .. }
            | Self::Configuration { code, .. }
            | Self::CheckoutExpired { code, .. } => code.to_string(),
            Self::Client { code, .. } => code.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
