//! Outbound message transport seam.
//!
//! The bridge never owns the channel to the embedded web content. The
//! host supplies an object implementing [`MessageTransport`] (typically
//! a thin wrapper over a WebView's JavaScript evaluation entry point)
//! and the bridge holds it weakly: if the WebView is torn down while a
//! request is still pending, the late response is dropped instead of
//! reviving the channel.
//!
//! # Liveness
//!
//! | Holder | Reference |
//! |--------|-----------|
//! | Host application | `Arc<dyn MessageTransport>` (owning) |
//! | Bridge / pending requests | `Weak<dyn MessageTransport>` (non-owning) |

// ============================================================================
// MessageTransport
// ============================================================================

/// Write-only channel delivering a string to the embedded web content.
///
/// Implementations must tolerate being called from whichever thread the
/// host responds on; the bridge performs no thread marshalling.
///
/// # Example
///
/// ```
/// use checkout_bridge::MessageTransport;
///
/// struct WebViewChannel;
///
/// impl MessageTransport for WebViewChannel {
///     fn send(&self, message: &str) {
///         // evaluate `window.MobileCheckoutSdk.postMessage(...)` in the WebView
///         let _ = message;
///     }
/// }
/// ```
pub trait MessageTransport: Send + Sync {
    /// Delivers one serialized message to the web content.
    ///
    /// Delivery is fire-and-forget; the protocol layer has no failure
    /// channel for a send that the WebView drops.
    fn send(&self, message: &str);
}
