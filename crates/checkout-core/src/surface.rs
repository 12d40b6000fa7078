//! # Payment Surface Trait
//!
//! The presentation boundary: an opaque UI surface that renders the
//! interactive payment experience for one category at a time. The core never
//! touches UI primitives; implementations own UI-thread affinity and hop to
//! their UI-affine executor inside these calls.
//!
//! The surface pushes its lifecycle back to the orchestrator as
//! [`ViewEvent`](crate::event::ViewEvent) values through
//! `CheckoutOrchestrator::handle_view_event`.

use crate::error::CheckoutResult;
use crate::session::CategoryId;
use async_trait::async_trait;
use std::sync::Arc;

/// Everything a surface needs to mount a payment view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRequest {
    /// Client token from the credit session
    pub session_token: String,

    /// Category to render
    pub category: CategoryId,

    /// App return URL handed to the view
    pub return_url: String,
}

impl ViewRequest {
    pub fn new(
        session_token: impl Into<String>,
        category: CategoryId,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            session_token: session_token.into(),
            category,
            return_url: return_url.into(),
        }
    }
}

/// UI surface hosting the interactive payment view.
///
/// Supplied to the orchestrator at construction; detach is explicit via
/// [`dismiss`](PaymentSurface::dismiss) rather than implied by drop order.
#[async_trait]
pub trait PaymentSurface: Send + Sync {
    /// Mount a payment view for the given session token and category.
    async fn present(&self, request: &ViewRequest) -> CheckoutResult<()>;

    /// Ask the mounted view to load (issued after `Initialized`).
    async fn load(&self) -> CheckoutResult<()>;

    /// Make the loaded view visible (issued after `Loaded`).
    async fn reveal(&self) -> CheckoutResult<()>;

    /// Unconditionally detach the current view, if any.
    async fn dismiss(&self);
}

/// Type alias for a shared surface (dynamic dispatch)
pub type BoxedPaymentSurface = Arc<dyn PaymentSurface>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_request() {
        let request = ViewRequest::new("tok_1", CategoryId::from("pay_later"), "app://return");

        assert_eq!(request.session_token, "tok_1");
        assert_eq!(request.category.as_str(), "pay_later");
        assert_eq!(request.return_url, "app://return");
    }
}
