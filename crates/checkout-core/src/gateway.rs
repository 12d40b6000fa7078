//! # Session Gateway Trait
//!
//! Seam between the checkout workflow and a merchant-side payments API.
//! One implementation exists (the Klarna playground gateway); tests supply
//! in-memory doubles.

use crate::error::CheckoutResult;
use crate::order::OrderPayload;
use crate::session::{AuthorizationToken, FinalizeOutcome, Session};
use async_trait::async_trait;
use std::sync::Arc;

/// Merchant-side session API consumed by the orchestrator.
///
/// Both operations are single-shot: no retry, no backoff. The orchestrator's
/// state machine guarantees at most one in-flight call per attempt.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Create a credit session for the given order.
    ///
    /// # Returns
    /// A `Session` holding the client token and the usable payment method
    /// categories, in server order.
    async fn create_session(&self, order: &OrderPayload) -> CheckoutResult<Session>;

    /// Finalize an order with a previously captured authorization token.
    ///
    /// The order document of the session being finalized is posted along
    /// with the call.
    async fn finalize_order(
        &self,
        token: &AuthorizationToken,
        order: &OrderPayload,
    ) -> CheckoutResult<FinalizeOutcome>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedSessionGateway = Arc<dyn SessionGateway>;
