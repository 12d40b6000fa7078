//! # checkout-core
//!
//! Core types and traits for the fashion-checkout payment flow.
//!
//! This crate provides:
//! - `SessionGateway` trait for merchant-side session APIs
//! - `PaymentSurface` trait for the external interactive payment view
//! - `OrderPayload` and `OrderLine` for the session order document
//! - `Session`, `CategoryId`, and `AuthorizationToken` for checkout state
//! - `CheckoutOrchestrator` driving the session/authorize/finalize workflow
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutOrchestrator, OrderPayload, ViewEvent};
//!
//! // Wire a gateway and a surface, then drive one checkout attempt
//! let orchestrator = CheckoutOrchestrator::new(gateway, surface, "kpFashionStore://");
//!
//! orchestrator.start_session(&OrderPayload::example("SE", "SEK", "en-US")).await?;
//!
//! // The surface pushes lifecycle events back in
//! orchestrator.handle_view_event(ViewEvent::Initialized).await?;
//!
//! // Once an authorization token has been captured
//! let outcome = orchestrator.finalize_order().await?;
//! assert!(outcome.accepted());
//! ```

pub mod error;
pub mod event;
pub mod gateway;
pub mod order;
pub mod orchestrator;
pub mod session;
pub mod surface;

// Re-exports for convenience
pub use error::{CheckoutError, CheckoutResult};
pub use event::ViewEvent;
pub use gateway::{BoxedSessionGateway, SessionGateway};
pub use order::{OrderLine, OrderPayload};
pub use orchestrator::{CheckoutOrchestrator, CheckoutPhase};
pub use session::{
    AuthorizationToken, CategoryId, FinalizeOutcome, Session, FRAUD_STATUS_ACCEPTED,
};
pub use surface::{BoxedPaymentSurface, PaymentSurface, ViewRequest};
