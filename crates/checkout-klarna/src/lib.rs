//! # checkout-klarna
//!
//! Klarna Payments gateway for the fashion-checkout flow.
//!
//! This crate implements `checkout_core::SessionGateway` against the Klarna
//! Payments playground API:
//!
//! - **Credit sessions** - `POST /payments/v1/sessions` with the order
//!   document, returning a client token and the eligible payment method
//!   categories
//! - **Order finalization** - `POST /payments/v1/authorizations/{token}/order`,
//!   accepted only on `fraud_status: "ACCEPTED"`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_klarna::KlarnaGateway;
//! use checkout_core::{OrderPayload, SessionGateway};
//!
//! // Credentials from KLARNA_API_USERNAME / KLARNA_API_PASSWORD
//! let gateway = KlarnaGateway::from_env()?;
//!
//! let order = OrderPayload::example("SE", "SEK", "en-US");
//! let session = gateway.create_session(&order).await?;
//!
//! // Hand session.client_token to the payment view, capture the
//! // authorization token it reports, then finalize:
//! let outcome = gateway.finalize_order(&token, &order).await?;
//! ```

pub mod config;
pub mod gateway;
pub mod http;

// Re-exports
pub use config::KlarnaConfig;
pub use gateway::KlarnaGateway;
pub use http::HttpClient;
