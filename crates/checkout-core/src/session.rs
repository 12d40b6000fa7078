//! # Session Types
//!
//! Server-issued credit session context: the client token plus the ordered
//! set of payment method categories eligible for the current order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fraud status value that signals an accepted order
pub const FRAUD_STATUS_ACCEPTED: &str = "ACCEPTED";

/// Opaque identifier naming a payment method category (e.g. "pay_later")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque proof that payment input was completed in the payment view.
///
/// Required to finalize an order; a newer token always supersedes the
/// previously stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationToken(String);

impl AuthorizationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuthorizationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A credit session created by the session gateway.
///
/// Immutable once created; owned by the orchestrator for the lifetime of a
/// checkout attempt. Category order is significant and drives UI cycling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Token handed to the payment view when mounting it
    pub client_token: String,

    /// Usable payment method categories, in server order
    pub categories: Vec<CategoryId>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session stamped with the current time
    pub fn new(client_token: impl Into<String>, categories: Vec<CategoryId>) -> Self {
        Self {
            client_token: client_token.into(),
            categories,
            created_at: Utc::now(),
        }
    }

    /// Number of available categories
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

/// Result of an order-finalization call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeOutcome {
    /// Fraud status reported by the merchant API, if present
    pub fraud_status: Option<String>,
}

impl FinalizeOutcome {
    pub fn new(fraud_status: Option<String>) -> Self {
        Self { fraud_status }
    }

    /// The order was accepted only on the literal `"ACCEPTED"` status.
    ///
    /// Any other value, or a missing field, is non-acceptance rather than a
    /// distinct error taxonomy.
    pub fn accepted(&self) -> bool {
        self.fraud_status.as_deref() == Some(FRAUD_STATUS_ACCEPTED)
    }

    /// Fraud status for diagnostics, with a placeholder when absent
    pub fn fraud_status_or_missing(&self) -> &str {
        self.fraud_status.as_deref().unwrap_or("<missing>")
    }
}
