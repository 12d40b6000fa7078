//! # Payment View Events
//!
//! Lifecycle notifications pushed by the external payment view. The closed
//! variant set keeps event ordering and the last-write-wins token rule
//! explicit, instead of spreading them over loose callback methods.

use crate::session::AuthorizationToken;

/// A lifecycle event emitted by the mounted payment view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The view finished initializing and can be asked to load
    Initialized,

    /// The view finished loading and can be revealed to the user
    Loaded,

    /// The user completed payment input
    Authorized {
        approved: Option<bool>,
        token: Option<AuthorizationToken>,
        finalize_required: Option<bool>,
    },

    /// The user re-authorized after an order change
    Reauthorized {
        approved: Option<bool>,
        token: Option<AuthorizationToken>,
    },

    /// The view finalized a previously deferred authorization
    Finalized {
        approved: Option<bool>,
        token: Option<AuthorizationToken>,
    },

    /// The view changed height (informational)
    Resized { height: f64 },

    /// The view reported an error
    Failed { message: String },
}

impl ViewEvent {
    /// Short event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::Initialized => "initialized",
            ViewEvent::Loaded => "loaded",
            ViewEvent::Authorized { .. } => "authorized",
            ViewEvent::Reauthorized { .. } => "reauthorized",
            ViewEvent::Finalized { .. } => "finalized",
            ViewEvent::Resized { .. } => "resized",
            ViewEvent::Failed { .. } => "failed",
        }
    }

    /// The authorization token carried by this event, if any.
    ///
    /// Only the authorization-family events carry one.
    pub fn authorization_token(&self) -> Option<&AuthorizationToken> {
        match self {
            ViewEvent::Authorized { token, .. }
            | ViewEvent::Reauthorized { token, .. }
            | ViewEvent::Finalized { token, .. } => token.as_ref(),
            _ => None,
        }
    }
}
