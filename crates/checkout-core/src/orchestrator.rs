//! # Checkout Orchestrator
//!
//! The workflow state machine tying the session gateway to the payment
//! surface: create a credit session, cycle the presented payment method
//! category, capture authorization tokens pushed by the view, and finalize
//! the order.
//!
//! Phases: `Idle -> SessionPending -> SessionReady -> Authorized ->
//! Finalizing -> Finalized`, with an absorbing `Failed` reachable from any
//! non-terminal phase. One orchestrator owns one checkout attempt; there is
//! no shared or global state across attempts.

use crate::error::{CheckoutError, CheckoutResult};
use crate::event::ViewEvent;
use crate::gateway::BoxedSessionGateway;
use crate::order::OrderPayload;
use crate::session::{AuthorizationToken, CategoryId, FinalizeOutcome, Session};
use crate::surface::{BoxedPaymentSurface, ViewRequest};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Phase of the current checkout attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutPhase {
    /// No attempt in flight
    Idle,
    /// Waiting on the session-creation call
    SessionPending,
    /// Session established, view presented for the indexed category
    SessionReady { category_index: usize },
    /// An authorization token has been captured
    Authorized { category_index: usize },
    /// Waiting on the order-finalization call
    Finalizing,
    /// The order was accepted
    Finalized,
    /// The attempt ended in an error; recovery requires a restart from Idle
    Failed { reason: String },
}

impl CheckoutPhase {
    /// Short phase name for logging
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutPhase::Idle => "idle",
            CheckoutPhase::SessionPending => "session_pending",
            CheckoutPhase::SessionReady { .. } => "session_ready",
            CheckoutPhase::Authorized { .. } => "authorized",
            CheckoutPhase::Finalizing => "finalizing",
            CheckoutPhase::Finalized => "finalized",
            CheckoutPhase::Failed { .. } => "failed",
        }
    }

    /// True once the attempt can no longer progress
    pub fn is_settled(&self) -> bool {
        matches!(self, CheckoutPhase::Finalized | CheckoutPhase::Failed { .. })
    }
}

impl std::fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mutable state of one checkout attempt
struct AttemptState {
    /// Identity used to drop results that arrive after a reset
    attempt: Uuid,
    phase: CheckoutPhase,
    session: Option<Session>,
    order: Option<OrderPayload>,
    authorization_token: Option<AuthorizationToken>,
}

impl AttemptState {
    fn new() -> Self {
        Self {
            attempt: Uuid::new_v4(),
            phase: CheckoutPhase::Idle,
            session: None,
            order: None,
            authorization_token: None,
        }
    }

    /// True if a result captured under `attempt` must be dropped
    fn is_stale(&self, attempt: Uuid) -> bool {
        self.attempt != attempt
            || matches!(
                self.phase,
                CheckoutPhase::Idle | CheckoutPhase::Failed { .. }
            )
    }
}

/// Drives one checkout attempt against a session gateway and a payment
/// surface.
///
/// All operations take `&self`; attempt state lives behind a mutex so
/// transitions serialize regardless of the calling task. The state lock is
/// never held across a gateway or surface await.
pub struct CheckoutOrchestrator {
    gateway: BoxedSessionGateway,
    surface: BoxedPaymentSurface,
    return_url: String,
    state: Mutex<AttemptState>,
}

impl CheckoutOrchestrator {
    /// Create an orchestrator for a fresh checkout attempt
    pub fn new(
        gateway: BoxedSessionGateway,
        surface: BoxedPaymentSurface,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            surface,
            return_url: return_url.into(),
            state: Mutex::new(AttemptState::new()),
        }
    }

    /// Start a checkout attempt: create a credit session and present the
    /// payment view for the first category.
    ///
    /// Only valid from `Idle`; any gateway or presentation failure moves the
    /// attempt to `Failed`.
    #[instrument(skip(self, order), fields(provider = self.gateway.provider_name()))]
    pub async fn start_session(&self, order: &OrderPayload) -> CheckoutResult<()> {
        let attempt = {
            let mut state = self.state.lock().await;
            if state.phase != CheckoutPhase::Idle {
                return Err(CheckoutError::Precondition(format!(
                    "start_session requires an idle attempt, phase is {}",
                    state.phase
                )));
            }
            state.phase = CheckoutPhase::SessionPending;
            state.attempt
        };

        let result = self.gateway.create_session(order).await;

        let request = {
            let mut state = self.state.lock().await;
            if state.is_stale(attempt) {
                debug!("dropping session-creation result for a superseded attempt");
                return Err(CheckoutError::Precondition(
                    "checkout attempt was superseded".to_string(),
                ));
            }

            match result {
                Ok(session) if session.categories.is_empty() => {
                    let err = CheckoutError::Protocol(
                        "session contains no payment method categories".to_string(),
                    );
                    error!(error = %err, "session creation unusable");
                    state.phase = CheckoutPhase::Failed {
                        reason: err.to_string(),
                    };
                    return Err(err);
                }
                Ok(session) => {
                    info!(
                        categories = session.categories.len(),
                        "credit session created"
                    );
                    let request = ViewRequest::new(
                        &session.client_token,
                        session.categories[0].clone(),
                        &self.return_url,
                    );
                    state.session = Some(session);
                    state.order = Some(order.clone());
                    state.authorization_token = None;
                    state.phase = CheckoutPhase::SessionReady { category_index: 0 };
                    request
                }
                Err(err) => {
                    error!(error = %err, "session creation failed");
                    state.phase = CheckoutPhase::Failed {
                        reason: err.to_string(),
                    };
                    return Err(err);
                }
            }
        };

        if let Err(err) = self.surface.present(&request).await {
            self.fail_attempt(attempt, &err).await;
            return Err(err);
        }
        Ok(())
    }

    /// Cycle to the next payment method category, wrapping at the end.
    ///
    /// Dismisses exactly one payment view and presents exactly one new one.
    #[instrument(skip(self))]
    pub async fn advance_category(&self) -> CheckoutResult<CategoryId> {
        let (attempt, request) = {
            let mut state = self.state.lock().await;
            let CheckoutPhase::SessionReady { category_index } = state.phase else {
                return Err(CheckoutError::Precondition(format!(
                    "advance_category requires an established session, phase is {}",
                    state.phase
                )));
            };
            let session = state.session.as_ref().ok_or_else(|| {
                CheckoutError::Precondition("no active session".to_string())
            })?;
            if session.categories.is_empty() {
                return Err(CheckoutError::Precondition(
                    "session has no payment method categories".to_string(),
                ));
            }

            let next = (category_index + 1) % session.categories.len();
            let request = ViewRequest::new(
                &session.client_token,
                session.categories[next].clone(),
                &self.return_url,
            );
            state.phase = CheckoutPhase::SessionReady {
                category_index: next,
            };
            debug!(from = category_index, to = next, "advancing category");
            (state.attempt, request)
        };

        self.surface.dismiss().await;
        if let Err(err) = self.surface.present(&request).await {
            self.fail_attempt(attempt, &err).await;
            return Err(err);
        }
        Ok(request.category)
    }

    /// Apply a lifecycle event pushed by the payment view.
    ///
    /// Authorization-family events are applied in arrival order with
    /// last-write-wins semantics on the stored token.
    #[instrument(skip(self, event), fields(event = event.name()))]
    pub async fn handle_view_event(&self, event: ViewEvent) -> CheckoutResult<()> {
        match event {
            ViewEvent::Initialized => {
                debug!("payment view initialized, requesting load");
                if let Err(err) = self.surface.load().await {
                    self.fail_current_attempt(&err).await;
                    return Err(err);
                }
                Ok(())
            }
            ViewEvent::Loaded => {
                debug!("payment view loaded, revealing");
                if let Err(err) = self.surface.reveal().await {
                    self.fail_current_attempt(&err).await;
                    return Err(err);
                }
                Ok(())
            }
            ViewEvent::Authorized {
                approved,
                token,
                finalize_required,
            } => {
                if finalize_required == Some(true) {
                    debug!("authorization reports a finalization step is required");
                }
                self.store_authorization("authorized", approved, token).await;
                Ok(())
            }
            ViewEvent::Reauthorized { approved, token } => {
                self.store_authorization("reauthorized", approved, token)
                    .await;
                Ok(())
            }
            ViewEvent::Finalized { approved, token } => {
                self.store_authorization("finalized", approved, token).await;
                Ok(())
            }
            ViewEvent::Resized { height } => {
                debug!(height, "payment view resized");
                Ok(())
            }
            ViewEvent::Failed { message } => {
                error!(%message, "payment view reported failure");
                {
                    let mut state = self.state.lock().await;
                    if !state.phase.is_settled() {
                        state.phase = CheckoutPhase::Failed {
                            reason: message.clone(),
                        };
                    }
                }
                self.surface.dismiss().await;
                Ok(())
            }
        }
    }

    /// Finalize the order with the stored authorization token.
    ///
    /// Requires a captured token; calling without one is a precondition
    /// failure that issues no network call and leaves the attempt untouched.
    #[instrument(skip(self), fields(provider = self.gateway.provider_name()))]
    pub async fn finalize_order(&self) -> CheckoutResult<FinalizeOutcome> {
        let (attempt, token, order) = {
            let mut state = self.state.lock().await;
            let (token, order) = match (
                &state.phase,
                &state.authorization_token,
                &state.order,
            ) {
                (CheckoutPhase::Authorized { .. }, Some(token), Some(order)) => {
                    (token.clone(), order.clone())
                }
                _ => {
                    return Err(CheckoutError::Precondition(
                        "finalize_order requires a stored authorization token".to_string(),
                    ))
                }
            };
            state.phase = CheckoutPhase::Finalizing;
            (state.attempt, token, order)
        };

        let result = self.gateway.finalize_order(&token, &order).await;

        let mut state = self.state.lock().await;
        if state.is_stale(attempt) {
            debug!("dropping finalization result for a superseded attempt");
            return Err(CheckoutError::Precondition(
                "checkout attempt was superseded".to_string(),
            ));
        }

        match result {
            Ok(outcome) if outcome.accepted() => {
                info!("order accepted");
                state.phase = CheckoutPhase::Finalized;
                Ok(outcome)
            }
            Ok(outcome) => {
                let err = CheckoutError::OrderRejected {
                    fraud_status: outcome.fraud_status_or_missing().to_string(),
                };
                warn!(error = %err, "order not accepted");
                state.phase = CheckoutPhase::Failed {
                    reason: err.to_string(),
                };
                Err(err)
            }
            Err(err) => {
                error!(error = %err, "order finalization failed");
                state.phase = CheckoutPhase::Failed {
                    reason: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Abandon the current attempt: detach the view and reset to `Idle`.
    ///
    /// Results of any still-pending gateway call are dropped on arrival.
    #[instrument(skip(self))]
    pub async fn abandon(&self) {
        {
            let mut state = self.state.lock().await;
            info!(phase = %state.phase, "abandoning checkout attempt");
            state.attempt = Uuid::new_v4();
            state.phase = CheckoutPhase::Idle;
            state.session = None;
            state.order = None;
            state.authorization_token = None;
        }
        self.surface.dismiss().await;
    }

    /// Current phase of the attempt
    pub async fn phase(&self) -> CheckoutPhase {
        self.state.lock().await.phase.clone()
    }

    /// Stored authorization token, if one has been captured
    pub async fn authorization_token(&self) -> Option<AuthorizationToken> {
        self.state.lock().await.authorization_token.clone()
    }

    /// Categories of the established session, in cycling order
    pub async fn categories(&self) -> Vec<CategoryId> {
        self.state
            .lock()
            .await
            .session
            .as_ref()
            .map(|s| s.categories.clone())
            .unwrap_or_default()
    }

    /// The category currently presented, if a session is established
    pub async fn current_category(&self) -> Option<CategoryId> {
        let state = self.state.lock().await;
        let index = match state.phase {
            CheckoutPhase::SessionReady { category_index }
            | CheckoutPhase::Authorized { category_index } => category_index,
            _ => return None,
        };
        state
            .session
            .as_ref()
            .and_then(|s| s.categories.get(index).cloned())
    }

    /// Store a token pushed by an authorization-family event.
    ///
    /// Events without a token keep the previously stored one; overwriting an
    /// approved token with nothing would strand the attempt.
    async fn store_authorization(
        &self,
        kind: &'static str,
        approved: Option<bool>,
        token: Option<AuthorizationToken>,
    ) {
        let Some(token) = token else {
            warn!(kind, "authorization event carried no token, keeping stored token");
            return;
        };

        let mut state = self.state.lock().await;
        match state.phase {
            CheckoutPhase::SessionReady { category_index } => {
                state.phase = CheckoutPhase::Authorized { category_index };
            }
            // Re-authorization and finalization re-fire without a phase change
            CheckoutPhase::Authorized { .. } => {}
            _ => {
                warn!(
                    kind,
                    phase = %state.phase,
                    "dropping authorization event in unexpected phase"
                );
                return;
            }
        }
        debug!(kind, approved = ?approved, "stored authorization token");
        state.authorization_token = Some(token);
    }

    /// Move the attempt to `Failed` unless it was superseded or settled
    async fn fail_attempt(&self, attempt: Uuid, err: &CheckoutError) {
        let mut state = self.state.lock().await;
        if state.attempt == attempt && !state.phase.is_settled() {
            state.phase = CheckoutPhase::Failed {
                reason: err.to_string(),
            };
        }
    }

    async fn fail_current_attempt(&self, err: &CheckoutError) {
        let attempt = self.state.lock().await.attempt;
        self.fail_attempt(attempt, err).await;
    }
}
