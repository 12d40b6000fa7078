//! # Klarna Session Gateway
//!
//! `SessionGateway` implementation against the Klarna Payments API:
//! credit-session creation and order finalization. Normally these calls live
//! on a merchant back-end; the demo issues them directly against the
//! playground environment.

use crate::config::KlarnaConfig;
use crate::http::HttpClient;
use async_trait::async_trait;
use checkout_core::{
    AuthorizationToken, CategoryId, CheckoutError, CheckoutResult, FinalizeOutcome,
    OrderPayload, Session, SessionGateway,
};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

/// Klarna Payments gateway
pub struct KlarnaGateway {
    config: KlarnaConfig,
    http: HttpClient,
}

impl KlarnaGateway {
    /// Create a gateway for the given merchant configuration
    pub fn new(config: KlarnaConfig) -> CheckoutResult<Self> {
        config.validate()?;
        let http = HttpClient::new(&config)?;
        Ok(Self { config, http })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Self::new(KlarnaConfig::from_env()?)
    }

    /// The merchant configuration backing this gateway
    pub fn config(&self) -> &KlarnaConfig {
        &self.config
    }

    fn parse_session(map: &Map<String, Value>) -> CheckoutResult<Session> {
        let client_token = map
            .get("client_token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CheckoutError::Protocol(
                    "session response is missing client_token".to_string(),
                )
            })?;
        if client_token.is_empty() {
            return Err(CheckoutError::Protocol(
                "session response carries an empty client_token".to_string(),
            ));
        }

        let raw_categories = map
            .get("payment_method_categories")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                CheckoutError::Protocol(
                    "session response is missing payment_method_categories".to_string(),
                )
            })?;

        let categories = extract_categories(raw_categories);
        if categories.is_empty() {
            return Err(CheckoutError::Protocol(
                "session response contains no usable payment method categories".to_string(),
            ));
        }

        Ok(Session::new(client_token, categories))
    }

    fn parse_outcome(map: &Map<String, Value>) -> FinalizeOutcome {
        let fraud_status = map
            .get("fraud_status")
            .and_then(Value::as_str)
            .map(String::from);
        if fraud_status.is_none() {
            warn!("order response is missing fraud_status");
        }
        FinalizeOutcome::new(fraud_status)
    }
}

/// Pull out the usable category identifiers, in server order.
///
/// Elements without a string `identifier` are skipped with a diagnostic
/// rather than failing the whole session.
fn extract_categories(raw: &[Value]) -> Vec<CategoryId> {
    let mut categories = Vec::with_capacity(raw.len());
    for element in raw {
        match element.get("identifier").and_then(Value::as_str) {
            Some(identifier) => categories.push(CategoryId::new(identifier)),
            None => warn!(%element, "skipping payment method category without identifier"),
        }
    }
    categories
}

#[async_trait]
impl SessionGateway for KlarnaGateway {
    #[instrument(skip(self, order), fields(amount = order.order_amount))]
    async fn create_session(&self, order: &OrderPayload) -> CheckoutResult<Session> {
        let map = self.http.post_json(&self.config.session_url(), order).await?;
        let session = Self::parse_session(&map)?;

        info!(
            categories = session.categories.len(),
            "credit session created"
        );
        Ok(session)
    }

    #[instrument(skip(self, token, order))]
    async fn finalize_order(
        &self,
        token: &AuthorizationToken,
        order: &OrderPayload,
    ) -> CheckoutResult<FinalizeOutcome> {
        let url = self.config.order_url(token.as_str());
        let map = self.http.post_json(&url, order).await?;
        let outcome = Self::parse_outcome(&map);

        info!(
            fraud_status = outcome.fraud_status_or_missing(),
            accepted = outcome.accepted(),
            "order finalization answered"
        );
        Ok(outcome)
    }

    fn provider_name(&self) -> &'static str {
        "klarna"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> KlarnaGateway {
        KlarnaGateway::new(
            KlarnaConfig::new("merchant", "secret").with_api_base_url(server.uri()),
        )
        .unwrap()
    }

    fn example_order() -> OrderPayload {
        OrderPayload::example("SE", "SEK", "en-US")
    }

    #[tokio::test]
    async fn test_create_session_posts_order_and_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/v1/sessions"))
            .and(body_partial_json(json!({
                "purchase_country": "SE",
                "purchase_currency": "SEK",
                "order_amount": 10000,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "client_token": "tok_abc",
                "payment_method_categories": [
                    {"identifier": "klarna_pay_later", "name": "Pay later"},
                    {"identifier": "klarna_pay_now", "name": "Pay now"},
                ],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = gateway(&server)
            .create_session(&example_order())
            .await
            .unwrap();

        assert_eq!(session.client_token, "tok_abc");
        assert_eq!(
            session
                .categories
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>(),
            vec!["klarna_pay_later", "klarna_pay_now"]
        );
    }

    #[tokio::test]
    async fn test_create_session_skips_category_without_identifier() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/v1/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "client_token": "tok_abc",
                "payment_method_categories": [
                    {"name": "broken entry"},
                    {"identifier": "x"},
                ],
            })))
            .mount(&server)
            .await;

        let session = gateway(&server)
            .create_session(&example_order())
            .await
            .unwrap();

        assert_eq!(session.categories, vec![CategoryId::from("x")]);
    }

    #[tokio::test]
    async fn test_create_session_rejects_missing_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payment_method_categories": [{"identifier": "x"}],
            })))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .create_session(&example_order())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Protocol(_)));
        assert!(err.to_string().contains("client_token"));
    }

    #[tokio::test]
    async fn test_create_session_rejects_empty_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "client_token": "",
                "payment_method_categories": [{"identifier": "x"}],
            })))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .create_session(&example_order())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_create_session_rejects_all_unusable_categories() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "client_token": "tok_abc",
                "payment_method_categories": [{"name": "broken"}, "also broken"],
            })))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .create_session(&example_order())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_create_session_surfaces_api_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error_code": "UNAUTHORIZED"})),
            )
            .mount(&server)
            .await;

        let err = gateway(&server)
            .create_session(&example_order())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Protocol(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_finalize_order_hits_token_scoped_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/v1/authorizations/auth_123/order"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "order_id": "order_1",
                "fraud_status": "ACCEPTED",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = gateway(&server)
            .finalize_order(&AuthorizationToken::new("auth_123"), &example_order())
            .await
            .unwrap();

        assert!(outcome.accepted());
        assert_eq!(outcome.fraud_status.as_deref(), Some("ACCEPTED"));
    }

    #[tokio::test]
    async fn test_finalize_order_missing_fraud_status_is_not_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"order_id": "order_1"})))
            .mount(&server)
            .await;

        let outcome = gateway(&server)
            .finalize_order(&AuthorizationToken::new("auth_123"), &example_order())
            .await
            .unwrap();

        assert!(!outcome.accepted());
        assert!(outcome.fraud_status.is_none());
    }

    #[test]
    fn test_extract_categories_keeps_server_order() {
        let raw = vec![
            json!({"identifier": "b"}),
            json!({"identifier": "a"}),
        ];
        let categories = extract_categories(&raw);

        assert_eq!(
            categories,
            vec![CategoryId::from("b"), CategoryId::from("a")]
        );
    }

    #[test]
    fn test_provider_name() {
        let gateway =
            KlarnaGateway::new(KlarnaConfig::new("merchant", "secret")).unwrap();
        assert_eq!(gateway.provider_name(), "klarna");
    }
}
