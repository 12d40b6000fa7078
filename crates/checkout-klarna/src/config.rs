//! # Klarna Configuration
//!
//! Merchant configuration for the Klarna Payments playground integration.
//! Credentials are loaded from environment variables; everything else has
//! playground defaults.

use checkout_core::{CheckoutError, CheckoutResult};
use serde::Deserialize;
use std::env;

fn default_api_base_url() -> String {
    "https://api.playground.klarna.com".to_string()
}

fn default_purchase_country() -> String {
    "SE".to_string()
}

fn default_purchase_currency() -> String {
    "SEK".to_string()
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_return_url() -> String {
    "kpFashionStore://".to_string()
}

/// Klarna Payments API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KlarnaConfig {
    /// Basic-auth username (merchant API credential)
    pub username: String,

    /// Basic-auth password (merchant API credential)
    pub password: String,

    /// API base URL (playground by default, overridable for mocking)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Purchase country (ISO 3166-1 alpha-2)
    #[serde(default = "default_purchase_country")]
    pub purchase_country: String,

    /// Purchase currency (ISO 4217)
    #[serde(default = "default_purchase_currency")]
    pub purchase_currency: String,

    /// Locale for the payment experience
    #[serde(default = "default_locale")]
    pub locale: String,

    /// App return URL scheme handed to the payment view
    #[serde(default = "default_return_url")]
    pub return_url: String,
}

impl KlarnaConfig {
    /// Create a config with explicit credentials and playground defaults
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            api_base_url: default_api_base_url(),
            purchase_country: default_purchase_country(),
            purchase_currency: default_purchase_currency(),
            locale: default_locale(),
            return_url: default_return_url(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `KLARNA_API_USERNAME`
    /// - `KLARNA_API_PASSWORD`
    ///
    /// Optional: `KLARNA_API_BASE_URL`, `KLARNA_PURCHASE_COUNTRY`,
    /// `KLARNA_PURCHASE_CURRENCY`, `KLARNA_LOCALE`, `KLARNA_RETURN_URL`.
    pub fn from_env() -> CheckoutResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let username = env::var("KLARNA_API_USERNAME").map_err(|_| {
            CheckoutError::Configuration("KLARNA_API_USERNAME not set".to_string())
        })?;
        let password = env::var("KLARNA_API_PASSWORD").map_err(|_| {
            CheckoutError::Configuration("KLARNA_API_PASSWORD not set".to_string())
        })?;

        let mut config = Self::new(username, password);
        if let Ok(url) = env::var("KLARNA_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Ok(country) = env::var("KLARNA_PURCHASE_COUNTRY") {
            config.purchase_country = country;
        }
        if let Ok(currency) = env::var("KLARNA_PURCHASE_CURRENCY") {
            config.purchase_currency = currency;
        }
        if let Ok(locale) = env::var("KLARNA_LOCALE") {
            config.locale = locale;
        }
        if let Ok(return_url) = env::var("KLARNA_RETURN_URL") {
            config.return_url = return_url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the config can produce well-formed authenticated requests
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(CheckoutError::Configuration(
                "Klarna API credentials must not be empty".to_string(),
            ));
        }
        // RFC 7617: the user-id of a basic credential cannot contain a colon
        if self.username.contains(':') {
            return Err(CheckoutError::Configuration(
                "Klarna API username must not contain ':'".to_string(),
            ));
        }
        reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            CheckoutError::Configuration(format!(
                "invalid API base URL '{}': {}",
                self.api_base_url, e
            ))
        })?;
        Ok(())
    }

    /// Check if pointed at the playground environment
    pub fn is_playground(&self) -> bool {
        self.api_base_url.contains("playground")
    }

    /// Session-creation endpoint
    pub fn session_url(&self) -> String {
        format!("{}/payments/v1/sessions", self.base())
    }

    /// Order-finalization endpoint for the given authorization token
    pub fn order_url(&self, authorization_token: &str) -> String {
        format!(
            "{}/payments/v1/authorizations/{}/order",
            self.base(),
            authorization_token
        )
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set the merchant market
    pub fn with_market(
        mut self,
        purchase_country: impl Into<String>,
        purchase_currency: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        self.purchase_country = purchase_country.into();
        self.purchase_currency = purchase_currency.into();
        self.locale = locale.into();
        self
    }

    /// Builder: set the app return URL
    pub fn with_return_url(mut self, return_url: impl Into<String>) -> Self {
        self.return_url = return_url.into();
        self
    }

    fn base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
