//! # Fashion Checkout
//!
//! Headless walkthrough of the checkout flow against the Klarna playground.
//!
//! ## Usage
//!
//! ```bash
//! # Set merchant credentials (or put them in config/merchant.toml)
//! export KLARNA_API_USERNAME=PK...
//! export KLARNA_API_PASSWORD=...
//!
//! # Optional: a real authorization token captured from a device flow
//! export KLARNA_AUTHORIZATION_TOKEN=...
//!
//! fashion-checkout
//! ```

mod surface;

use checkout_core::{AuthorizationToken, CheckoutOrchestrator, OrderPayload, ViewEvent};
use checkout_klarna::{KlarnaConfig, KlarnaGateway};
use std::sync::Arc;
use surface::HeadlessSurface;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let config = load_merchant_config()?;
    info!(
        base_url = %config.api_base_url,
        playground = config.is_playground(),
        market = %config.purchase_country,
        "merchant configuration loaded"
    );

    let gateway = Arc::new(KlarnaGateway::new(config.clone())?);
    let surface = Arc::new(HeadlessSurface::new());
    let orchestrator =
        CheckoutOrchestrator::new(gateway, surface.clone(), config.return_url.clone());

    let order = OrderPayload::example(
        &config.purchase_country,
        &config.purchase_currency,
        &config.locale,
    );
    info!(
        amount = order.order_amount,
        currency = %config.purchase_currency,
        "starting checkout attempt"
    );

    orchestrator.start_session(&order).await?;

    // Walk every payment method category once, wrapping back to the first
    let categories = orchestrator.categories().await;
    info!(
        categories = ?categories.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
        "cycling through payment method categories"
    );
    for _ in 0..categories.len() {
        let category = orchestrator.advance_category().await?;
        info!(%category, "presented next category");
    }
    if let Some(category) = surface.current_category() {
        info!(%category, "payment view ready for input");
    }

    // The SDK view would push these callbacks; replay them headlessly
    orchestrator.handle_view_event(ViewEvent::Initialized).await?;
    orchestrator.handle_view_event(ViewEvent::Loaded).await?;

    let token = authorization_token_from_env();
    orchestrator
        .handle_view_event(ViewEvent::Authorized {
            approved: Some(true),
            token: Some(token),
            finalize_required: Some(false),
        })
        .await?;

    match orchestrator.finalize_order().await {
        Ok(outcome) => {
            info!(
                fraud_status = outcome.fraud_status_or_missing(),
                "order placed 🎉"
            );
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "checkout attempt failed");
            orchestrator.abandon().await;
            Err(err.into())
        }
    }
}

/// Load merchant configuration from `config/merchant.toml`, falling back to
/// environment variables.
fn load_merchant_config() -> anyhow::Result<KlarnaConfig> {
    let config_paths = [
        "config/merchant.toml",
        "../config/merchant.toml",
        "../../config/merchant.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let config: KlarnaConfig = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            config.validate()?;
            info!("Loaded merchant configuration from {}", path);
            return Ok(config);
        }
    }

    Ok(KlarnaConfig::from_env()?)
}

/// The interactive authorization step cannot happen headlessly; accept a
/// token captured from a real device flow, or fall back to a placeholder the
/// playground will reject.
fn authorization_token_from_env() -> AuthorizationToken {
    match std::env::var("KLARNA_AUTHORIZATION_TOKEN") {
        Ok(token) => AuthorizationToken::new(token),
        Err(_) => {
            warn!("KLARNA_AUTHORIZATION_TOKEN not set, using a placeholder token");
            AuthorizationToken::new("authorization-token-from-device-flow")
        }
    }
}

fn print_banner() {
    println!(
        r#"
  👜 Fashion Checkout 👜
  ━━━━━━━━━━━━━━━━━━━━━━━
  Hosted-payments demo flow
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
