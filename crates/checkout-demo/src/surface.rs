//! # Headless Payment Surface
//!
//! Stand-in for the SDK payment view. It has no UI; it records the mounted
//! view and narrates the lifecycle so the flow can be watched from the log.

use async_trait::async_trait;
use checkout_core::{
    CategoryId, CheckoutError, CheckoutResult, PaymentSurface, ViewRequest,
};
use std::sync::Mutex;
use tracing::info;

/// Logging surface with at most one mounted view
#[derive(Default)]
pub struct HeadlessSurface {
    mounted: Mutex<Option<ViewRequest>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Category of the currently mounted view, if any
    pub fn current_category(&self) -> Option<CategoryId> {
        self.mounted
            .lock()
            .unwrap()
            .as_ref()
            .map(|request| request.category.clone())
    }
}

#[async_trait]
impl PaymentSurface for HeadlessSurface {
    async fn present(&self, request: &ViewRequest) -> CheckoutResult<()> {
        info!(category = %request.category, "mounting payment view");
        *self.mounted.lock().unwrap() = Some(request.clone());
        Ok(())
    }

    async fn load(&self) -> CheckoutResult<()> {
        if self.mounted.lock().unwrap().is_none() {
            return Err(CheckoutError::Precondition(
                "no payment view is mounted".to_string(),
            ));
        }
        info!("loading payment view");
        Ok(())
    }

    async fn reveal(&self) -> CheckoutResult<()> {
        if self.mounted.lock().unwrap().is_none() {
            return Err(CheckoutError::Precondition(
                "no payment view is mounted".to_string(),
            ));
        }
        info!("payment view visible");
        Ok(())
    }

    async fn dismiss(&self) {
        if let Some(request) = self.mounted.lock().unwrap().take() {
            info!(category = %request.category, "detached payment view");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(category: &str) -> ViewRequest {
        ViewRequest::new("tok_client", CategoryId::from(category), "kpFashionStore://")
    }

    #[tokio::test]
    async fn test_present_replaces_mounted_view() {
        let surface = HeadlessSurface::new();

        surface.present(&request("klarna_pay_later")).await.unwrap();
        surface.present(&request("klarna_pay_now")).await.unwrap();

        assert_eq!(
            surface.current_category(),
            Some(CategoryId::from("klarna_pay_now"))
        );
    }

    #[tokio::test]
    async fn test_load_requires_mounted_view() {
        let surface = HeadlessSurface::new();
        assert!(surface.load().await.is_err());

        surface.present(&request("klarna_pay_later")).await.unwrap();
        assert!(surface.load().await.is_ok());
        assert!(surface.reveal().await.is_ok());
    }

    #[tokio::test]
    async fn test_dismiss_clears_view() {
        let surface = HeadlessSurface::new();
        surface.present(&request("klarna_pay_later")).await.unwrap();
        surface.dismiss().await;

        assert!(surface.current_category().is_none());
        // dismiss with nothing mounted is a no-op
        surface.dismiss().await;
    }
}
