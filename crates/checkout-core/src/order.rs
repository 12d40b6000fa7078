//! # Order Types
//!
//! The order document POSTed to the session-creation endpoint.
//! Amounts are in minor currency units throughout.

use serde::{Deserialize, Serialize};

/// A line item in an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Optional product image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Line type (e.g., "physical")
    #[serde(rename = "type")]
    pub kind: String,

    /// Merchant article reference
    pub reference: String,

    /// Display name
    pub name: String,

    /// Quantity
    pub quantity: u32,

    /// Unit price in minor units
    pub unit_price: i64,

    /// Tax rate in basis points
    pub tax_rate: i64,

    /// Line total in minor units
    pub total_amount: i64,

    /// Tax portion of the line total
    pub total_tax_amount: i64,
}

impl OrderLine {
    /// Create a physical line item; totals are derived from quantity and unit price.
    pub fn physical(
        reference: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        unit_price: i64,
    ) -> Self {
        Self {
            image_url: None,
            kind: "physical".to_string(),
            reference: reference.into(),
            name: name.into(),
            quantity,
            unit_price,
            tax_rate: 0,
            total_amount: unit_price * quantity as i64,
            total_tax_amount: 0,
        }
    }

    /// Builder: attach a product image URL
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Builder: set the tax rate and tax portion of the total
    pub fn with_tax(mut self, tax_rate: i64, total_tax_amount: i64) -> Self {
        self.tax_rate = tax_rate;
        self.total_tax_amount = total_tax_amount;
        self
    }
}

/// The order document sent when creating a credit session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Purchase country (ISO 3166-1 alpha-2)
    pub purchase_country: String,

    /// Purchase currency (ISO 4217)
    pub purchase_currency: String,

    /// Locale for the payment experience
    pub locale: String,

    /// Order total in minor units
    pub order_amount: i64,

    /// Tax portion of the order total
    pub order_tax_amount: i64,

    /// Line items
    pub order_lines: Vec<OrderLine>,
}

impl OrderPayload {
    /// Create an empty order for the given merchant market
    pub fn new(
        purchase_country: impl Into<String>,
        purchase_currency: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            purchase_country: purchase_country.into(),
            purchase_currency: purchase_currency.into(),
            locale: locale.into(),
            order_amount: 0,
            order_tax_amount: 0,
            order_lines: Vec::new(),
        }
    }

    /// Add a line item, keeping the order totals in sync
    pub fn add_line(&mut self, line: OrderLine) {
        self.order_amount += line.total_amount;
        self.order_tax_amount += line.total_tax_amount;
        self.order_lines.push(line);
    }

    /// Builder: add a line item
    pub fn with_line(mut self, line: OrderLine) -> Self {
        self.add_line(line);
        self
    }

    /// Check if the order has no items
    pub fn is_empty(&self) -> bool {
        self.order_lines.is_empty()
    }

    /// Get item count across all lines
    pub fn item_count(&self) -> u32 {
        self.order_lines.iter().map(|l| l.quantity).sum()
    }

    /// The single-item accessory-bag order used by the demo flow.
    pub fn example(
        purchase_country: impl Into<String>,
        purchase_currency: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        Self::new(purchase_country, purchase_currency, locale).with_line(
            OrderLine::physical(
                "AccessoryBag-Ref-ID-0001",
                "Light Brown Accessory Bag",
                1,
                10000,
            )
            .with_image_url(
                "https://demo.klarna.se/fashion/kp/media/wysiwyg/Accessoriesbagimg.jpg",
            ),
        )
    }
}
