//! Sales ledger entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Channel recorded when the operator does not name one.
pub const DEFAULT_SALE_CHANNEL: &str = "manual";

/// Immutable record of units leaving stock through a sale.
///
/// Pricing is copied from the product at the moment of sale so later price
/// edits do not rewrite history. `product_id` becomes `None` when the product
/// is deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sale {
    pub id: i32,
    pub product_id: Option<i32>,
    pub sku: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub unit_retail: Decimal,
    pub fees: Decimal,
    pub postage: Decimal,
    pub channel: String,
    pub order_ref: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Operator-supplied context for a stock-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDetails {
    pub channel: String,
    pub order_ref: Option<String>,
    pub note: Option<String>,
}

impl Default for SaleDetails {
    fn default() -> Self {
        Self {
            channel: DEFAULT_SALE_CHANNEL.to_owned(),
            order_ref: None,
            note: None,
        }
    }
}

impl SaleDetails {
    /// Build details, falling back to the manual channel when `channel` is
    /// blank.
    pub fn new(channel: Option<String>, order_ref: Option<String>, note: Option<String>) -> Self {
        let channel = channel
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SALE_CHANNEL.to_owned());
        Self {
            channel,
            order_ref,
            note,
        }
    }
}
