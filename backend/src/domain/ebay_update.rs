//! Queue of quantity changes awaiting manual mirroring on eBay listings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Product, StockTransition};

/// A queued listing change. Only `done` is ever updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EbayUpdate {
    pub id: i32,
    pub sku: String,
    pub code: Option<String>,
    pub delta: i32,
    pub old_qty: i32,
    pub new_qty: i32,
    pub note: Option<String>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// Values for a new queue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEbayUpdate {
    pub sku: String,
    pub code: Option<String>,
    pub delta: i32,
    pub old_qty: i32,
    pub new_qty: i32,
    pub note: Option<String>,
}

impl NewEbayUpdate {
    /// Describe a stock movement already applied to `product`.
    pub fn for_transition(product: &Product, transition: &StockTransition, note: &str) -> Self {
        Self {
            sku: product.sku.clone(),
            code: product.code.clone(),
            delta: transition.delta(),
            old_qty: transition.previous_quantity,
            new_qty: transition.new_quantity,
            note: Some(note.to_owned()),
        }
    }
}
