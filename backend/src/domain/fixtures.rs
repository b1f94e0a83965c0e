//! Builders shared by domain and adapter unit tests.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use super::{
    EbayStatus, PartsStatus, Product, RefurbItem, RefurbStatus, Sale, StockTransition,
};
use crate::domain::ports::StockOutcome;

/// A product with round prices: cost 10, retail 25, fees 2, postage 3.
pub(crate) fn product(id: i32, sku: &str, quantity: i32) -> Product {
    Product {
        id,
        sku: sku.to_owned(),
        code: None,
        name: format!("Product {sku}"),
        notes: None,
        on_ebay: false,
        ebay_status: EbayStatus::NotListed,
        ebay_notes: None,
        cost: Decimal::new(10, 0),
        retail: Decimal::new(25, 0),
        fees: Decimal::new(2, 0),
        postage: Decimal::new(3, 0),
        quantity,
        created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
    }
}

/// A refurb item in the given status.
pub(crate) fn refurb_item(id: i32, sku: Option<&str>, status: RefurbStatus) -> RefurbItem {
    RefurbItem {
        id,
        sku: sku.map(str::to_owned),
        serial: Some(format!("SN{id:05}")),
        description: format!("Laptop {id}"),
        status,
        parts_status: PartsStatus::None,
        supplier: None,
        category: "laptop".to_owned(),
        cpu: None,
        colour: None,
        storage: None,
        controller: None,
        cost: Decimal::new(120, 0),
        retail: Decimal::new(300, 0),
        notes: None,
        created_at: Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
    }
}

/// The outcome a ledger reports after moving `product` from `previous`.
pub(crate) fn outcome(mut product: Product, previous: i32, status: Option<EbayStatus>) -> StockOutcome {
    if let Some(status) = status {
        product.ebay_status = status;
    }
    StockOutcome {
        transition: StockTransition {
            previous_quantity: previous,
            new_quantity: product.quantity,
            ebay_status: status,
        },
        product,
        sale: None,
    }
}

/// A sale of `quantity` units of `sku` through `channel`.
pub(crate) fn sale(id: i32, sku: &str, quantity: i32, channel: &str) -> Sale {
    Sale {
        id,
        product_id: Some(1),
        sku: sku.to_owned(),
        quantity,
        unit_cost: Decimal::new(10, 0),
        unit_retail: Decimal::new(25, 0),
        fees: Decimal::new(2, 0),
        postage: Decimal::new(3, 0),
        channel: channel.to_owned(),
        order_ref: None,
        note: None,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}
