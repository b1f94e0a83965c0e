//! Driving port for quantity changes, smart-add and the sales ledger.

use async_trait::async_trait;

use crate::domain::{Error, Product, Sale, SaleDetails, StockCode, UnitPricing};

/// Scan-driven intake: restock a known product or create a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartAddRequest {
    /// Scanned code or SKU.
    pub code: StockCode,
    /// SKU prefix used when a new product must be created.
    pub category: Option<String>,
    /// Units arriving. Must be positive.
    pub quantity: i32,
    /// Name for a new product.
    pub name: Option<String>,
    /// Notes for a new product.
    pub notes: Option<String>,
    /// Pricing for a new product.
    pub pricing: UnitPricing,
    /// Product chosen by the operator after an ambiguous match.
    pub pick_id: Option<i32>,
}

/// What smart-add did.
#[derive(Debug, Clone, PartialEq)]
pub enum SmartAddOutcome {
    /// An existing product was restocked.
    StockedIn {
        product: Product,
        ebay_update_queued: bool,
    },
    /// A new product was created.
    Created { product: Product },
    /// Several products share the code; the caller must choose one.
    NeedsPick { candidates: Vec<Product> },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockOperations: Send + Sync {
    /// Add `quantity` units to the product resolved from `code`.
    async fn stock_in(&self, code: StockCode, quantity: i32) -> Result<Product, Error>;

    /// Sell `quantity` units and record the sale.
    ///
    /// # Errors
    /// `invalid_request` with "insufficient stock" when fewer units are on
    /// hand; nothing is written in that case.
    async fn stock_out(
        &self,
        code: StockCode,
        quantity: i32,
        details: SaleDetails,
    ) -> Result<Product, Error>;

    /// Replace the on-hand quantity with a counted value.
    async fn stock_take(&self, code: StockCode, quantity: i32) -> Result<Product, Error>;

    /// Restock by scan, creating the product when the code is new.
    async fn smart_add(&self, request: SmartAddRequest) -> Result<SmartAddOutcome, Error>;

    /// Every sale, newest first.
    async fn list_sales(&self) -> Result<Vec<Sale>, Error>;
}
