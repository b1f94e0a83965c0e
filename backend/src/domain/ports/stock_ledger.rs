//! Port for atomic stock movements and the sales ledger.
//!
//! Adapters must lock the product, plan the movement with the domain planner
//! and persist the new quantity together with any sale in one unit of work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Product, Sale, SaleDetails, StockTransition};

use super::define_port_error;

define_port_error! {
    /// Errors raised by stock ledger adapters.
    pub enum StockLedgerError {
        /// Repository connection could not be established.
        Connection { message: String } => "stock ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "stock ledger query failed: {message}",
        /// The product disappeared before the movement was applied.
        ProductNotFound { product_id: i32 } => "product {product_id} not found",
        /// A stock-out asked for more than is on hand.
        InsufficientStock { available: i32, requested: i32 } =>
            "insufficient stock: {available} available, {requested} requested",
        /// The planner refused the movement for another reason.
        Rejected { message: String } => "stock movement rejected: {message}",
    }
}

/// A movement to apply to one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockCommand {
    /// Add `quantity` units.
    In { quantity: i32 },
    /// Sell `quantity` units and record the sale.
    Out { quantity: i32, details: SaleDetails },
    /// Replace the on-hand quantity.
    Take { quantity: i32 },
}

/// Result of an applied movement.
#[derive(Debug, Clone, PartialEq)]
pub struct StockOutcome {
    /// The product after the movement.
    pub product: Product,
    /// The transition the planner chose.
    pub transition: StockTransition,
    /// The sale written by a stock-out.
    pub sale: Option<Sale>,
}

/// Applies stock movements and reads the sales ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Apply `command` to `product_id` atomically.
    async fn apply(
        &self,
        product_id: i32,
        command: StockCommand,
    ) -> Result<StockOutcome, StockLedgerError>;

    /// Every sale, newest first.
    async fn list_sales(&self) -> Result<Vec<Sale>, StockLedgerError>;

    /// Sales created in `[start, end)`, oldest first.
    async fn sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sale>, StockLedgerError>;
}
