//! Driving port for read-only reports.

use async_trait::async_trait;

use crate::domain::{CashReport, DateRange, EbayStatusCount, Error, StockReport};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Reporting: Send + Sync {
    /// Valuation of current stock.
    async fn stock_report(&self) -> Result<StockReport, Error>;

    /// Sales reconciliation for a date range.
    async fn cash_report(&self, range: DateRange) -> Result<CashReport, Error>;

    /// Product counts per eBay status.
    async fn ebay_status_counts(&self) -> Result<Vec<EbayStatusCount>, Error>;
}
