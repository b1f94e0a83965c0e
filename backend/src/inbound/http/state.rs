//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CustomerDirectory, DatabaseHealth, EbayQueue, Exports, ProductCatalogue, RefurbWorkflow,
    Reporting, StockOperations, TradeInIntake,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalogue: Arc<dyn ProductCatalogue>,
    pub stock: Arc<dyn StockOperations>,
    pub ebay_queue: Arc<dyn EbayQueue>,
    pub refurb: Arc<dyn RefurbWorkflow>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub trade_ins: Arc<dyn TradeInIntake>,
    pub reporting: Arc<dyn Reporting>,
    pub exports: Arc<dyn Exports>,
    pub db_health: Arc<dyn DatabaseHealth>,
}
