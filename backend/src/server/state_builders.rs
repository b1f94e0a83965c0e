//! Builders wiring Diesel adapters into the domain services behind
//! [`HttpState`].

use std::sync::Arc;

use actix_web::web;

use stockroom::domain::{
    CustomerService, EbayQueueService, ExportService, InventoryService, RefurbService,
    ReportingService, TradeInService,
};
use stockroom::inbound::http::state::HttpState;
use stockroom::outbound::persistence::{
    DieselCustomerRepository, DieselDatabaseHealth, DieselEbayUpdateRepository,
    DieselExportLogRepository, DieselProductRepository, DieselRefurbRepository, DieselStockLedger,
    DieselTradeInRepository,
};
use stockroom::outbound::storage::CapStdIdImageStore;

use super::ServerConfig;

/// Build the handler state from the configured pool and upload directory.
///
/// Adapters are shared between services so every use case sees the same
/// pool.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let pool = &config.db_pool;
    let products = Arc::new(DieselProductRepository::new(pool.clone()));
    let ledger = Arc::new(DieselStockLedger::new(pool.clone()));
    let ebay_updates = Arc::new(DieselEbayUpdateRepository::new(pool.clone()));
    let refurbs = Arc::new(DieselRefurbRepository::new(pool.clone()));
    let customers = Arc::new(DieselCustomerRepository::new(pool.clone()));
    let trade_ins = Arc::new(DieselTradeInRepository::new(pool.clone()));
    let export_log = Arc::new(DieselExportLogRepository::new(pool.clone()));
    let images = Arc::new(CapStdIdImageStore::new(config.upload_dir.clone()));

    let inventory = Arc::new(InventoryService::new(
        products.clone(),
        ledger.clone(),
        ebay_updates.clone(),
    ));

    web::Data::new(HttpState {
        catalogue: inventory.clone(),
        stock: inventory,
        ebay_queue: Arc::new(EbayQueueService::new(ebay_updates)),
        refurb: Arc::new(RefurbService::new(
            refurbs.clone(),
            products.clone(),
            ledger.clone(),
        )),
        customers: Arc::new(CustomerService::new(customers.clone())),
        trade_ins: Arc::new(TradeInService::new(
            trade_ins,
            customers,
            refurbs.clone(),
            images,
        )),
        reporting: Arc::new(ReportingService::new(products.clone(), ledger)),
        exports: Arc::new(ExportService::new(products, refurbs, export_log)),
        db_health: Arc::new(DieselDatabaseHealth::new(pool.clone())),
    })
}
