//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the ledger, health probes and the image store)
//! are implemented by outbound adapters. Driving ports are the use cases the
//! HTTP layer consumes; the services in [`crate::domain`] implement them.

mod macros;
pub(crate) use macros::define_port_error;

mod customer_directory;
mod customer_repository;
mod database_health;
mod ebay_queue;
mod ebay_update_repository;
mod export_log_repository;
mod exports;
mod id_image_store;
mod product_catalogue;
mod product_repository;
mod refurb_repository;
mod refurb_workflow;
mod reporting;
mod stock_ledger;
mod stock_operations;
mod trade_in_intake;
mod trade_in_repository;

#[cfg(test)]
pub use customer_directory::MockCustomerDirectory;
pub use customer_directory::CustomerDirectory;
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::{CustomerRepository, CustomerRepositoryError};
#[cfg(test)]
pub use database_health::MockDatabaseHealth;
pub use database_health::{DatabaseHealth, DatabaseHealthError};
#[cfg(test)]
pub use ebay_queue::MockEbayQueue;
pub use ebay_queue::EbayQueue;
#[cfg(test)]
pub use ebay_update_repository::MockEbayUpdateRepository;
pub use ebay_update_repository::{EbayUpdateRepository, EbayUpdateRepositoryError};
#[cfg(test)]
pub use export_log_repository::MockExportLogRepository;
pub use export_log_repository::{ExportLogRepository, ExportLogRepositoryError};
#[cfg(test)]
pub use exports::MockExports;
pub use exports::Exports;
#[cfg(test)]
pub use id_image_store::MockIdImageStore;
pub use id_image_store::{IdImageStore, IdImageStoreError};
#[cfg(test)]
pub use product_catalogue::MockProductCatalogue;
pub use product_catalogue::ProductCatalogue;
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductRepository, ProductRepositoryError};
#[cfg(test)]
pub use refurb_repository::MockRefurbRepository;
pub use refurb_repository::{RefurbReplacement, RefurbRepository, RefurbRepositoryError};
#[cfg(test)]
pub use refurb_workflow::MockRefurbWorkflow;
pub use refurb_workflow::RefurbWorkflow;
#[cfg(test)]
pub use reporting::MockReporting;
pub use reporting::Reporting;
#[cfg(test)]
pub use stock_ledger::MockStockLedger;
pub use stock_ledger::{StockCommand, StockLedger, StockLedgerError, StockOutcome};
#[cfg(test)]
pub use stock_operations::MockStockOperations;
pub use stock_operations::{SmartAddOutcome, SmartAddRequest, StockOperations};
#[cfg(test)]
pub use trade_in_intake::MockTradeInIntake;
pub use trade_in_intake::TradeInIntake;
#[cfg(test)]
pub use trade_in_repository::MockTradeInRepository;
pub use trade_in_repository::{TradeInRepository, TradeInRepositoryError};
