//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's driven ports, backed by
//! PostgreSQL through `diesel-async` and a `bb8` connection pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. Business rules stay in the domain services; the one exception is
//!   the stock ledger, which runs the domain's transition planner inside a
//!   row-locked transaction.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Sanitised errors**: Diesel failures are classified once in
//!   `diesel_error_mapping` and surface as port errors that name the
//!   violated constraint, not the SQL.
//!
//! # Example
//!
//! ```ignore
//! use stockroom::outbound::persistence::{DbPool, DieselProductRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/stock")).await?;
//! let products = DieselProductRepository::new(pool);
//! ```

mod diesel_customer_repository;
mod diesel_database_health;
mod diesel_ebay_update_repository;
pub(crate) mod diesel_error_mapping;
mod diesel_export_log_repository;
mod diesel_product_repository;
mod diesel_refurb_repository;
mod diesel_stock_ledger;
mod diesel_trade_in_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_database_health::DieselDatabaseHealth;
pub use diesel_ebay_update_repository::DieselEbayUpdateRepository;
pub use diesel_export_log_repository::DieselExportLogRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_refurb_repository::DieselRefurbRepository;
pub use diesel_stock_ledger::DieselStockLedger;
pub use diesel_trade_in_repository::DieselTradeInRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
