//! Domain primitives, rules and services.
//!
//! Purpose: define the inventory, refurbishment and trade-in model used by
//! the API and persistence layers, the pure rules that govern stock
//! movements and SKU allocation, and the services that implement the driving
//! ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Product, Sale, EbayUpdate, RefurbItem, Customer, TradeIn: entities.
//! - plan_stock_in / plan_stock_out / plan_stock_take: the stock planner.
//! - allocate_next_sku: per-prefix SKU allocation.
//! - *Service types: driving port implementations.

pub mod error;
pub mod ports;

mod customer;
mod customer_service;
mod ebay_queue_service;
mod ebay_update;
mod export;
mod inventory_service;
mod product;
mod refurb;
mod refurb_service;
mod report;
mod reporting_service;
mod sale;
mod sku;
mod stock;
mod trace_id;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::customer::{
    Customer, CustomerDraft, IdImageUpload, NewTradeIn, TradeIn, TradeInContact,
    TradeInIntakeRequest,
};
pub use self::customer_service::{CustomerService, TRADE_IN_SUPPLIER, TradeInService};
pub use self::ebay_queue_service::EbayQueueService;
pub use self::ebay_update::{EbayUpdate, NewEbayUpdate};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::export::{ExportKey, ExportStamp, RefurbExportRow};
pub use self::inventory_service::{InventoryService, SMART_ADD_NOTE};
pub use self::product::{
    BlankStockCode, EbayStatus, EbayStatusCount, EbayStatusPatch, Product, ProductDraft,
    ProductFilter, StockCode, UnitPricing, UnknownEbayStatus,
};
pub use self::refurb::{
    DEFAULT_REFURB_CATEGORY, PartsStatus, RefurbDetail, RefurbDetailDraft, RefurbDraft,
    RefurbFilter, RefurbItem, RefurbStatus, UnknownStatus,
};
pub use self::refurb_service::RefurbService;
pub use self::report::{
    CashFigures, CashLine, CashReport, ChannelSummary, DateRange, DateRangeError, StockReport,
    StockReportRow, StockReportTotals, build_cash_report, build_stock_report,
};
pub use self::reporting_service::{ExportService, ReportingService};
pub use self::sale::{DEFAULT_SALE_CHANNEL, Sale, SaleDetails};
pub use self::sku::{SKU_DIGITS, SkuError, SkuPrefix, SuffixShape, allocate_next_sku};
pub use self::stock::{
    StockTransition, StockTransitionError, plan_stock_in, plan_stock_out, plan_stock_take,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use stockroom::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("product not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
