//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong. Money
//! fields serialise as JSON numbers.

#![expect(
    dead_code,
    reason = "Schema mirrors are used only for OpenAPI generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed, fails validation, or breaks a business rule.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A dependency is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// `error` carries the human-readable message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Human-readable message.
    #[schema(example = "product not found")]
    error: String,
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Supplementary details, such as the offending field.
    details: Option<serde_json::Value>,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
}

/// OpenAPI schema for [`crate::domain::EbayStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::EbayStatus)]
pub enum EbayStatusSchema {
    #[schema(rename = "not_listed")]
    NotListed,
    #[schema(rename = "ready_to_list")]
    ReadyToList,
    #[schema(rename = "listed")]
    Listed,
    #[schema(rename = "sold_on_ebay")]
    SoldOnEbay,
}

/// OpenAPI schema for [`crate::domain::RefurbStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RefurbStatus)]
pub enum RefurbStatusSchema {
    #[schema(rename = "strip")]
    Strip,
    #[schema(rename = "refurb")]
    Refurb,
    #[schema(rename = "scrap")]
    Scrap,
    #[schema(rename = "complete")]
    Complete,
    #[schema(rename = "stripped")]
    Stripped,
    #[schema(rename = "scrapped")]
    Scrapped,
}

/// OpenAPI schema for [`crate::domain::PartsStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PartsStatus)]
pub enum PartsStatusSchema {
    #[schema(rename = "none")]
    None,
    #[schema(rename = "needs_parts")]
    NeedsParts,
    #[schema(rename = "awaiting_parts")]
    AwaitingParts,
    #[schema(rename = "has_parts")]
    HasParts,
}

/// OpenAPI schema for [`crate::domain::Product`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Product)]
pub struct ProductSchema {
    id: i32,
    #[schema(example = "L0042")]
    sku: String,
    #[schema(example = "5012345678900")]
    code: Option<String>,
    #[schema(example = "ThinkPad T480")]
    name: String,
    notes: Option<String>,
    on_ebay: bool,
    ebay_status: EbayStatusSchema,
    ebay_notes: Option<String>,
    #[schema(example = 120.0)]
    cost: f64,
    #[schema(example = 249.99)]
    retail: f64,
    fees: f64,
    postage: f64,
    quantity: i32,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Sale`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Sale)]
pub struct SaleSchema {
    id: i32,
    product_id: Option<i32>,
    sku: String,
    quantity: i32,
    unit_cost: f64,
    unit_retail: f64,
    fees: f64,
    postage: f64,
    #[schema(example = "manual")]
    channel: String,
    order_ref: Option<String>,
    note: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::EbayUpdate`].
#[derive(ToSchema)]
#[schema(as = crate::domain::EbayUpdate)]
pub struct EbayUpdateSchema {
    id: i32,
    sku: String,
    code: Option<String>,
    delta: i32,
    old_qty: i32,
    new_qty: i32,
    #[schema(example = "smart-add")]
    note: Option<String>,
    done: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::RefurbItem`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RefurbItem)]
pub struct RefurbItemSchema {
    id: i32,
    sku: Option<String>,
    serial: Option<String>,
    description: String,
    status: RefurbStatusSchema,
    parts_status: PartsStatusSchema,
    supplier: Option<String>,
    #[schema(example = "laptop")]
    category: String,
    cpu: Option<String>,
    colour: Option<String>,
    storage: Option<String>,
    controller: Option<String>,
    cost: f64,
    retail: f64,
    notes: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::RefurbDetail`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RefurbDetail)]
pub struct RefurbDetailSchema {
    refurb_id: i32,
    specs_cpu: Option<String>,
    specs_ram: Option<String>,
    specs_storage: Option<String>,
    specs_gpu: Option<String>,
    specs_screen: Option<String>,
    os_version: Option<String>,
    specs_colour: Option<String>,
    specs_network: Option<String>,
    specs_condition: Option<String>,
    specs_firmware: Option<String>,
    specs_region: Option<String>,
    specs_bundle: Option<String>,
    parts_needed: Option<String>,
    parts_cost: f64,
    /// Free-form checklist object.
    #[schema(value_type = Object)]
    checklist: serde_json::Value,
    notes: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    updated_at: Option<String>,
}

/// OpenAPI schema for [`crate::domain::Customer`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Customer)]
pub struct CustomerSchema {
    id: i32,
    #[schema(example = "Ada Lovelace")]
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    id_image_path: Option<String>,
    notes: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::TradeIn`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TradeIn)]
pub struct TradeInSchema {
    id: i32,
    customer_id: Option<i32>,
    customer_name: String,
    customer_phone: Option<String>,
    customer_email: Option<String>,
    customer_address: Option<String>,
    serial: Option<String>,
    device_desc: String,
    valuation: Option<f64>,
    agreed_value: Option<f64>,
    id_image_path: Option<String>,
    /// Refurb item created for this trade-in, if any.
    refurb_id: Option<i32>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::StockReportRow`].
#[derive(ToSchema)]
#[schema(as = crate::domain::StockReportRow)]
pub struct StockReportRowSchema {
    id: i32,
    sku: String,
    name: String,
    on_ebay: bool,
    cost: f64,
    retail: f64,
    fees: f64,
    postage: f64,
    quantity: i32,
    value_cost: f64,
    value_retail: f64,
    potential_profit: f64,
}

/// OpenAPI schema for [`crate::domain::StockReportTotals`].
#[derive(ToSchema)]
#[schema(as = crate::domain::StockReportTotals)]
pub struct StockReportTotalsSchema {
    qty_total: i64,
    total_cost_value: f64,
    total_retail_value: f64,
    total_potential_profit: f64,
}

/// OpenAPI schema for [`crate::domain::StockReport`].
#[derive(ToSchema)]
#[schema(as = crate::domain::StockReport)]
pub struct StockReportSchema {
    rows: Vec<StockReportRowSchema>,
    totals: StockReportTotalsSchema,
}

/// OpenAPI schema for [`crate::domain::EbayStatusCount`].
#[derive(ToSchema)]
#[schema(as = crate::domain::EbayStatusCount)]
pub struct EbayStatusCountSchema {
    ebay_status: EbayStatusSchema,
    count: i64,
}
