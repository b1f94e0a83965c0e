//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler annotated with `#[utoipa::path]` and the
//! schema mirrors in [`crate::inbound::http::schemas`], so domain types stay
//! free of utoipa derives. The document is served by Swagger UI in debug
//! builds and printed by `cargo run --bin openapi-dump`.

use crate::inbound::http::customers::CustomerRequest;
use crate::inbound::http::ebay_updates::EbayUpdatePatch;
use crate::inbound::http::products::{
    DeletedResponse, EbayPatchRequest, NextSkuResponse, ProductRequest, SmartAddAction,
    SmartAddPayload, SmartAddResponse,
};
use crate::inbound::http::refurb::{RefurbDetailRequest, RefurbRequest};
use crate::inbound::http::schemas::{
    CustomerSchema, EbayStatusCountSchema, EbayStatusSchema, EbayUpdateSchema, ErrorCodeSchema,
    ErrorSchema, PartsStatusSchema, ProductSchema, RefurbDetailSchema, RefurbItemSchema,
    RefurbStatusSchema, SaleSchema, StockReportRowSchema, StockReportSchema,
    StockReportTotalsSchema, TradeInSchema,
};
use crate::inbound::http::stock::StockMoveRequest;
use crate::inbound::http::trade_ins::TradeInForm;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the HTTP Basic security scheme.
pub const BASIC_AUTH_SCHEME: &str = "BasicAuth";

/// Enrich the generated document with the HTTP Basic security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut basic = Http::new(HttpAuthScheme::Basic);
        basic.description = Some("Shared shop credential; health probes are exempt.".to_owned());
        components.add_security_scheme(BASIC_AUTH_SCHEME, SecurityScheme::Http(basic));
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Stockroom API",
        description = "Stock movements, refurbishment, trade-ins, reports and backups for a small shop."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BasicAuth" = [])),
    paths(
        crate::inbound::http::health::health,
        crate::inbound::http::health::health_db,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::next_product_sku,
        crate::inbound::http::products::lookup_product,
        crate::inbound::http::products::smart_add,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::replace_product,
        crate::inbound::http::products::patch_product_ebay,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::stock::stock_in,
        crate::inbound::http::stock::stock_out,
        crate::inbound::http::stock::stock_take,
        crate::inbound::http::stock::list_sales,
        crate::inbound::http::ebay_updates::list_ebay_updates,
        crate::inbound::http::ebay_updates::patch_ebay_update,
        crate::inbound::http::refurb::list_refurb,
        crate::inbound::http::refurb::create_refurb,
        crate::inbound::http::refurb::next_refurb_sku,
        crate::inbound::http::refurb::get_refurb,
        crate::inbound::http::refurb::replace_refurb,
        crate::inbound::http::refurb::delete_refurb,
        crate::inbound::http::refurb::get_refurb_detail,
        crate::inbound::http::refurb::save_refurb_detail,
        crate::inbound::http::customers::list_customers,
        crate::inbound::http::customers::create_customer,
        crate::inbound::http::customers::get_customer,
        crate::inbound::http::customers::replace_customer,
        crate::inbound::http::trade_ins::list_trade_ins,
        crate::inbound::http::trade_ins::create_trade_in,
        crate::inbound::http::reports::stock_report,
        crate::inbound::http::reports::ebay_status_report,
        crate::inbound::http::reports::cash_report,
        crate::inbound::http::exports::export_products,
        crate::inbound::http::exports::export_refurb,
        crate::inbound::http::exports::last_exports,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ProductSchema,
        SaleSchema,
        EbayUpdateSchema,
        EbayStatusSchema,
        RefurbItemSchema,
        RefurbDetailSchema,
        RefurbStatusSchema,
        PartsStatusSchema,
        CustomerSchema,
        TradeInSchema,
        StockReportSchema,
        StockReportRowSchema,
        StockReportTotalsSchema,
        EbayStatusCountSchema,
        ProductRequest,
        EbayPatchRequest,
        SmartAddPayload,
        SmartAddAction,
        SmartAddResponse,
        NextSkuResponse,
        DeletedResponse,
        StockMoveRequest,
        EbayUpdatePatch,
        RefurbRequest,
        RefurbDetailRequest,
        CustomerRequest,
        TradeInForm,
    )),
    tags(
        (name = "health", description = "Liveness, readiness and database probes"),
        (name = "products", description = "Product catalogue and scanning"),
        (name = "stock", description = "Stock in, sales and stock takes"),
        (name = "ebay", description = "eBay listing bookkeeping"),
        (name = "refurb", description = "Refurbishment tracking"),
        (name = "customers", description = "Customer directory"),
        (name = "trade-ins", description = "Trade-in intake"),
        (name = "reports", description = "Valuation and cash reconciliation"),
        (name = "exports", description = "CSV backups")
    )
)]
pub struct ApiDoc;
