//! Report handlers.
//!
//! ```text
//! GET /api/reports/stock
//! GET /api/reports/ebay-status
//! GET /report/cash?from=YYYY-MM-DD&to=YYYY-MM-DD   (HTML, outside /api)
//! ```

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{DateRange, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cash_page::render_cash_report;
use crate::inbound::http::schemas::{EbayStatusCountSchema, ErrorSchema, StockReportSchema};
use crate::inbound::http::state::HttpState;

/// Stock valuation at cost and retail.
#[utoipa::path(
    get,
    path = "/api/reports/stock",
    responses((status = 200, description = "Valuation rows and totals", body = StockReportSchema)),
    tags = ["reports"],
    operation_id = "stockReport"
)]
#[get("/reports/stock")]
pub async fn stock_report(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let report = state.reporting.stock_report().await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Product counts per eBay status.
#[utoipa::path(
    get,
    path = "/api/reports/ebay-status",
    responses((status = 200, description = "Counts by status", body = [EbayStatusCountSchema])),
    tags = ["reports"],
    operation_id = "ebayStatusReport"
)]
#[get("/reports/ebay-status")]
pub async fn ebay_status_report(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let counts = state.reporting.ebay_status_counts().await?;
    Ok(HttpResponse::Ok().json(counts))
}

/// Reconciliation range. Both ends are inclusive UTC days.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CashReportQuery {
    /// First day; today when omitted.
    pub from: Option<String>,
    /// Last day; `from` when omitted.
    pub to: Option<String>,
}

/// Printable cash reconciliation grouped by sales channel.
#[utoipa::path(
    get,
    path = "/report/cash",
    params(CashReportQuery),
    responses(
        (status = 200, description = "Printable report", content_type = "text/html", body = String),
        (status = 400, description = "Malformed or reversed range", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "cashReport"
)]
#[get("/report/cash")]
pub async fn cash_report(
    state: web::Data<HttpState>,
    query: web::Query<CashReportQuery>,
) -> ApiResult<HttpResponse> {
    let CashReportQuery { from, to } = query.into_inner();
    let now = Utc::now();
    let range = DateRange::parse(from.as_deref(), to.as_deref(), now.date_naive())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let report = state.reporting.cash_report(range).await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(render_cash_report(&report, now)))
}
