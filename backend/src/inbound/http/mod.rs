//! HTTP inbound adapter exposing the JSON API, CSV exports and the printable
//! cash report.
//!
//! Handlers are grouped by resource. [`configure_api`] registers every JSON
//! endpoint relative to the `/api` scope; [`configure_pages`] registers the
//! HTML pages that live outside it.

pub(crate) mod cash_page;
pub mod customers;
pub mod ebay_updates;
pub mod error;
pub mod exports;
pub mod health;
pub mod products;
pub mod refurb;
pub mod reports;
pub mod schemas;
pub mod state;
pub mod stock;
#[cfg(test)]
pub mod test_utils;
pub mod trade_ins;
pub mod validation;

use actix_web::web;

pub use error::{ApiResult, json_error_handler};

/// Register the JSON API. Mount inside `web::scope("/api")`.
///
/// Literal segments (`next-sku`, `lookup`, `add-smart`) are registered ahead
/// of the `{id}` routes that would otherwise capture them.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(health::health_db)
        .service(health::ready)
        .service(health::live)
        .service(products::list_products)
        .service(products::create_product)
        .service(products::next_product_sku)
        .service(products::lookup_product)
        .service(products::smart_add)
        .service(products::get_product)
        .service(products::replace_product)
        .service(products::patch_product_ebay)
        .service(products::delete_product)
        .service(stock::stock_in)
        .service(stock::stock_out)
        .service(stock::stock_take)
        .service(stock::list_sales)
        .service(ebay_updates::list_ebay_updates)
        .service(ebay_updates::patch_ebay_update)
        .service(refurb::list_refurb)
        .service(refurb::create_refurb)
        .service(refurb::next_refurb_sku)
        .service(refurb::get_refurb)
        .service(refurb::replace_refurb)
        .service(refurb::delete_refurb)
        .service(refurb::get_refurb_detail)
        .service(refurb::save_refurb_detail)
        .service(customers::list_customers)
        .service(customers::create_customer)
        .service(customers::get_customer)
        .service(customers::replace_customer)
        .service(trade_ins::list_trade_ins)
        .service(trade_ins::create_trade_in)
        .service(reports::stock_report)
        .service(reports::ebay_status_report)
        .service(exports::export_products)
        .service(exports::export_refurb)
        .service(exports::last_exports);
}

/// Register the HTML pages served from the site root.
pub fn configure_pages(cfg: &mut web::ServiceConfig) {
    cfg.service(reports::cash_report);
}
