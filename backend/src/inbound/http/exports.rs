//! CSV backup downloads.
//!
//! ```text
//! GET /api/exports/products.csv
//! GET /api/exports/refurb.csv
//! GET /api/exports/last
//! ```
//!
//! Each download stamps its key in the export log so the UI can show when the
//! last backup was taken.

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::{Error, Product, RefurbDetail, RefurbExportRow};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const PRODUCT_COLUMNS: [&str; 12] = [
    "id", "sku", "code", "name", "notes", "on_ebay", "cost", "retail", "fees", "postage",
    "quantity", "created_at",
];

const REFURB_COLUMNS: [&str; 27] = [
    "id",
    "sku",
    "serial",
    "description",
    "status",
    "parts_status",
    "supplier",
    "category",
    "cpu",
    "colour",
    "storage",
    "controller",
    "cost",
    "retail",
    "notes",
    "created_at",
    "specs_cpu",
    "specs_ram",
    "specs_storage",
    "specs_gpu",
    "specs_screen",
    "os_version",
    "parts_needed",
    "parts_cost",
    "checklist",
    "detail_notes",
    "detail_updated_at",
];

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

fn money(value: Decimal) -> String {
    value.normalize().to_string()
}

fn product_record(product: &Product) -> [String; 12] {
    [
        product.id.to_string(),
        product.sku.clone(),
        text(product.code.as_deref()),
        product.name.clone(),
        text(product.notes.as_deref()),
        product.on_ebay.to_string(),
        money(product.cost),
        money(product.retail),
        money(product.fees),
        money(product.postage),
        product.quantity.to_string(),
        timestamp(product.created_at),
    ]
}

fn detail_text(
    detail: Option<&RefurbDetail>,
    pick: impl Fn(&RefurbDetail) -> Option<&String>,
) -> String {
    text(detail.and_then(pick).map(String::as_str))
}

fn refurb_record(row: &RefurbExportRow) -> Result<[String; 27], Error> {
    let item = &row.item;
    let detail = row.detail.as_ref();
    let checklist = match detail.map(|d| &d.checklist) {
        Some(value @ Value::Object(_)) => serde_json::to_string(value)
            .map_err(|err| Error::internal(format!("failed to encode checklist: {err}")))?,
        _ => String::new(),
    };
    Ok([
        item.id.to_string(),
        text(item.sku.as_deref()),
        text(item.serial.as_deref()),
        item.description.clone(),
        item.status.to_string(),
        item.parts_status.to_string(),
        text(item.supplier.as_deref()),
        item.category.clone(),
        text(item.cpu.as_deref()),
        text(item.colour.as_deref()),
        text(item.storage.as_deref()),
        text(item.controller.as_deref()),
        money(item.cost),
        money(item.retail),
        text(item.notes.as_deref()),
        timestamp(item.created_at),
        detail_text(detail, |d| d.specs_cpu.as_ref()),
        detail_text(detail, |d| d.specs_ram.as_ref()),
        detail_text(detail, |d| d.specs_storage.as_ref()),
        detail_text(detail, |d| d.specs_gpu.as_ref()),
        detail_text(detail, |d| d.specs_screen.as_ref()),
        detail_text(detail, |d| d.os_version.as_ref()),
        detail_text(detail, |d| d.parts_needed.as_ref()),
        detail.map(|d| money(d.parts_cost)).unwrap_or_default(),
        checklist,
        detail_text(detail, |d| d.notes.as_ref()),
        detail
            .and_then(|d| d.updated_at)
            .map(timestamp)
            .unwrap_or_default(),
    ])
}

fn csv_error(err: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to write csv: {err}"))
}

/// Serialise `header` then `records` as RFC 4180 CSV.
pub(crate) fn to_csv<const N: usize>(
    header: [&str; N],
    records: impl IntoIterator<Item = [String; N]>,
) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header).map_err(csv_error)?;
    for record in records {
        writer.write_record(&record).map_err(csv_error)?;
    }
    writer.into_inner().map_err(csv_error)
}

fn csv_response(file_name: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name.to_owned())],
        })
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(body)
}

/// Every product as CSV, ordered by id.
#[utoipa::path(
    get,
    path = "/api/exports/products.csv",
    responses(
        (status = 200, description = "Products CSV", content_type = "text/csv", body = String),
        (status = 500, description = "Export failed", body = ErrorSchema)
    ),
    tags = ["exports"],
    operation_id = "exportProducts"
)]
#[get("/exports/products.csv")]
pub async fn export_products(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let products = state.exports.products().await?;
    let body = to_csv(PRODUCT_COLUMNS, products.iter().map(product_record))?;
    Ok(csv_response("products.csv", body))
}

/// Every refurb item joined with its detail, as CSV.
#[utoipa::path(
    get,
    path = "/api/exports/refurb.csv",
    responses(
        (status = 200, description = "Refurb CSV", content_type = "text/csv", body = String),
        (status = 500, description = "Export failed", body = ErrorSchema)
    ),
    tags = ["exports"],
    operation_id = "exportRefurb"
)]
#[get("/exports/refurb.csv")]
pub async fn export_refurb(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let rows = state.exports.refurb().await?;
    let records = rows
        .iter()
        .map(refurb_record)
        .collect::<Result<Vec<_>, _>>()?;
    let body = to_csv(REFURB_COLUMNS, records)?;
    Ok(csv_response("refurb.csv", body))
}

/// Last export time per key.
#[utoipa::path(
    get,
    path = "/api/exports/last",
    responses((status = 200, description = "Map of key to timestamp", body = Object,
        example = json!({"products": "2024-03-09T10:00:00Z"}))),
    tags = ["exports"],
    operation_id = "lastExports"
)]
#[get("/exports/last")]
pub async fn last_exports(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let stamps = state.exports.last_exported().await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(stamps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{product, refurb_item};
    use crate::domain::{RefurbDetailDraft, RefurbStatus};
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::TimeZone;
    use serde_json::{Map, json};
    use std::collections::BTreeMap;

    fn header_value(res: &actix_web::dev::ServiceResponse, name: header::HeaderName) -> String {
        res.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned()
    }

    #[actix_web::test]
    async fn products_csv_has_headers_and_rows() {
        let mut ports = MockPorts::default();
        let mut quoted = product(2, "B0002", 1);
        quoted.name = "Dock, \"USB-C\"".to_owned();
        ports
            .exports
            .expect_products()
            .return_once(move || Ok(vec![product(1, "A0001", 3), quoted]));
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .service(web::scope("/api").service(export_products)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/exports/products.csv")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(header_value(&res, header::CONTENT_TYPE), "text/csv; charset=utf-8");
        assert_eq!(
            header_value(&res, header::CONTENT_DISPOSITION),
            "attachment; filename=\"products.csv\""
        );
        assert_eq!(header_value(&res, header::CACHE_CONTROL), "no-store");

        let body = test::read_body(res).await;
        let csv = std::str::from_utf8(&body).expect("utf-8");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,sku,code,name,notes,on_ebay,cost,retail,fees,postage,quantity,created_at")
        );
        assert_eq!(
            lines.next(),
            Some("1,A0001,,Product A0001,,false,10,25,2,3,3,2024-01-02T03:04:05.000Z")
        );
        assert!(lines.next().is_some_and(|l| l.contains("\"Dock, \"\"USB-C\"\"\"")));
    }

    #[actix_web::test]
    async fn refurb_csv_serialises_checklist_as_json() {
        let mut ports = MockPorts::default();
        let mut checklist = Map::new();
        checklist.insert("battery".to_owned(), json!(true));
        let detail = RefurbDetail::from_draft(
            1,
            RefurbDetailDraft {
                specs_ram: Some("8GB".to_owned()),
                checklist,
                ..RefurbDetailDraft::default()
            },
            Some(Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).single().expect("time")),
        );
        ports.exports.expect_refurb().return_once(move || {
            Ok(vec![
                RefurbExportRow {
                    item: refurb_item(1, Some("R0001"), RefurbStatus::Complete),
                    detail: Some(detail),
                },
                RefurbExportRow {
                    item: refurb_item(2, None, RefurbStatus::Refurb),
                    detail: None,
                },
            ])
        });
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .service(web::scope("/api").service(export_refurb)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/exports/refurb.csv")
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let csv = std::str::from_utf8(&body).expect("utf-8");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.first().is_some_and(|l| l.ends_with("checklist,detail_notes,detail_updated_at")));
        assert!(lines.get(1).is_some_and(|l| l.contains("\"{\"\"battery\"\":true}\"")));
        assert!(lines.get(1).is_some_and(|l| l.contains(",8GB,")));
        assert!(lines.get(2).is_some_and(|l| l.ends_with(",,,,,,,,,,,")));
    }

    #[actix_web::test]
    async fn last_exports_is_a_key_map() {
        let mut ports = MockPorts::default();
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).single().expect("time");
        ports
            .exports
            .expect_last_exported()
            .return_once(move || Ok(BTreeMap::from([("products".to_owned(), at)])));
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .service(web::scope("/api").service(last_exports)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/exports/last").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"products": "2024-03-09T10:00:00Z"}));
    }
}
