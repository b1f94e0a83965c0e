//! Refurbishment pipeline handlers.
//!
//! ```text
//! GET    /api/refurb[?category=&status=]
//! POST   /api/refurb
//! GET    /api/refurb/next-sku?prefix=P
//! GET    /api/refurb/{id}
//! PUT    /api/refurb/{id}
//! DELETE /api/refurb/{id}
//! GET    /api/refurb/{id}/detail
//! PUT    /api/refurb/{id}/detail
//! ```
//!
//! `next-sku` is registered before `{id}`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    DEFAULT_REFURB_CATEGORY, Error, RefurbDetailDraft, RefurbDraft, RefurbFilter, StockCode,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::products::{DeletedResponse, NextSkuResponse};
use crate::inbound::http::schemas::{ErrorSchema, RefurbDetailSchema, RefurbItemSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, blank_to_none, coerce_money, parse_parts_status, parse_refurb_status,
    require_object, required_text,
};

const STATUS: FieldName = FieldName::new("status");
const PARTS_STATUS: FieldName = FieldName::new("parts_status");
const CHECKLIST: FieldName = FieldName::new("checklist");

/// Create or replace payload.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RefurbRequest {
    #[schema(example = "r0012")]
    pub sku: Option<String>,
    pub serial: Option<String>,
    #[schema(example = "Dell Latitude 7490")]
    pub description: Option<String>,
    #[schema(example = "refurb")]
    pub status: Option<String>,
    #[schema(example = "none")]
    pub parts_status: Option<String>,
    pub supplier: Option<String>,
    #[schema(example = "laptop")]
    pub category: Option<String>,
    pub cpu: Option<String>,
    pub colour: Option<String>,
    pub storage: Option<String>,
    pub controller: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub cost: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub retail: Option<Value>,
    pub notes: Option<String>,
}

fn parse_refurb_request(payload: RefurbRequest) -> Result<RefurbDraft, Error> {
    Ok(RefurbDraft {
        sku: StockCode::parse_optional(payload.sku.as_deref()).map(StockCode::into_inner),
        serial: blank_to_none(payload.serial),
        description: required_text(payload.description, FieldName::new("description"))?,
        status: parse_refurb_status(payload.status, STATUS)?.unwrap_or_default(),
        parts_status: parse_parts_status(payload.parts_status, PARTS_STATUS)?.unwrap_or_default(),
        supplier: blank_to_none(payload.supplier),
        category: blank_to_none(payload.category)
            .unwrap_or_else(|| DEFAULT_REFURB_CATEGORY.to_owned()),
        cpu: blank_to_none(payload.cpu),
        colour: blank_to_none(payload.colour),
        storage: blank_to_none(payload.storage),
        controller: blank_to_none(payload.controller),
        cost: coerce_money(payload.cost.as_ref(), FieldName::new("cost"))?,
        retail: coerce_money(payload.retail.as_ref(), FieldName::new("retail"))?,
        notes: blank_to_none(payload.notes),
    })
}

/// Listing filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RefurbListQuery {
    pub category: Option<String>,
    /// Workflow status, e.g. `refurb` or `complete`.
    pub status: Option<String>,
}

/// List refurb items, newest first.
#[utoipa::path(
    get,
    path = "/api/refurb",
    params(RefurbListQuery),
    responses(
        (status = 200, description = "Refurb items", body = [RefurbItemSchema]),
        (status = 400, description = "Unknown status filter", body = ErrorSchema)
    ),
    tags = ["refurb"],
    operation_id = "listRefurb"
)]
#[get("/refurb")]
pub async fn list_refurb(
    state: web::Data<HttpState>,
    query: web::Query<RefurbListQuery>,
) -> ApiResult<HttpResponse> {
    let RefurbListQuery { category, status } = query.into_inner();
    let filter = RefurbFilter {
        category: blank_to_none(category),
        status: parse_refurb_status(status, STATUS)?,
    };
    let items = state.refurb.list(filter).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Record a device entering the pipeline.
#[utoipa::path(
    post,
    path = "/api/refurb",
    request_body = RefurbRequest,
    responses(
        (status = 201, description = "Created", body = RefurbItemSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema)
    ),
    tags = ["refurb"],
    operation_id = "createRefurb"
)]
#[post("/refurb")]
pub async fn create_refurb(
    state: web::Data<HttpState>,
    payload: web::Json<RefurbRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_refurb_request(payload.into_inner())?;
    let item = state.refurb.create(draft).await?;
    Ok(HttpResponse::Created().json(item))
}

/// SKU allocation query.
#[derive(Debug, Deserialize, IntoParams)]
pub struct RefurbSkuQuery {
    /// One to three letters.
    pub prefix: Option<String>,
}

/// Next free refurb SKU for a prefix.
#[utoipa::path(
    get,
    path = "/api/refurb/next-sku",
    params(RefurbSkuQuery),
    responses(
        (status = 200, description = "Next SKU", body = NextSkuResponse),
        (status = 400, description = "Invalid prefix", body = ErrorSchema)
    ),
    tags = ["refurb"],
    operation_id = "nextRefurbSku"
)]
#[get("/refurb/next-sku")]
pub async fn next_refurb_sku(
    state: web::Data<HttpState>,
    query: web::Query<RefurbSkuQuery>,
) -> ApiResult<HttpResponse> {
    let prefix = query.into_inner().prefix.unwrap_or_default();
    let sku = state.refurb.next_sku(prefix).await?;
    Ok(HttpResponse::Ok().json(NextSkuResponse { sku }))
}

/// Fetch one refurb item.
#[utoipa::path(
    get,
    path = "/api/refurb/{id}",
    params(("id" = i32, Path, description = "Refurb item id")),
    responses(
        (status = 200, description = "Refurb item", body = RefurbItemSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["refurb"],
    operation_id = "getRefurb"
)]
#[get("/refurb/{id}")]
pub async fn get_refurb(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let item = state.refurb.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// Replace a refurb item. Moving it to `complete` stocks the product with the
/// same SKU.
#[utoipa::path(
    put,
    path = "/api/refurb/{id}",
    params(("id" = i32, Path, description = "Refurb item id")),
    request_body = RefurbRequest,
    responses(
        (status = 200, description = "Updated item", body = RefurbItemSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["refurb"],
    operation_id = "replaceRefurb"
)]
#[put("/refurb/{id}")]
pub async fn replace_refurb(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<RefurbRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_refurb_request(payload.into_inner())?;
    let item = state.refurb.replace(path.into_inner(), draft).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// Delete a refurb item and its detail.
#[utoipa::path(
    delete,
    path = "/api/refurb/{id}",
    params(("id" = i32, Path, description = "Refurb item id")),
    responses((status = 200, description = "Whether a row was removed", body = DeletedResponse)),
    tags = ["refurb"],
    operation_id = "deleteRefurb"
)]
#[delete("/refurb/{id}")]
pub async fn delete_refurb(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let deleted = state.refurb.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeletedResponse { deleted }))
}

/// Detail upsert payload.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RefurbDetailRequest {
    pub specs_cpu: Option<String>,
    pub specs_ram: Option<String>,
    pub specs_storage: Option<String>,
    pub specs_gpu: Option<String>,
    pub specs_screen: Option<String>,
    pub os_version: Option<String>,
    pub specs_colour: Option<String>,
    pub specs_network: Option<String>,
    pub specs_condition: Option<String>,
    pub specs_firmware: Option<String>,
    pub specs_region: Option<String>,
    pub specs_bundle: Option<String>,
    pub parts_needed: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub parts_cost: Option<Value>,
    /// Key/value checklist; must be an object when present.
    #[schema(value_type = Option<Object>)]
    pub checklist: Option<Value>,
    pub notes: Option<String>,
}

fn parse_detail_request(payload: RefurbDetailRequest) -> Result<RefurbDetailDraft, Error> {
    Ok(RefurbDetailDraft {
        specs_cpu: blank_to_none(payload.specs_cpu),
        specs_ram: blank_to_none(payload.specs_ram),
        specs_storage: blank_to_none(payload.specs_storage),
        specs_gpu: blank_to_none(payload.specs_gpu),
        specs_screen: blank_to_none(payload.specs_screen),
        os_version: blank_to_none(payload.os_version),
        specs_colour: blank_to_none(payload.specs_colour),
        specs_network: blank_to_none(payload.specs_network),
        specs_condition: blank_to_none(payload.specs_condition),
        specs_firmware: blank_to_none(payload.specs_firmware),
        specs_region: blank_to_none(payload.specs_region),
        specs_bundle: blank_to_none(payload.specs_bundle),
        parts_needed: blank_to_none(payload.parts_needed),
        parts_cost: coerce_money(payload.parts_cost.as_ref(), FieldName::new("parts_cost"))?,
        checklist: require_object(payload.checklist, CHECKLIST)?,
        notes: blank_to_none(payload.notes),
    })
}

/// Stored detail, or an empty one when nothing was saved yet.
#[utoipa::path(
    get,
    path = "/api/refurb/{id}/detail",
    params(("id" = i32, Path, description = "Refurb item id")),
    responses(
        (status = 200, description = "Detail", body = RefurbDetailSchema),
        (status = 404, description = "Refurb item not found", body = ErrorSchema)
    ),
    tags = ["refurb"],
    operation_id = "getRefurbDetail"
)]
#[get("/refurb/{id}/detail")]
pub async fn get_refurb_detail(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let detail = state.refurb.detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Insert or overwrite an item's detail.
#[utoipa::path(
    put,
    path = "/api/refurb/{id}/detail",
    params(("id" = i32, Path, description = "Refurb item id")),
    request_body = RefurbDetailRequest,
    responses(
        (status = 200, description = "Saved detail", body = RefurbDetailSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 404, description = "Refurb item not found", body = ErrorSchema)
    ),
    tags = ["refurb"],
    operation_id = "saveRefurbDetail"
)]
#[put("/refurb/{id}/detail")]
pub async fn save_refurb_detail(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<RefurbDetailRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_detail_request(payload.into_inner())?;
    let detail = state.refurb.save_detail(path.into_inner(), draft).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::refurb_item;
    use crate::domain::{RefurbDetail, RefurbStatus};
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use rust_decimal::Decimal;
    use serde_json::json;

    async fn app(
        ports: MockPorts,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        test::init_service(
            App::new().app_data(ports.into_state()).service(
                web::scope("/api")
                    .service(list_refurb)
                    .service(create_refurb)
                    .service(next_refurb_sku)
                    .service(get_refurb)
                    .service(replace_refurb)
                    .service(delete_refurb)
                    .service(get_refurb_detail)
                    .service(save_refurb_detail),
            ),
        )
        .await
    }

    #[actix_web::test]
    async fn create_normalises_and_defaults() {
        let mut ports = MockPorts::default();
        ports
            .refurb
            .expect_create()
            .withf(|draft| {
                draft.sku.as_deref() == Some("R0012")
                    && draft.description == "Dell 7490"
                    && draft.status == RefurbStatus::Refurb
                    && draft.category == DEFAULT_REFURB_CATEGORY
                    && draft.cost == Decimal::new(80, 0)
                    && draft.serial.is_none()
            })
            .return_once(|_| Ok(refurb_item(1, Some("R0012"), RefurbStatus::Refurb)));
        let app = app(ports).await;

        let req = test::TestRequest::post()
            .uri("/api/refurb")
            .set_json(json!({"sku": " r0012", "description": " Dell 7490 ", "serial": "", "cost": "80"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[rstest]
    #[case(json!({"sku": "R1"}))]
    #[case(json!({"description": "x", "status": "polished"}))]
    #[case(json!({"description": "x", "parts_status": "lost"}))]
    #[actix_web::test]
    async fn create_rejects_invalid_payloads(#[case] payload: Value) {
        let app = app(MockPorts::default()).await;
        let req = test::TestRequest::post()
            .uri("/api/refurb")
            .set_json(payload)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn list_passes_filters() {
        let mut ports = MockPorts::default();
        ports
            .refurb
            .expect_list()
            .withf(|filter| {
                filter.category.as_deref() == Some("desktop")
                    && filter.status == Some(RefurbStatus::Complete)
            })
            .return_once(|_| Ok(Vec::new()));
        let app = app(ports).await;

        let req = test::TestRequest::get()
            .uri("/api/refurb?category=desktop&status=complete")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn next_sku_is_routed_before_the_id() {
        let mut ports = MockPorts::default();
        ports
            .refurb
            .expect_next_sku()
            .withf(|prefix| prefix == "R")
            .return_once(|_| Ok("R0001".to_owned()));
        let app = app(ports).await;

        let req = test::TestRequest::get()
            .uri("/api/refurb/next-sku?prefix=R")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["sku"], "R0001");
    }

    #[actix_web::test]
    async fn detail_returns_empty_checklist() {
        let mut ports = MockPorts::default();
        ports
            .refurb
            .expect_detail()
            .return_once(|id| Ok(RefurbDetail::empty(id)));
        let app = app(ports).await;

        let req = test::TestRequest::get().uri("/api/refurb/3/detail").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["refurb_id"], 3);
        assert_eq!(body["checklist"], json!({}));
    }

    #[rstest]
    #[case(json!({"checklist": ["battery"]}))]
    #[case(json!({"checklist": "ok"}))]
    #[actix_web::test]
    async fn detail_checklist_must_be_an_object(#[case] payload: Value) {
        let app = app(MockPorts::default()).await;
        let req = test::TestRequest::put()
            .uri("/api/refurb/3/detail")
            .set_json(payload)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn detail_is_saved() {
        let mut ports = MockPorts::default();
        ports
            .refurb
            .expect_save_detail()
            .withf(|id, draft| {
                *id == 3
                    && draft.specs_ram.as_deref() == Some("16GB")
                    && draft.checklist.get("battery") == Some(&json!(true))
                    && draft.parts_cost == Decimal::new(15, 0)
            })
            .return_once(|id, draft| Ok(RefurbDetail::from_draft(id, draft, None)));
        let app = app(ports).await;

        let req = test::TestRequest::put()
            .uri("/api/refurb/3/detail")
            .set_json(json!({"specs_ram": "16GB", "parts_cost": 15, "checklist": {"battery": true}}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["checklist"]["battery"], true);
    }

    #[actix_web::test]
    async fn delete_reports_outcome() {
        let mut ports = MockPorts::default();
        ports.refurb.expect_delete().return_once(|_| Ok(true));
        let app = app(ports).await;

        let req = test::TestRequest::delete().uri("/api/refurb/8").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"deleted": true}));
    }
}
