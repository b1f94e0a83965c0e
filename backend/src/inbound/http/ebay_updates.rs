//! eBay update queue handlers.
//!
//! ```text
//! GET   /api/ebay-updates[?done=true]
//! PATCH /api/ebay-updates/{id}
//! ```

use actix_web::{HttpResponse, get, patch, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{EbayUpdateSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, coerce_flag, is_truthy_text, missing_field_error};

/// Queue listing filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EbayUpdateQuery {
    /// `true` for handled entries; pending entries otherwise.
    pub done: Option<String>,
}

/// List queued listing changes, newest first.
#[utoipa::path(
    get,
    path = "/api/ebay-updates",
    params(EbayUpdateQuery),
    responses((status = 200, description = "Queue entries", body = [EbayUpdateSchema])),
    tags = ["ebay"],
    operation_id = "listEbayUpdates"
)]
#[get("/ebay-updates")]
pub async fn list_ebay_updates(
    state: web::Data<HttpState>,
    query: web::Query<EbayUpdateQuery>,
) -> ApiResult<HttpResponse> {
    let done = query.done.as_deref().is_some_and(is_truthy_text);
    let updates = state.ebay_queue.list(done).await?;
    Ok(HttpResponse::Ok().json(updates))
}

/// Toggle body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct EbayUpdatePatch {
    #[schema(value_type = bool)]
    pub done: Option<Value>,
}

/// Mark a queue entry handled, or pending again.
#[utoipa::path(
    patch,
    path = "/api/ebay-updates/{id}",
    params(("id" = i32, Path, description = "Queue entry id")),
    request_body = EbayUpdatePatch,
    responses(
        (status = 200, description = "Updated entry", body = EbayUpdateSchema),
        (status = 400, description = "Missing done flag", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ebay"],
    operation_id = "patchEbayUpdate"
)]
#[patch("/ebay-updates/{id}")]
pub async fn patch_ebay_update(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<EbayUpdatePatch>,
) -> ApiResult<HttpResponse> {
    let Some(done) = payload.into_inner().done.filter(|v| !v.is_null()) else {
        return Err(missing_field_error(FieldName::new("done")));
    };
    let update = state
        .ebay_queue
        .set_done(path.into_inner(), coerce_flag(Some(&done)))
        .await?;
    Ok(HttpResponse::Ok().json(update))
}
