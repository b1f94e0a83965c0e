//! Product catalogue HTTP handlers.
//!
//! ```text
//! GET    /api/products[?ebay_status=]
//! POST   /api/products
//! GET    /api/products/next-sku?category=P
//! GET    /api/products/lookup/{code}
//! POST   /api/products/add-smart
//! GET    /api/products/{id}
//! PUT    /api/products/{id}
//! PATCH  /api/products/{id}/ebay
//! DELETE /api/products/{id}
//! ```
//!
//! Register the literal paths before `/products/{id}` so they are not
//! captured by the id matcher.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{SmartAddOutcome, SmartAddRequest};
use crate::domain::{
    EbayStatusPatch, Error, Product, ProductDraft, ProductFilter, StockCode, UnitPricing,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ProductSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, QTY, blank_to_none, coerce_flag, coerce_money, coerce_quantity, parse_ebay_status,
    require_at_least, scanned_code,
};

const EBAY_STATUS: FieldName = FieldName::new("ebay_status");
const QUANTITY: FieldName = FieldName::new("quantity");

/// Create or replace payload. Numeric fields accept numbers or numeric
/// strings; `on_ebay` (or `onEbay`) accepts the usual truthy spellings.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ProductRequest {
    #[schema(example = "l0042")]
    pub sku: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub notes: Option<String>,
    #[serde(alias = "onEbay")]
    #[schema(value_type = Option<bool>)]
    pub on_ebay: Option<Value>,
    pub ebay_status: Option<String>,
    pub ebay_notes: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub cost: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub retail: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub fees: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub postage: Option<Value>,
    #[schema(value_type = Option<i32>)]
    pub quantity: Option<Value>,
}

pub(crate) fn parse_pricing(
    cost: Option<&Value>,
    retail: Option<&Value>,
    fees: Option<&Value>,
    postage: Option<&Value>,
) -> Result<UnitPricing, Error> {
    Ok(UnitPricing {
        cost: coerce_money(cost, FieldName::new("cost"))?,
        retail: coerce_money(retail, FieldName::new("retail"))?,
        fees: coerce_money(fees, FieldName::new("fees"))?,
        postage: coerce_money(postage, FieldName::new("postage"))?,
    })
}

fn parse_product_request(payload: ProductRequest) -> Result<ProductDraft, Error> {
    let sku = payload
        .sku
        .as_deref()
        .and_then(|raw| StockCode::parse(raw).ok());
    let name = blank_to_none(payload.name);
    let (Some(sku), Some(name)) = (sku, name) else {
        return Err(
            Error::invalid_request("sku and name are required").with_details(json!({
                "fields": ["sku", "name"],
                "code": "missing_field",
            })),
        );
    };

    let quantity = coerce_quantity(payload.quantity.as_ref(), QUANTITY, Some(0))?;
    Ok(ProductDraft {
        sku,
        code: StockCode::parse_optional(payload.code.as_deref()),
        name,
        notes: blank_to_none(payload.notes),
        on_ebay: coerce_flag(payload.on_ebay.as_ref()),
        ebay_status: parse_ebay_status(payload.ebay_status, EBAY_STATUS)?.unwrap_or_default(),
        ebay_notes: blank_to_none(payload.ebay_notes),
        pricing: parse_pricing(
            payload.cost.as_ref(),
            payload.retail.as_ref(),
            payload.fees.as_ref(),
            payload.postage.as_ref(),
        )?,
        quantity: require_at_least(quantity, 0, QUANTITY)?,
    })
}

/// Query parameters for the product list.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// Only products in this eBay status.
    pub ebay_status: Option<String>,
}

/// List products ordered by SKU.
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Products", body = [ProductSchema]),
        (status = 400, description = "Unknown status filter", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    query: web::Query<ProductListQuery>,
) -> ApiResult<HttpResponse> {
    let ebay_status = parse_ebay_status(query.into_inner().ebay_status, EBAY_STATUS)?;
    let products = state.catalogue.list(ProductFilter { ebay_status }).await?;
    Ok(HttpResponse::Ok().json(products))
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Created", body = ProductSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 409, description = "SKU or code already in use", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_product_request(payload.into_inner())?;
    let product = state.catalogue.create(draft).await?;
    Ok(HttpResponse::Created().json(product))
}

/// Query parameters for SKU allocation.
#[derive(Debug, Deserialize, IntoParams)]
pub struct NextSkuQuery {
    /// One to three letters, e.g. `L`.
    pub category: Option<String>,
}

/// SKU allocation result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NextSkuResponse {
    #[schema(example = "L0043")]
    pub sku: String,
}

/// Next free product SKU for a category prefix.
#[utoipa::path(
    get,
    path = "/api/products/next-sku",
    params(NextSkuQuery),
    responses(
        (status = 200, description = "Next SKU", body = NextSkuResponse),
        (status = 400, description = "Invalid prefix", body = ErrorSchema),
        (status = 409, description = "Prefix exhausted", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "nextProductSku"
)]
#[get("/products/next-sku")]
pub async fn next_product_sku(
    state: web::Data<HttpState>,
    query: web::Query<NextSkuQuery>,
) -> ApiResult<HttpResponse> {
    let category = query.into_inner().category.unwrap_or_default();
    let sku = state.catalogue.next_sku(category).await?;
    Ok(HttpResponse::Ok().json(NextSkuResponse { sku }))
}

/// Resolve a scanned code against product codes and SKUs.
#[utoipa::path(
    get,
    path = "/api/products/lookup/{code}",
    params(("code" = String, Path, description = "Scanned code or SKU")),
    responses(
        (status = 200, description = "Matching product", body = ProductSchema),
        (status = 404, description = "No match", body = ErrorSchema),
        (status = 409, description = "Ambiguous code", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "lookupProduct"
)]
#[get("/products/lookup/{code}")]
pub async fn lookup_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let code = scanned_code(Some(path.as_str()), None, None)?;
    let product = state.catalogue.lookup(code).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Scan-driven add: restock a known code or create a product for a new one.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SmartAddPayload {
    pub code: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    /// SKU prefix used when the code is new.
    pub category: Option<String>,
    #[serde(alias = "qty")]
    #[schema(value_type = Option<i32>)]
    pub quantity: Option<Value>,
    pub name: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub cost: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub retail: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub fees: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub postage: Option<Value>,
    /// Candidate chosen after a 409.
    pub pick_id: Option<i32>,
}

/// How a smart-add was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SmartAddAction {
    StockedIn,
    Created,
}

/// Smart-add result.
#[derive(Debug, Serialize, ToSchema)]
pub struct SmartAddResponse {
    pub action: SmartAddAction,
    #[schema(value_type = ProductSchema)]
    pub product: Product,
    pub ebay_update_queued: bool,
}

fn parse_smart_add(payload: SmartAddPayload) -> Result<SmartAddRequest, Error> {
    let code = scanned_code(
        payload.sku.as_deref(),
        payload.code.as_deref(),
        payload.barcode.as_deref(),
    )?;
    let quantity = coerce_quantity(payload.quantity.as_ref(), QTY, Some(1))?;
    Ok(SmartAddRequest {
        code,
        category: blank_to_none(payload.category),
        quantity: require_at_least(quantity, 1, QTY)?,
        name: blank_to_none(payload.name),
        notes: blank_to_none(payload.notes),
        pricing: parse_pricing(
            payload.cost.as_ref(),
            payload.retail.as_ref(),
            payload.fees.as_ref(),
            payload.postage.as_ref(),
        )?,
        pick_id: payload.pick_id,
    })
}

/// Restock by scan, or create a product when the code is unknown.
///
/// When several products share the code the response is 409 with a
/// `candidates` array; repeat the call with `pick_id` set.
#[utoipa::path(
    post,
    path = "/api/products/add-smart",
    request_body = SmartAddPayload,
    responses(
        (status = 200, description = "Stocked in or created", body = SmartAddResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 409, description = "Ambiguous code; pick a candidate", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "smartAddProduct"
)]
#[post("/products/add-smart")]
pub async fn smart_add(
    state: web::Data<HttpState>,
    payload: web::Json<SmartAddPayload>,
) -> ApiResult<HttpResponse> {
    let request = parse_smart_add(payload.into_inner())?;
    let code = request.code.clone();
    let response = match state.stock.smart_add(request).await? {
        SmartAddOutcome::StockedIn {
            product,
            ebay_update_queued,
        } => SmartAddResponse {
            action: SmartAddAction::StockedIn,
            product,
            ebay_update_queued,
        },
        SmartAddOutcome::Created { product } => SmartAddResponse {
            action: SmartAddAction::Created,
            product,
            ebay_update_queued: false,
        },
        SmartAddOutcome::NeedsPick { candidates } => {
            return Err(
                Error::conflict(format!("multiple products match {code}; choose one"))
                    .with_details(json!({ "candidates": candidates })),
            );
        }
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Fetch one product.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let product = state.catalogue.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Replace a product's editable fields. eBay fields are changed through
/// `PATCH /api/products/{id}/ebay` only.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "SKU or code already in use", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "replaceProduct"
)]
#[put("/products/{id}")]
pub async fn replace_product(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_product_request(payload.into_inner())?;
    let product = state.catalogue.replace(path.into_inner(), draft).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Partial eBay bookkeeping update; omitted fields keep their value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct EbayPatchRequest {
    #[schema(example = "listed")]
    pub ebay_status: Option<String>,
    pub ebay_notes: Option<String>,
}

/// Set a product's eBay status and/or notes.
#[utoipa::path(
    patch,
    path = "/api/products/{id}/ebay",
    params(("id" = i32, Path, description = "Product id")),
    request_body = EbayPatchRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductSchema),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "patchProductEbay"
)]
#[patch("/products/{id}/ebay")]
pub async fn patch_product_ebay(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<EbayPatchRequest>,
) -> ApiResult<HttpResponse> {
    let EbayPatchRequest {
        ebay_status,
        ebay_notes,
    } = payload.into_inner();
    let patch = EbayStatusPatch {
        ebay_status: parse_ebay_status(ebay_status, EBAY_STATUS)?,
        ebay_notes: ebay_notes.map(|notes| notes.trim().to_owned()),
    };
    let product = state.catalogue.update_ebay(path.into_inner(), patch).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Deletion outcome.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Hard-delete a product. Past sales keep their SKU snapshot.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses((status = 200, description = "Whether a row was removed", body = DeletedResponse)),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let deleted = state.catalogue.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeletedResponse { deleted }))
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
