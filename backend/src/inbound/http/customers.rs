//! Customer directory handlers.
//!
//! ```text
//! GET  /api/customers[?q=]
//! POST /api/customers
//! GET  /api/customers/{id}
//! PUT  /api/customers/{id}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CustomerDraft, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CustomerSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, blank_to_none, required_text};

/// Create or replace payload.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CustomerRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub id_image_path: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<CustomerRequest> for CustomerDraft {
    type Error = Error;

    fn try_from(payload: CustomerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_text(payload.name, FieldName::new("name"))?,
            phone: blank_to_none(payload.phone),
            email: blank_to_none(payload.email),
            address: blank_to_none(payload.address),
            id_image_path: blank_to_none(payload.id_image_path),
            notes: blank_to_none(payload.notes),
        })
    }
}

/// Search filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CustomerQuery {
    /// Case-insensitive match on name, phone or email.
    pub q: Option<String>,
}

/// List customers by name.
#[utoipa::path(
    get,
    path = "/api/customers",
    params(CustomerQuery),
    responses((status = 200, description = "Customers", body = [CustomerSchema])),
    tags = ["customers"],
    operation_id = "listCustomers"
)]
#[get("/customers")]
pub async fn list_customers(
    state: web::Data<HttpState>,
    query: web::Query<CustomerQuery>,
) -> ApiResult<HttpResponse> {
    let customers = state
        .customers
        .list(blank_to_none(query.into_inner().q))
        .await?;
    Ok(HttpResponse::Ok().json(customers))
}

/// Add a customer.
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Created", body = CustomerSchema),
        (status = 400, description = "Name missing", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "createCustomer"
)]
#[post("/customers")]
pub async fn create_customer(
    state: web::Data<HttpState>,
    payload: web::Json<CustomerRequest>,
) -> ApiResult<HttpResponse> {
    let draft = CustomerDraft::try_from(payload.into_inner())?;
    let customer = state.customers.create(draft).await?;
    Ok(HttpResponse::Created().json(customer))
}

/// Fetch one customer.
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = CustomerSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "getCustomer"
)]
#[get("/customers/{id}")]
pub async fn get_customer(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let customer = state.customers.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customer))
}

/// Replace a customer record.
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Updated customer", body = CustomerSchema),
        (status = 400, description = "Name missing", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "replaceCustomer"
)]
#[put("/customers/{id}")]
pub async fn replace_customer(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<CustomerRequest>,
) -> ApiResult<HttpResponse> {
    let draft = CustomerDraft::try_from(payload.into_inner())?;
    let customer = state.customers.replace(path.into_inner(), draft).await?;
    Ok(HttpResponse::Ok().json(customer))
}
