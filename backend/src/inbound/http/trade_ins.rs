//! Trade-in intake handlers.
//!
//! ```text
//! GET  /api/tradein
//! POST /api/tradein   (multipart/form-data)
//! ```

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{HttpResponse, get, post, web};
use futures_util::TryStreamExt;
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Error, IdImageUpload, TradeInContact, TradeInIntakeRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, TradeInSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, blank_to_none, coerce_optional_money, coerce_quantity, is_truthy_text,
};

/// Largest accepted ID image.
const MAX_ID_IMAGE_BYTES: usize = 10 * 1024 * 1024;
/// Largest accepted text field.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;
const ID_IMAGE_FIELD: &str = "id_image";

/// Trade-in form as documented for clients.
#[derive(ToSchema)]
#[expect(dead_code, reason = "documents the multipart form for OpenAPI only")]
pub struct TradeInForm {
    /// Existing customer whose details fill any blanks.
    customer_id: Option<i32>,
    /// Required unless `customer_id` names a customer.
    customer_name: Option<String>,
    customer_phone: Option<String>,
    customer_email: Option<String>,
    customer_address: Option<String>,
    serial: Option<String>,
    #[schema(example = "ThinkPad X1 Carbon Gen 6")]
    device_desc: String,
    valuation: Option<f64>,
    agreed_value: Option<f64>,
    /// `1`, `yes` or `true` to spawn a refurb item.
    create_refurb: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    id_image: Option<Vec<u8>>,
}

fn multipart_error(err: MultipartError) -> Error {
    Error::invalid_request(format!("invalid multipart form: {err}"))
}

async fn read_field(field: &mut Field, limit: usize, name: &str) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if buf.len() + chunk.len() > limit {
            return Err(Error::invalid_request(format!("{name} is too large")));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Text fields collected from the form before validation.
#[derive(Debug, Default)]
struct TradeInFields {
    customer_id: Option<String>,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    customer_email: Option<String>,
    customer_address: Option<String>,
    serial: Option<String>,
    device_desc: Option<String>,
    valuation: Option<String>,
    agreed_value: Option<String>,
    create_refurb: Option<String>,
}

impl TradeInFields {
    fn slot(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "customer_id" => Some(&mut self.customer_id),
            "customer_name" => Some(&mut self.customer_name),
            "customer_phone" => Some(&mut self.customer_phone),
            "customer_email" => Some(&mut self.customer_email),
            "customer_address" => Some(&mut self.customer_address),
            "serial" => Some(&mut self.serial),
            "device_desc" => Some(&mut self.device_desc),
            "valuation" => Some(&mut self.valuation),
            "agreed_value" => Some(&mut self.agreed_value),
            "create_refurb" => Some(&mut self.create_refurb),
            _ => None,
        }
    }

    fn into_request(self, id_image: Option<IdImageUpload>) -> Result<TradeInIntakeRequest, Error> {
        let customer_id = blank_to_none(self.customer_id)
            .map(|raw| coerce_quantity(Some(&Value::String(raw)), FieldName::new("customer_id"), None))
            .transpose()?;
        let valuation = coerce_optional_money(
            self.valuation.map(Value::String).as_ref(),
            FieldName::new("valuation"),
        )?;
        let agreed_value = coerce_optional_money(
            self.agreed_value.map(Value::String).as_ref(),
            FieldName::new("agreed_value"),
        )?;
        Ok(TradeInIntakeRequest {
            customer_id,
            contact: TradeInContact {
                name: blank_to_none(self.customer_name),
                phone: blank_to_none(self.customer_phone),
                email: blank_to_none(self.customer_email),
                address: blank_to_none(self.customer_address),
            },
            serial: blank_to_none(self.serial),
            device_desc: blank_to_none(self.device_desc),
            valuation,
            agreed_value,
            create_refurb: self.create_refurb.as_deref().is_some_and(is_truthy_text),
            id_image,
        })
    }
}

async fn read_form(mut form: Multipart) -> Result<TradeInIntakeRequest, Error> {
    let mut fields = TradeInFields::default();
    let mut id_image = None;

    while let Some(mut field) = form.try_next().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == ID_IMAGE_FIELD {
            let original_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_owned);
            let bytes = read_field(&mut field, MAX_ID_IMAGE_BYTES, ID_IMAGE_FIELD).await?;
            // Browsers send an empty part when no file was chosen.
            if !bytes.is_empty() {
                id_image = Some(IdImageUpload {
                    original_name,
                    bytes,
                });
            }
            continue;
        }
        let bytes = read_field(&mut field, MAX_TEXT_FIELD_BYTES, &name).await?;
        match fields.slot(&name) {
            Some(slot) => {
                let text = String::from_utf8(bytes)
                    .map_err(|_| Error::invalid_request(format!("{name} must be UTF-8 text")))?;
                *slot = Some(text);
            }
            None => debug!(field = %name, "ignoring unknown trade-in form field"),
        }
    }

    fields.into_request(id_image)
}

/// Trade-ins, newest first.
#[utoipa::path(
    get,
    path = "/api/tradein",
    responses((status = 200, description = "Trade-ins", body = [TradeInSchema])),
    tags = ["trade-ins"],
    operation_id = "listTradeIns"
)]
#[get("/tradein")]
pub async fn list_trade_ins(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let trade_ins = state.trade_ins.list().await?;
    Ok(HttpResponse::Ok().json(trade_ins))
}

/// Record a trade-in from the intake form.
#[utoipa::path(
    post,
    path = "/api/tradein",
    request_body(content = TradeInForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Recorded", body = TradeInSchema),
        (status = 400, description = "Invalid form", body = ErrorSchema)
    ),
    tags = ["trade-ins"],
    operation_id = "createTradeIn"
)]
#[post("/tradein")]
pub async fn create_trade_in(
    state: web::Data<HttpState>,
    form: Multipart,
) -> ApiResult<HttpResponse> {
    let request = read_form(form).await?;
    let trade_in = state.trade_ins.intake(request).await?;
    Ok(HttpResponse::Created().json(trade_in))
}
