//! Stock movement handlers and the sales ledger.
//!
//! ```text
//! POST /api/stock/in
//! POST /api/stock/out
//! POST /api/stock/take
//! GET  /api/sales
//! ```
//!
//! Every movement accepts the product as `sku`, `code` or `barcode`; the
//! first non-blank one wins.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Error, SaleDetails, StockCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ProductSchema, SaleSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    QTY, blank_to_none, coerce_quantity, require_at_least, scanned_code,
};

/// Body shared by the three movement endpoints.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct StockMoveRequest {
    #[schema(example = "L0042")]
    pub sku: Option<String>,
    pub code: Option<String>,
    pub barcode: Option<String>,
    /// Units to move, or the counted quantity for a stock take.
    #[schema(value_type = Option<i32>, example = 1)]
    pub qty: Option<Value>,
    /// Sales channel for stock-out; `manual` when blank.
    #[schema(example = "ebay")]
    pub channel: Option<String>,
    pub order_ref: Option<String>,
    pub note: Option<String>,
}

impl StockMoveRequest {
    fn code(&self) -> Result<StockCode, Error> {
        scanned_code(
            self.sku.as_deref(),
            self.code.as_deref(),
            self.barcode.as_deref(),
        )
    }

    fn units(&self) -> Result<i32, Error> {
        let qty = coerce_quantity(self.qty.as_ref(), QTY, Some(1))?;
        require_at_least(qty, 1, QTY)
    }

    fn counted(&self) -> Result<i32, Error> {
        let qty = coerce_quantity(self.qty.as_ref(), QTY, None)?;
        require_at_least(qty, 0, QTY)
    }
}

/// Receive units into stock.
#[utoipa::path(
    post,
    path = "/api/stock/in",
    request_body = StockMoveRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductSchema),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 404, description = "Unknown code", body = ErrorSchema),
        (status = 409, description = "Ambiguous code", body = ErrorSchema)
    ),
    tags = ["stock"],
    operation_id = "stockIn"
)]
#[post("/stock/in")]
pub async fn stock_in(
    state: web::Data<HttpState>,
    payload: web::Json<StockMoveRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let code = request.code()?;
    let product = state.stock.stock_in(code, request.units()?).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Sell units and record the sale.
#[utoipa::path(
    post,
    path = "/api/stock/out",
    request_body = StockMoveRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductSchema),
        (status = 400, description = "Invalid payload or insufficient stock", body = ErrorSchema),
        (status = 404, description = "Unknown code", body = ErrorSchema),
        (status = 409, description = "Ambiguous code", body = ErrorSchema)
    ),
    tags = ["stock"],
    operation_id = "stockOut"
)]
#[post("/stock/out")]
pub async fn stock_out(
    state: web::Data<HttpState>,
    payload: web::Json<StockMoveRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let code = request.code()?;
    let units = request.units()?;
    let details = SaleDetails::new(
        request.channel,
        blank_to_none(request.order_ref),
        blank_to_none(request.note),
    );
    let product = state.stock.stock_out(code, units, details).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Overwrite the on-hand quantity with a physical count.
#[utoipa::path(
    post,
    path = "/api/stock/take",
    request_body = StockMoveRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductSchema),
        (status = 400, description = "Missing or negative count", body = ErrorSchema),
        (status = 404, description = "Unknown code", body = ErrorSchema),
        (status = 409, description = "Ambiguous code", body = ErrorSchema)
    ),
    tags = ["stock"],
    operation_id = "stockTake"
)]
#[post("/stock/take")]
pub async fn stock_take(
    state: web::Data<HttpState>,
    payload: web::Json<StockMoveRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let code = request.code()?;
    let product = state.stock.stock_take(code, request.counted()?).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Every recorded sale, newest first.
#[utoipa::path(
    get,
    path = "/api/sales",
    responses((status = 200, description = "Sales", body = [SaleSchema])),
    tags = ["stock"],
    operation_id = "listSales"
)]
#[get("/sales")]
pub async fn list_sales(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let sales = state.stock.list_sales().await?;
    Ok(HttpResponse::Ok().json(sales))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{product, sale};
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::json;

    macro_rules! stock_app {
        ($ports:expr) => {
            test::init_service(
                App::new().app_data($ports.into_state()).service(
                    web::scope("/api")
                        .service(stock_in)
                        .service(stock_out)
                        .service(stock_take)
                        .service(list_sales),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn stock_in_defaults_to_one_unit() {
        let mut ports = MockPorts::default();
        ports
            .stock
            .expect_stock_in()
            .withf(|code, qty| code.as_str() == "A0001" && *qty == 1)
            .times(1)
            .return_once(|_, _| Ok(product(1, "A0001", 6)));
        let app = stock_app!(ports);

        let req = test::TestRequest::post()
            .uri("/api/stock/in")
            .set_json(json!({"barcode": " a0001 "}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["quantity"], 6);
    }

    #[actix_web::test]
    async fn stock_out_passes_sale_details() {
        let mut ports = MockPorts::default();
        ports
            .stock
            .expect_stock_out()
            .withf(|code, qty, details| {
                code.as_str() == "A0001"
                    && *qty == 2
                    && details.channel == "manual"
                    && details.order_ref.as_deref() == Some("ORD-9")
                    && details.note.is_none()
            })
            .return_once(|_, _, _| Ok(product(1, "A0001", 3)));
        let app = stock_app!(ports);

        let req = test::TestRequest::post()
            .uri("/api/stock/out")
            .set_json(json!({"sku": "A0001", "qty": "2", "channel": " ", "order_ref": "ORD-9", "note": ""}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn insufficient_stock_is_a_400() {
        let mut ports = MockPorts::default();
        ports
            .stock
            .expect_stock_out()
            .return_once(|_, _, _| Err(Error::invalid_request("insufficient stock")));
        let app = stock_app!(ports);

        let req = test::TestRequest::post()
            .uri("/api/stock/out")
            .set_json(json!({"sku": "A0001", "qty": 99}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "insufficient stock");
    }

    #[rstest]
    #[case("/api/stock/in", json!({"sku": "A0001", "qty": 0}))]
    #[case("/api/stock/out", json!({"sku": "A0001", "qty": -1}))]
    #[case("/api/stock/in", json!({"qty": 1}))]
    #[case("/api/stock/take", json!({"sku": "A0001"}))]
    #[case("/api/stock/take", json!({"sku": "A0001", "qty": -2}))]
    #[case("/api/stock/take", json!({"sku": "A0001", "qty": "lots"}))]
    #[actix_web::test]
    async fn invalid_movements_are_rejected(#[case] uri: &str, #[case] payload: Value) {
        let app = stock_app!(MockPorts::default());
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(payload)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn stock_take_accepts_zero() {
        let mut ports = MockPorts::default();
        ports
            .stock
            .expect_stock_take()
            .withf(|_, qty| *qty == 0)
            .return_once(|_, _| Ok(product(1, "A0001", 0)));
        let app = stock_app!(ports);

        let req = test::TestRequest::post()
            .uri("/api/stock/take")
            .set_json(json!({"code": "A0001", "qty": 0}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn sales_are_listed() {
        let mut ports = MockPorts::default();
        ports
            .stock
            .expect_list_sales()
            .return_once(|| Ok(vec![sale(2, "A0001", 1, "ebay"), sale(1, "A0001", 2, "manual")]));
        let app = stock_app!(ports);

        let req = test::TestRequest::get().uri("/api/sales").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["channel"], "ebay");
        assert_eq!(body[1]["quantity"], 2);
    }
}
