//! Handler tests for the product catalogue endpoints.

use super::*;
use crate::domain::fixtures::product;
use crate::domain::{EbayStatus, StockCode};
use crate::inbound::http::test_utils::MockPorts;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use rust_decimal::Decimal;

async fn app(
    ports: MockPorts,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new().app_data(ports.into_state()).service(
            web::scope("/api")
                .service(list_products)
                .service(create_product)
                .service(next_product_sku)
                .service(lookup_product)
                .service(smart_add)
                .service(get_product)
                .service(replace_product)
                .service(patch_product_ebay)
                .service(delete_product),
        ),
    )
    .await
}

#[actix_web::test]
async fn create_normalises_the_payload() {
    let mut ports = MockPorts::default();
    ports
        .catalogue
        .expect_create()
        .withf(|draft| {
            draft.sku.as_str() == "L0042"
                && draft.code.as_ref().map(StockCode::as_str) == Some("5012")
                && draft.name == "ThinkPad"
                && draft.notes.is_none()
                && draft.on_ebay
                && draft.pricing.cost == Decimal::new(125, 1)
                && draft.pricing.retail == Decimal::ZERO
                && draft.quantity == 3
        })
        .times(1)
        .return_once(|_| Ok(product(1, "L0042", 3)));
    let app = app(ports).await;

    let req = test::TestRequest::post()
        .uri("/api/products")
        .set_json(json!({
            "sku": " l0042 ",
            "code": "5012",
            "name": " ThinkPad ",
            "notes": "   ",
            "onEbay": "yes",
            "cost": "12.5",
            "quantity": "3",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["sku"], "L0042");
}

#[rstest]
#[case(json!({"name": "No sku"}))]
#[case(json!({"sku": "A1", "name": "  "}))]
#[actix_web::test]
async fn create_requires_sku_and_name(#[case] payload: Value) {
    let app = app(MockPorts::default()).await;
    let req = test::TestRequest::post()
        .uri("/api/products")
        .set_json(payload)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "sku and name are required");
}

#[actix_web::test]
async fn create_rejects_non_numeric_money() {
    let app = app(MockPorts::default()).await;
    let req = test::TestRequest::post()
        .uri("/api/products")
        .set_json(json!({"sku": "A1", "name": "Mouse", "retail": "cheap"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn list_rejects_unknown_status_filter() {
    let app = app(MockPorts::default()).await;
    let req = test::TestRequest::get()
        .uri("/api/products?ebay_status=vanished")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn list_passes_status_filter() {
    let mut ports = MockPorts::default();
    ports
        .catalogue
        .expect_list()
        .withf(|filter| filter.ebay_status == Some(EbayStatus::Listed))
        .return_once(|_| Ok(vec![product(1, "A0001", 2)]));
    let app = app(ports).await;
    let req = test::TestRequest::get()
        .uri("/api/products?ebay_status=listed")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn next_sku_is_not_captured_by_the_id_route() {
    let mut ports = MockPorts::default();
    ports
        .catalogue
        .expect_next_sku()
        .withf(|category| category == "l")
        .return_once(|_| Ok("L0001".to_owned()));
    let app = app(ports).await;
    let req = test::TestRequest::get()
        .uri("/api/products/next-sku?category=l")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"sku": "L0001"}));
}

#[actix_web::test]
async fn lookup_uppercases_the_code() {
    let mut ports = MockPorts::default();
    ports
        .catalogue
        .expect_lookup()
        .withf(|code| code.as_str() == "AB12")
        .return_once(|_| Ok(product(4, "AB12", 1)));
    let app = app(ports).await;
    let req = test::TestRequest::get()
        .uri("/api/products/lookup/ab12")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn ambiguous_smart_add_is_409_with_candidates() {
    let mut ports = MockPorts::default();
    ports.stock.expect_smart_add().return_once(|_| {
        Ok(SmartAddOutcome::NeedsPick {
            candidates: vec![product(1, "A0001", 1), product(2, "B0001", 4)],
        })
    });
    let app = app(ports).await;
    let req = test::TestRequest::post()
        .uri("/api/products/add-smart")
        .set_json(json!({"code": "5012", "quantity": 1}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    let candidates = body["candidates"].as_array().expect("candidates array");
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[1]["sku"], "B0001");
}

#[actix_web::test]
async fn smart_add_reports_the_action() {
    let mut ports = MockPorts::default();
    ports
        .stock
        .expect_smart_add()
        .withf(|req| {
            req.code.as_str() == "5012"
                && req.quantity == 2
                && req.category.as_deref() == Some("L")
                && req.pick_id.is_none()
        })
        .return_once(|_| {
            Ok(SmartAddOutcome::Created {
                product: product(9, "L0007", 2),
            })
        });
    let app = app(ports).await;
    let req = test::TestRequest::post()
        .uri("/api/products/add-smart")
        .set_json(json!({"barcode": "5012", "qty": "2", "category": "L", "name": "Dock"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["action"], "created");
    assert_eq!(body["ebay_update_queued"], false);
    assert_eq!(body["product"]["sku"], "L0007");
}

#[rstest]
#[case(json!(0))]
#[case(json!(-3))]
#[case(json!("x"))]
#[actix_web::test]
async fn smart_add_rejects_bad_quantities(#[case] quantity: Value) {
    let app = app(MockPorts::default()).await;
    let req = test::TestRequest::post()
        .uri("/api/products/add-smart")
        .set_json(json!({"code": "5012", "quantity": quantity}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn ebay_patch_keeps_omitted_fields_unset() {
    let mut ports = MockPorts::default();
    ports
        .catalogue
        .expect_update_ebay()
        .withf(|id, patch| {
            *id == 3 && patch.ebay_status == Some(EbayStatus::Listed) && patch.ebay_notes.is_none()
        })
        .return_once(|_, _| Ok(product(3, "A0003", 1)));
    let app = app(ports).await;
    let req = test::TestRequest::patch()
        .uri("/api/products/3/ebay")
        .set_json(json!({"ebay_status": "listed"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn missing_product_is_404() {
    let mut ports = MockPorts::default();
    ports
        .catalogue
        .expect_get()
        .return_once(|_| Err(Error::not_found("not found")));
    let app = app(ports).await;
    let req = test::TestRequest::get().uri("/api/products/77").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_reports_whether_a_row_went() {
    let mut ports = MockPorts::default();
    ports.catalogue.expect_delete().return_once(|_| Ok(false));
    let app = app(ports).await;
    let req = test::TestRequest::delete().uri("/api/products/5").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"deleted": false}));
}
