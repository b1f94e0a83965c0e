//! Tests for customer and trade-in services.

use std::sync::Arc;

use super::*;
use crate::domain::fixtures::refurb_item;
use crate::domain::ports::{
    MockCustomerRepository, MockIdImageStore, MockRefurbRepository, MockTradeInRepository,
    RefurbRepositoryError,
};
use crate::domain::{ErrorCode, IdImageUpload, RefurbStatus, TradeInContact};
use chrono::Utc;
use rstest::rstest;
use rust_decimal::Decimal;

type Intake = TradeInService<
    MockTradeInRepository,
    MockCustomerRepository,
    MockRefurbRepository,
    MockIdImageStore,
>;

fn make_intake(
    trade_ins: MockTradeInRepository,
    customers: MockCustomerRepository,
    refurbs: MockRefurbRepository,
    images: MockIdImageStore,
) -> Intake {
    TradeInService::new(
        Arc::new(trade_ins),
        Arc::new(customers),
        Arc::new(refurbs),
        Arc::new(images),
    )
}

fn stored_customer() -> Customer {
    let now = Utc::now();
    Customer {
        id: 12,
        name: "Grace".to_owned(),
        phone: Some("07000".to_owned()),
        email: None,
        address: Some("2 Low Rd".to_owned()),
        id_image_path: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

fn echo_trade_in(record: &NewTradeIn) -> TradeIn {
    TradeIn {
        id: 1,
        customer_id: record.customer_id,
        customer_name: record.customer_name.clone(),
        customer_phone: record.customer_phone.clone(),
        customer_email: record.customer_email.clone(),
        customer_address: record.customer_address.clone(),
        serial: record.serial.clone(),
        device_desc: record.device_desc.clone(),
        valuation: record.valuation,
        agreed_value: record.agreed_value,
        id_image_path: record.id_image_path.clone(),
        refurb_id: record.refurb_id,
        created_at: Utc::now(),
    }
}

fn request(name: Option<&str>, device: Option<&str>) -> TradeInIntakeRequest {
    TradeInIntakeRequest {
        contact: TradeInContact {
            name: name.map(str::to_owned),
            ..TradeInContact::default()
        },
        device_desc: device.map(str::to_owned),
        ..TradeInIntakeRequest::default()
    }
}

#[rstest]
#[case(Some("Ada"), None, "device_desc is required")]
#[case(None, Some("Switch"), "customer_name is required")]
#[tokio::test]
async fn intake_validates_required_fields(
    #[case] name: Option<&str>,
    #[case] device: Option<&str>,
    #[case] message: &str,
) {
    let service = make_intake(
        MockTradeInRepository::new(),
        MockCustomerRepository::new(),
        MockRefurbRepository::new(),
        MockIdImageStore::new(),
    );
    let error = service
        .intake(request(name, device))
        .await
        .expect_err("invalid");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), message);
}

#[tokio::test]
async fn intake_fills_contact_from_customer() {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_by_id()
        .withf(|id| *id == 12)
        .times(1)
        .return_once(|_| Ok(Some(stored_customer())));
    let mut trade_ins = MockTradeInRepository::new();
    trade_ins
        .expect_create()
        .withf(|record| {
            record.customer_name == "Grace"
                && record.customer_phone.as_deref() == Some("07000")
                && record.customer_address.as_deref() == Some("2 Low Rd")
                && record.refurb_id.is_none()
        })
        .times(1)
        .return_once(|record| Ok(echo_trade_in(record)));

    let service = make_intake(
        trade_ins,
        customers,
        MockRefurbRepository::new(),
        MockIdImageStore::new(),
    );
    let mut req = request(None, Some("Xbox One"));
    req.customer_id = Some(12);

    let trade_in = service.intake(req).await.expect("recorded");
    assert_eq!(trade_in.customer_id, Some(12));
}

#[tokio::test]
async fn intake_rejects_unknown_customer() {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    let service = make_intake(
        MockTradeInRepository::new(),
        customers,
        MockRefurbRepository::new(),
        MockIdImageStore::new(),
    );
    let mut req = request(Some("Ada"), Some("Switch"));
    req.customer_id = Some(404);

    let error = service.intake(req).await.expect_err("unknown customer");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn intake_stores_image_and_spawns_refurb() {
    let mut images = MockIdImageStore::new();
    images
        .expect_store()
        .withf(|name, bytes| name.as_deref() == Some("licence.jpg") && bytes.len() == 3)
        .times(1)
        .return_once(|_, _| Ok("1700000000000-licence.jpg".to_owned()));
    let mut refurbs = MockRefurbRepository::new();
    refurbs
        .expect_create()
        .withf(|draft| {
            draft.description == "iPhone 11"
                && draft.serial.as_deref() == Some("SN1")
                && draft.supplier.as_deref() == Some(TRADE_IN_SUPPLIER)
                && draft.cost == Decimal::new(9000, 2)
        })
        .times(1)
        .return_once(|_| Ok(refurb_item(77, None, RefurbStatus::Refurb)));
    let mut trade_ins = MockTradeInRepository::new();
    trade_ins
        .expect_create()
        .withf(|record| {
            record.refurb_id == Some(77)
                && record.id_image_path.as_deref() == Some("1700000000000-licence.jpg")
        })
        .times(1)
        .return_once(|record| Ok(echo_trade_in(record)));

    let service = make_intake(trade_ins, MockCustomerRepository::new(), refurbs, images);
    let mut req = request(Some("Ada"), Some("iPhone 11"));
    req.serial = Some("SN1".to_owned());
    req.agreed_value = Some(Decimal::new(9000, 2));
    req.create_refurb = true;
    req.id_image = Some(IdImageUpload {
        original_name: Some("licence.jpg".to_owned()),
        bytes: vec![1, 2, 3],
    });

    let trade_in = service.intake(req).await.expect("recorded");
    assert_eq!(trade_in.refurb_id, Some(77));
}

fn licence_upload() -> IdImageUpload {
    IdImageUpload {
        original_name: Some("licence.jpg".to_owned()),
        bytes: vec![1, 2, 3],
    }
}

fn images_storing_then_removing(path: &'static str) -> MockIdImageStore {
    let mut images = MockIdImageStore::new();
    images
        .expect_store()
        .times(1)
        .return_once(move |_, _| Ok(path.to_owned()));
    images
        .expect_remove()
        .withf(move |removed| removed == path)
        .times(1)
        .return_once(|_| Ok(()));
    images
}

#[tokio::test]
async fn failed_record_insert_discards_refurb_and_image() {
    let images = images_storing_then_removing("1700000000000-licence.jpg");
    let mut refurbs = MockRefurbRepository::new();
    refurbs
        .expect_create()
        .times(1)
        .return_once(|_| Ok(refurb_item(77, None, RefurbStatus::Refurb)));
    refurbs
        .expect_delete()
        .withf(|id| *id == 77)
        .times(1)
        .return_once(|_| Ok(true));
    let mut trade_ins = MockTradeInRepository::new();
    trade_ins
        .expect_create()
        .times(1)
        .return_once(|_| Err(TradeInRepositoryError::connection("pool timed out")));

    let service = make_intake(trade_ins, MockCustomerRepository::new(), refurbs, images);
    let mut req = request(Some("Ada"), Some("iPhone 11"));
    req.create_refurb = true;
    req.id_image = Some(licence_upload());

    let error = service.intake(req).await.expect_err("insert fails");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn failed_refurb_spawn_discards_image() {
    let images = images_storing_then_removing("1700000000001-licence.jpg");
    let mut refurbs = MockRefurbRepository::new();
    refurbs
        .expect_create()
        .times(1)
        .return_once(|_| Err(RefurbRepositoryError::query("disk full")));
    refurbs.expect_delete().never();
    let mut trade_ins = MockTradeInRepository::new();
    trade_ins.expect_create().never();

    let service = make_intake(trade_ins, MockCustomerRepository::new(), refurbs, images);
    let mut req = request(Some("Ada"), Some("iPhone 11"));
    req.create_refurb = true;
    req.id_image = Some(licence_upload());

    let error = service.intake(req).await.expect_err("refurb fails");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn cleanup_failures_do_not_mask_the_original_error() {
    let mut refurbs = MockRefurbRepository::new();
    refurbs
        .expect_create()
        .times(1)
        .return_once(|_| Ok(refurb_item(78, None, RefurbStatus::Refurb)));
    refurbs
        .expect_delete()
        .times(1)
        .return_once(|_| Err(RefurbRepositoryError::connection("gone")));
    let mut trade_ins = MockTradeInRepository::new();
    trade_ins
        .expect_create()
        .times(1)
        .return_once(|_| Err(TradeInRepositoryError::unknown_customer(5)));

    let service = make_intake(
        trade_ins,
        MockCustomerRepository::new(),
        refurbs,
        MockIdImageStore::new(),
    );
    let mut req = request(Some("Ada"), Some("Switch"));
    req.create_refurb = true;

    let error = service.intake(req).await.expect_err("insert fails");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn customer_create_requires_name() {
    let service = CustomerService::new(Arc::new(MockCustomerRepository::new()));
    let error = service
        .create(CustomerDraft::default())
        .await
        .expect_err("name required");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn customer_search_drops_blank_terms() {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_list()
        .withf(|search| search.is_none())
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let service = CustomerService::new(Arc::new(customers));
    let found = service.list(Some("   ".to_owned())).await.expect("listed");
    assert!(found.is_empty());
}
