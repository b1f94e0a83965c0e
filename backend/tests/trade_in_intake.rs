//! Trade-in intake against embedded PostgreSQL and a temporary upload
//! directory.

use std::sync::Arc;

use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use stockroom::domain::ports::{CustomerDirectory, RefurbWorkflow, TradeInIntake};
use stockroom::domain::{
    CustomerDraft, CustomerService, ErrorCode, IdImageUpload, RefurbService, TRADE_IN_SUPPLIER,
    TradeInContact, TradeInIntakeRequest, TradeInService,
};
use stockroom::outbound::persistence::{
    DbPool, DieselCustomerRepository, DieselProductRepository, DieselRefurbRepository,
    DieselStockLedger, DieselTradeInRepository, PoolConfig,
};
use stockroom::outbound::storage::CapStdIdImageStore;
use tempfile::TempDir;
use tokio::runtime::Runtime;

mod support;

use support::{TestDatabase, handle_cluster_setup_failure, provision_database};

type Intake = TradeInService<
    DieselTradeInRepository,
    DieselCustomerRepository,
    DieselRefurbRepository,
    CapStdIdImageStore,
>;
type Refurbs = RefurbService<DieselRefurbRepository, DieselProductRepository, DieselStockLedger>;

struct World {
    runtime: Runtime,
    intake: Intake,
    customers: CustomerService<DieselCustomerRepository>,
    refurbs: Refurbs,
    uploads: TempDir,
    database: TestDatabase,
}

fn setup_world() -> Result<World, String> {
    let database = provision_database()?;
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(database.url()).with_max_size(2)))
        .map_err(|err| err.to_string())?;
    let uploads = TempDir::new().map_err(|err| err.to_string())?;

    let customers = Arc::new(DieselCustomerRepository::new(pool.clone()));
    let refurb_repo = Arc::new(DieselRefurbRepository::new(pool.clone()));
    let products = Arc::new(DieselProductRepository::new(pool.clone()));
    let ledger = Arc::new(DieselStockLedger::new(pool.clone()));

    Ok(World {
        runtime,
        intake: TradeInService::new(
            Arc::new(DieselTradeInRepository::new(pool)),
            customers.clone(),
            refurb_repo.clone(),
            Arc::new(CapStdIdImageStore::new(uploads.path().join("ids"))),
        ),
        customers: CustomerService::new(customers),
        refurbs: RefurbService::new(refurb_repo, products, ledger),
        uploads,
        database,
    })
}

#[fixture]
fn world() -> Option<World> {
    match setup_world() {
        Ok(world) => Some(world),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn intake_stores_image_and_spawns_refurb(world: Option<World>) {
    let Some(world) = world else { return };
    let trade_in = world.runtime.block_on(async {
        let customer = world
            .customers
            .create(CustomerDraft {
                name: "Ada Lovelace".to_owned(),
                phone: Some("0123".to_owned()),
                email: None,
                address: None,
                id_image_path: None,
                notes: None,
            })
            .await
            .expect("customer");

        let trade_in = world
            .intake
            .intake(TradeInIntakeRequest {
                customer_id: Some(customer.id),
                contact: TradeInContact::default(),
                serial: Some("SN-42".to_owned()),
                device_desc: Some("PS4 Slim".to_owned()),
                valuation: Some(Decimal::new(80, 0)),
                agreed_value: Some(Decimal::new(60, 0)),
                create_refurb: true,
                id_image: Some(IdImageUpload {
                    original_name: Some("../licence.jpg".to_owned()),
                    bytes: b"jpeg bytes".to_vec(),
                }),
            })
            .await
            .expect("intake");

        assert_eq!(trade_in.customer_name, "Ada Lovelace");
        assert_eq!(trade_in.customer_phone.as_deref(), Some("0123"));

        let refurb_id = trade_in.refurb_id.expect("refurb spawned");
        let item = world.refurbs.get(refurb_id).await.expect("refurb item");
        assert_eq!(item.description, "PS4 Slim");
        assert_eq!(item.supplier.as_deref(), Some(TRADE_IN_SUPPLIER));
        assert_eq!(item.cost, Decimal::new(60, 0));
        trade_in
    });

    let stored = trade_in.id_image_path.expect("image path recorded");
    assert!(stored.ends_with("-licence.jpg"), "got {stored}");
    let bytes = std::fs::read(world.uploads.path().join("ids").join(&stored)).expect("file");
    assert_eq!(bytes, b"jpeg bytes");
}

#[rstest]
fn unknown_customer_is_rejected(world: Option<World>) {
    let Some(world) = world else { return };
    world.runtime.block_on(async {
        let err = world
            .intake
            .intake(TradeInIntakeRequest {
                customer_id: Some(999),
                device_desc: Some("Switch".to_owned()),
                create_refurb: true,
                ..TradeInIntakeRequest::default()
            })
            .await
            .expect_err("unknown customer");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(world.intake.list().await.expect("list").is_empty());
    });

    let mut client = world.database.client().expect("client");
    let row = client
        .query_one("SELECT count(*) FROM refurb_items", &[])
        .expect("count");
    let refurbs: i64 = row.get(0);
    assert_eq!(refurbs, 0, "a rejected intake must not spawn a refurb item");
}
