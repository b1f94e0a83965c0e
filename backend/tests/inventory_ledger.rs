//! Stock movements, SKU allocation and refurb completion against embedded
//! PostgreSQL.
//!
//! # Runtime Strategy
//!
//! Cluster bootstrap and the `postgres` client block, and the client refuses
//! to run inside a Tokio runtime. Each test therefore owns a runtime and
//! drives the async services with `block_on`.

use std::sync::Arc;

use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use stockroom::domain::ports::{ProductCatalogue, RefurbWorkflow, StockOperations};
use stockroom::domain::{
    EbayStatus, ErrorCode, InventoryService, ProductDraft, RefurbDraft, RefurbService,
    RefurbStatus, SaleDetails, StockCode, UnitPricing,
};
use stockroom::outbound::persistence::{
    DbPool, DieselEbayUpdateRepository, DieselProductRepository, DieselRefurbRepository,
    DieselStockLedger, PoolConfig,
};
use tokio::runtime::Runtime;

mod support;

use support::{TestDatabase, handle_cluster_setup_failure, provision_database};

type Inventory =
    InventoryService<DieselProductRepository, DieselStockLedger, DieselEbayUpdateRepository>;
type Refurbs = RefurbService<DieselRefurbRepository, DieselProductRepository, DieselStockLedger>;

struct World {
    runtime: Runtime,
    inventory: Arc<Inventory>,
    refurbs: Refurbs,
    database: TestDatabase,
}

fn setup_world() -> Result<World, String> {
    let database = provision_database()?;
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let config = PoolConfig::new(database.url())
        .with_max_size(4)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    let products = Arc::new(DieselProductRepository::new(pool.clone()));
    let ledger = Arc::new(DieselStockLedger::new(pool.clone()));
    let ebay_updates = Arc::new(DieselEbayUpdateRepository::new(pool.clone()));
    let refurb_repo = Arc::new(DieselRefurbRepository::new(pool));

    Ok(World {
        runtime,
        inventory: Arc::new(InventoryService::new(
            products.clone(),
            ledger.clone(),
            ebay_updates,
        )),
        refurbs: RefurbService::new(refurb_repo, products, ledger),
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

fn code(raw: &str) -> StockCode {
    StockCode::parse(raw).expect("non-blank code")
}

fn draft(sku: &str, quantity: i32) -> ProductDraft {
    ProductDraft {
        sku: code(sku),
        code: None,
        name: format!("Product {sku}"),
        notes: None,
        on_ebay: false,
        ebay_status: EbayStatus::NotListed,
        ebay_notes: None,
        pricing: UnitPricing {
            cost: Decimal::new(10, 0),
            retail: Decimal::new(25, 0),
            fees: Decimal::new(2, 0),
            postage: Decimal::new(3, 0),
        },
        quantity,
    }
}

#[rstest]
fn sku_allocation_continues_after_existing_products(world: Option<World>) {
    let Some(world) = world else { return };
    world.runtime.block_on(async {
        let first = world
            .inventory
            .next_sku("a".to_owned())
            .await
            .expect("allocate");
        assert_eq!(first, "A0001");

        world
            .inventory
            .create(draft(&first, 0))
            .await
            .expect("create product");
        let second = world
            .inventory
            .next_sku("A".to_owned())
            .await
            .expect("allocate");
        assert_eq!(second, "A0002");
    });
}

#[rstest]
fn sale_keeps_the_price_at_time_of_sale(world: Option<World>) {
    let Some(world) = world else { return };
    world.runtime.block_on(async {
        let product = world
            .inventory
            .create(draft("L0001", 3))
            .await
            .expect("create product");

        let after = world
            .inventory
            .stock_out(
                code("l0001"),
                2,
                SaleDetails::new(Some("ebay".to_owned()), Some("ORD-1".to_owned()), None),
            )
            .await
            .expect("stock out");
        assert_eq!(after.quantity, 1);

        let mut repriced = draft("L0001", 1);
        repriced.pricing.retail = Decimal::new(30, 0);
        world
            .inventory
            .replace(product.id, repriced)
            .await
            .expect("reprice");

        let sales = world.inventory.list_sales().await.expect("sales");
        let [sale] = sales.as_slice() else {
            panic!("expected one sale, got {}", sales.len());
        };
        assert_eq!(sale.product_id, Some(product.id));
        assert_eq!(sale.sku, "L0001");
        assert_eq!(sale.quantity, 2);
        assert_eq!(sale.unit_retail, Decimal::new(25, 0));
        assert_eq!(sale.channel, "ebay");
        assert_eq!(sale.order_ref.as_deref(), Some("ORD-1"));
    });
}

#[rstest]
fn insufficient_stock_changes_nothing(world: Option<World>) {
    let Some(world) = world else { return };
    world.runtime.block_on(async {
        world
            .inventory
            .create(draft("B0001", 1))
            .await
            .expect("create product");

        let err = world
            .inventory
            .stock_out(code("B0001"), 2, SaleDetails::default())
            .await
            .expect_err("cannot oversell");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().contains("insufficient stock"));

        let product = world
            .inventory
            .lookup(code("B0001"))
            .await
            .expect("lookup");
        assert_eq!(product.quantity, 1);
        assert!(world.inventory.list_sales().await.expect("sales").is_empty());
    });
}

#[rstest]
fn stored_quantity_is_never_negative(world: Option<World>) {
    let Some(world) = world else { return };
    let product = world.runtime.block_on(async {
        let err = world
            .inventory
            .stock_take(code("C0001"), -1)
            .await
            .expect_err("negative count rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);

        world
            .inventory
            .create(draft("C0001", 2))
            .await
            .expect("create product")
    });

    let mut client = world.database.client().expect("client");
    let result = client.execute(
        "UPDATE products SET quantity = -1 WHERE id = $1",
        &[&product.id],
    );
    assert!(result.is_err(), "check constraint should reject -1");
}

#[rstest]
fn concurrent_stock_outs_never_oversell(world: Option<World>) {
    let Some(world) = world else { return };
    world.runtime.block_on(async {
        world
            .inventory
            .create(draft("D0001", 5))
            .await
            .expect("create product");

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let inventory = Arc::clone(&world.inventory);
                tokio::spawn(async move {
                    inventory
                        .stock_out(code("D0001"), 1, SaleDetails::default())
                        .await
                })
            })
            .collect();

        let mut sold = 0;
        for attempt in attempts {
            if attempt.await.expect("task joins").is_ok() {
                sold += 1;
            }
        }
        assert_eq!(sold, 5);

        let product = world
            .inventory
            .lookup(code("D0001"))
            .await
            .expect("lookup");
        assert_eq!(product.quantity, 0);
        assert_eq!(world.inventory.list_sales().await.expect("sales").len(), 5);
    });
}

#[rstest]
fn completing_a_refurb_restocks_the_matching_product(world: Option<World>) {
    let Some(world) = world else { return };
    world.runtime.block_on(async {
        world
            .inventory
            .create(draft("R0001", 5))
            .await
            .expect("create product");

        let mut refurb = RefurbDraft::described("ThinkPad T480");
        refurb.sku = Some("R0001".to_owned());
        let item = world.refurbs.create(refurb.clone()).await.expect("refurb");

        refurb.status = RefurbStatus::Complete;
        world
            .refurbs
            .replace(item.id, refurb.clone())
            .await
            .expect("complete");
        // A second save in the same state must not stock again.
        world
            .refurbs
            .replace(item.id, refurb)
            .await
            .expect("resave");

        let product = world
            .inventory
            .lookup(code("R0001"))
            .await
            .expect("lookup");
        assert_eq!(product.quantity, 6);
    });
}

#[rstest]
fn completing_an_unknown_sku_creates_a_product(world: Option<World>) {
    let Some(world) = world else { return };
    world.runtime.block_on(async {
        let mut refurb = RefurbDraft::described("Xbox One S");
        refurb.sku = Some("x0007".to_owned());
        refurb.status = RefurbStatus::Complete;
        refurb.retail = Decimal::new(120, 0);
        world.refurbs.create(refurb).await.expect("refurb");

        let product = world
            .inventory
            .lookup(code("X0007"))
            .await
            .expect("product created");
        assert_eq!(product.quantity, 1);
        assert_eq!(product.name, "Xbox One S");
        assert_eq!(product.retail, Decimal::new(120, 0));
    });
}
