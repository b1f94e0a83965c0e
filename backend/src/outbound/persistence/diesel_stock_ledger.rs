//! PostgreSQL-backed `StockLedger`.
//!
//! Each movement runs in one transaction: the product row is read with
//! `SELECT … FOR UPDATE`, the domain planner decides the new quantity and
//! status, and the update plus any sale insert commit together. Concurrent
//! stock-outs on the same product therefore serialise on the row lock and
//! can never drive the quantity below zero.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{StockCommand, StockLedger, StockLedgerError, StockOutcome};
use crate::domain::{
    EbayStatus, Product, Sale, StockTransition, StockTransitionError, plan_stock_in,
    plan_stock_out, plan_stock_take,
};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{NewSaleRow, ProductRow, SaleRow, StockUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{products, sales};

/// Diesel-backed implementation of the `StockLedger` port.
#[derive(Clone)]
pub struct DieselStockLedger {
    pool: DbPool,
}

impl DieselStockLedger {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failures inside the movement transaction. Any variant rolls it back.
#[derive(Debug, thiserror::Error)]
enum LedgerTxError {
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),
    #[error("product {0} not found")]
    ProductNotFound(i32),
    #[error(transparent)]
    Plan(StockTransitionError),
    #[error("{0}")]
    Row(String),
}

fn map_pool_error(error: PoolError) -> StockLedgerError {
    StockLedgerError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> StockLedgerError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => StockLedgerError::connection(message),
        StoreFailure::Rejected(message) => StockLedgerError::rejected(message),
        StoreFailure::Duplicate(message)
        | StoreFailure::MissingReference(message)
        | StoreFailure::Query(message) => StockLedgerError::query(message),
    }
}

fn map_tx_error(error: LedgerTxError) -> StockLedgerError {
    match error {
        LedgerTxError::Diesel(err) => map_diesel_error(err),
        LedgerTxError::ProductNotFound(product_id) => StockLedgerError::product_not_found(product_id),
        LedgerTxError::Plan(StockTransitionError::InsufficientStock {
            available,
            requested,
        }) => StockLedgerError::insufficient_stock(available, requested),
        LedgerTxError::Plan(err) => StockLedgerError::rejected(err.to_string()),
        LedgerTxError::Row(message) => StockLedgerError::query(message),
    }
}

fn plan(current: i32, command: &StockCommand) -> Result<StockTransition, StockTransitionError> {
    match command {
        StockCommand::In { quantity } => plan_stock_in(current, *quantity),
        StockCommand::Out { quantity, .. } => plan_stock_out(current, *quantity),
        StockCommand::Take { quantity } => plan_stock_take(current, *quantity),
    }
}

async fn apply_locked(
    conn: &mut AsyncPgConnection,
    product_id: i32,
    command: &StockCommand,
) -> Result<StockOutcome, LedgerTxError> {
    let locked: ProductRow = products::table
        .find(product_id)
        .select(ProductRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?
        .ok_or(LedgerTxError::ProductNotFound(product_id))?;
    let before: Product = locked.into_domain().map_err(LedgerTxError::Row)?;

    let transition = plan(before.quantity, command).map_err(LedgerTxError::Plan)?;

    let updated: ProductRow = diesel::update(products::table.find(product_id))
        .set(StockUpdate {
            quantity: transition.new_quantity,
            ebay_status: transition.ebay_status.map(EbayStatus::as_str),
        })
        .returning(ProductRow::as_returning())
        .get_result(conn)
        .await?;
    let product = updated.into_domain().map_err(LedgerTxError::Row)?;

    let sale = match command {
        StockCommand::Out { quantity, details } => {
            // Pricing is snapshotted from the locked pre-movement row.
            let row: SaleRow = diesel::insert_into(sales::table)
                .values(NewSaleRow {
                    product_id,
                    sku: before.sku.as_str(),
                    quantity: *quantity,
                    unit_cost: before.cost,
                    unit_retail: before.retail,
                    fees: before.fees,
                    postage: before.postage,
                    channel: details.channel.as_str(),
                    order_ref: details.order_ref.as_deref(),
                    note: details.note.as_deref(),
                })
                .returning(SaleRow::as_returning())
                .get_result(conn)
                .await?;
            Some(Sale::from(row))
        }
        StockCommand::In { .. } | StockCommand::Take { .. } => None,
    };

    Ok(StockOutcome {
        product,
        transition,
        sale,
    })
}

#[async_trait]
impl StockLedger for DieselStockLedger {
    async fn apply(
        &self,
        product_id: i32,
        command: StockCommand,
    ) -> Result<StockOutcome, StockLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, LedgerTxError, _>(|conn| {
            async move { apply_locked(conn, product_id, &command).await }.scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, StockLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SaleRow> = sales::table
            .select(SaleRow::as_select())
            .order_by((sales::created_at.desc(), sales::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    async fn sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sale>, StockLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SaleRow> = sales::table
            .filter(sales::created_at.ge(start).and(sales::created_at.lt(end)))
            .select(SaleRow::as_select())
            .order_by((sales::created_at.asc(), sales::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }
}
