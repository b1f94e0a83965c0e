//! PostgreSQL-backed trade-in records.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TradeInRepository, TradeInRepositoryError};
use crate::domain::{NewTradeIn, TradeIn};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{NewTradeInRow, TradeInRow};
use super::pool::{DbPool, PoolError};
use super::schema::trade_ins;

/// Diesel-backed implementation of the `TradeInRepository` port.
#[derive(Clone)]
pub struct DieselTradeInRepository {
    pool: DbPool,
}

impl DieselTradeInRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TradeInRepositoryError {
    TradeInRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    customer_id: Option<i32>,
) -> TradeInRepositoryError {
    match (classify_diesel_error(error), customer_id) {
        (StoreFailure::Connection(message), _) => TradeInRepositoryError::connection(message),
        // customer_id is the table's only foreign key.
        (StoreFailure::MissingReference(_), Some(id)) => {
            TradeInRepositoryError::unknown_customer(id)
        }
        (
            StoreFailure::Duplicate(message)
            | StoreFailure::Rejected(message)
            | StoreFailure::MissingReference(message)
            | StoreFailure::Query(message),
            _,
        ) => TradeInRepositoryError::query(message),
    }
}

#[async_trait]
impl TradeInRepository for DieselTradeInRepository {
    async fn list(&self) -> Result<Vec<TradeIn>, TradeInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TradeInRow> = trade_ins::table
            .select(TradeInRow::as_select())
            .order_by((trade_ins::created_at.desc(), trade_ins::id.desc()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        Ok(rows.into_iter().map(TradeIn::from).collect())
    }

    async fn create(&self, trade_in: &NewTradeIn) -> Result<TradeIn, TradeInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: TradeInRow = diesel::insert_into(trade_ins::table)
            .values(NewTradeInRow::from(trade_in))
            .returning(TradeInRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, trade_in.customer_id))?;
        Ok(row.into())
    }
}
