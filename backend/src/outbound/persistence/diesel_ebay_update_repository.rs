//! PostgreSQL-backed eBay update queue.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EbayUpdateRepository, EbayUpdateRepositoryError};
use crate::domain::{EbayUpdate, NewEbayUpdate};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{EbayUpdateRow, NewEbayUpdateRow};
use super::pool::{DbPool, PoolError};
use super::schema::ebay_updates;

/// Diesel-backed implementation of the `EbayUpdateRepository` port.
#[derive(Clone)]
pub struct DieselEbayUpdateRepository {
    pool: DbPool,
}

impl DieselEbayUpdateRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EbayUpdateRepositoryError {
    EbayUpdateRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> EbayUpdateRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => EbayUpdateRepositoryError::connection(message),
        StoreFailure::Duplicate(message)
        | StoreFailure::Rejected(message)
        | StoreFailure::MissingReference(message)
        | StoreFailure::Query(message) => EbayUpdateRepositoryError::query(message),
    }
}

#[async_trait]
impl EbayUpdateRepository for DieselEbayUpdateRepository {
    async fn enqueue(
        &self,
        update: &NewEbayUpdate,
    ) -> Result<EbayUpdate, EbayUpdateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: EbayUpdateRow = diesel::insert_into(ebay_updates::table)
            .values(NewEbayUpdateRow::from(update))
            .returning(EbayUpdateRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn list(&self, done: bool) -> Result<Vec<EbayUpdate>, EbayUpdateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<EbayUpdateRow> = ebay_updates::table
            .filter(ebay_updates::done.eq(done))
            .select(EbayUpdateRow::as_select())
            .order_by((ebay_updates::created_at.desc(), ebay_updates::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(EbayUpdate::from).collect())
    }

    async fn set_done(
        &self,
        id: i32,
        done: bool,
    ) -> Result<Option<EbayUpdate>, EbayUpdateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EbayUpdateRow> = diesel::update(ebay_updates::table.find(id))
            .set(ebay_updates::done.eq(done))
            .returning(EbayUpdateRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(EbayUpdate::from))
    }
}
