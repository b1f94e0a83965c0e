//! PostgreSQL-backed export timestamps, one row per export key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ExportLogRepository, ExportLogRepositoryError};
use crate::domain::{ExportKey, ExportStamp};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::ExportLogRow;
use super::pool::{DbPool, PoolError};
use super::schema::export_logs;

/// Diesel-backed implementation of the `ExportLogRepository` port.
#[derive(Clone)]
pub struct DieselExportLogRepository {
    pool: DbPool,
}

impl DieselExportLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExportLogRepositoryError {
    ExportLogRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ExportLogRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => ExportLogRepositoryError::connection(message),
        StoreFailure::Duplicate(message)
        | StoreFailure::Rejected(message)
        | StoreFailure::MissingReference(message)
        | StoreFailure::Query(message) => ExportLogRepositoryError::query(message),
    }
}

#[async_trait]
impl ExportLogRepository for DieselExportLogRepository {
    async fn record(
        &self,
        key: ExportKey,
        at: DateTime<Utc>,
    ) -> Result<(), ExportLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(export_logs::table)
            .values(ExportLogRow {
                key: key.as_str().to_owned(),
                last_exported: at,
            })
            .on_conflict(export_logs::key)
            .do_update()
            .set(export_logs::last_exported.eq(excluded(export_logs::last_exported)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list(&self) -> Result<Vec<ExportStamp>, ExportLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ExportLogRow> = export_logs::table
            .select(ExportLogRow::as_select())
            .order_by(export_logs::key.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| ExportStamp {
                key: row.key,
                last_exported: row.last_exported,
            })
            .collect())
    }
}
