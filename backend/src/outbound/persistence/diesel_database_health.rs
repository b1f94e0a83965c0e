//! Database reachability probe backing `/api/health/db`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::QueryableByName;
use diesel::sql_types::Timestamptz;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DatabaseHealth, DatabaseHealthError};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::pool::DbPool;

#[derive(QueryableByName)]
struct ServerTime {
    #[diesel(sql_type = Timestamptz)]
    now: DateTime<Utc>,
}

/// Runs `SELECT NOW()` on a pooled connection.
#[derive(Clone)]
pub struct DieselDatabaseHealth {
    pool: DbPool,
}

impl DieselDatabaseHealth {
    /// Create a probe over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseHealth for DieselDatabaseHealth {
    async fn now(&self) -> Result<DateTime<Utc>, DatabaseHealthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| DatabaseHealthError::connection(pool_error_message(err)))?;

        let row: ServerTime = diesel::sql_query("SELECT NOW() AS now")
            .get_result(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(err) {
                StoreFailure::Connection(message) => DatabaseHealthError::connection(message),
                StoreFailure::Duplicate(message)
                | StoreFailure::Rejected(message)
                | StoreFailure::MissingReference(message)
                | StoreFailure::Query(message) => DatabaseHealthError::query(message),
            })?;
        Ok(row.now)
    }
}
