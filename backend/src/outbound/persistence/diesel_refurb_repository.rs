//! PostgreSQL-backed refurbishment store: items, their detail records and
//! the joined export view.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{RefurbReplacement, RefurbRepository, RefurbRepositoryError};
use crate::domain::{
    RefurbDetail, RefurbDetailDraft, RefurbDraft, RefurbExportRow, RefurbFilter, RefurbItem,
    RefurbStatus, SkuPrefix,
};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{RefurbDetailRow, RefurbDetailWrite, RefurbItemRow, RefurbItemWrite};
use super::pool::{DbPool, PoolError};
use super::schema::{refurb_details, refurb_items};

/// Diesel-backed implementation of the `RefurbRepository` port.
#[derive(Clone)]
pub struct DieselRefurbRepository {
    pool: DbPool,
}

impl DieselRefurbRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RefurbRepositoryError {
    RefurbRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> RefurbRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => RefurbRepositoryError::connection(message),
        StoreFailure::Rejected(message) | StoreFailure::MissingReference(message) => {
            RefurbRepositoryError::rejected(message)
        }
        StoreFailure::Duplicate(message) | StoreFailure::Query(message) => {
            RefurbRepositoryError::query(message)
        }
    }
}

fn to_item(row: RefurbItemRow) -> Result<RefurbItem, RefurbRepositoryError> {
    row.into_domain().map_err(RefurbRepositoryError::query)
}

/// Failures inside the replace transaction.
#[derive(Debug, thiserror::Error)]
enum ReplaceTxError {
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),
    #[error("{0}")]
    Row(String),
}

fn map_replace_error(error: ReplaceTxError) -> RefurbRepositoryError {
    match error {
        ReplaceTxError::Diesel(err) => map_diesel_error(err),
        ReplaceTxError::Row(message) => RefurbRepositoryError::query(message),
    }
}

#[async_trait]
impl RefurbRepository for DieselRefurbRepository {
    async fn list(&self, filter: &RefurbFilter) -> Result<Vec<RefurbItem>, RefurbRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = refurb_items::table
            .select(RefurbItemRow::as_select())
            .order_by((refurb_items::created_at.desc(), refurb_items::id.desc()))
            .into_boxed();
        if let Some(category) = filter.category.as_deref() {
            query = query.filter(refurb_items::category.eq(category.to_owned()));
        }
        if let Some(status) = filter.status {
            query = query.filter(refurb_items::status.eq(status.as_str()));
        }

        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(to_item).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<RefurbItem>, RefurbRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = refurb_items::table
            .find(id)
            .select(RefurbItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_item).transpose()
    }

    async fn create(&self, draft: &RefurbDraft) -> Result<RefurbItem, RefurbRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(refurb_items::table)
            .values(RefurbItemWrite::from(draft))
            .returning(RefurbItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_item(row)
    }

    async fn replace(
        &self,
        id: i32,
        draft: &RefurbDraft,
    ) -> Result<Option<RefurbReplacement>, RefurbRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // The row lock pins the previous status so two concurrent completions
        // cannot both observe a non-complete predecessor.
        conn.transaction::<_, ReplaceTxError, _>(|conn| {
            async move {
                let previous: Option<String> = refurb_items::table
                    .find(id)
                    .select(refurb_items::status)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(previous) = previous else {
                    return Ok(None);
                };
                let previous_status = previous
                    .parse::<RefurbStatus>()
                    .map_err(|err| ReplaceTxError::Row(format!("refurb item {id}: {err}")))?;

                let row: RefurbItemRow = diesel::update(refurb_items::table.find(id))
                    .set(RefurbItemWrite::from(draft))
                    .returning(RefurbItemRow::as_returning())
                    .get_result(conn)
                    .await?;
                let item = row.into_domain().map_err(ReplaceTxError::Row)?;

                Ok(Some(RefurbReplacement {
                    previous_status,
                    item,
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_replace_error)
    }

    async fn delete(&self, id: i32) -> Result<bool, RefurbRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(refurb_items::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn skus_with_prefix(
        &self,
        prefix: &SkuPrefix,
    ) -> Result<Vec<String>, RefurbRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let skus: Vec<Option<String>> = refurb_items::table
            .filter(refurb_items::sku.like(format!("{}%", prefix.as_str())))
            .select(refurb_items::sku)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(skus.into_iter().flatten().collect())
    }

    async fn find_detail(
        &self,
        refurb_id: i32,
    ) -> Result<Option<RefurbDetail>, RefurbRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RefurbDetailRow> = refurb_details::table
            .find(refurb_id)
            .select(RefurbDetailRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(RefurbDetail::from))
    }

    async fn upsert_detail(
        &self,
        refurb_id: i32,
        draft: &RefurbDetailDraft,
    ) -> Result<RefurbDetail, RefurbRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let write = RefurbDetailWrite::new(refurb_id, draft, Utc::now());
        let row: RefurbDetailRow = diesel::insert_into(refurb_details::table)
            .values(&write)
            .on_conflict(refurb_details::refurb_id)
            .do_update()
            .set(&write)
            .returning(RefurbDetailRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn export_rows(&self) -> Result<Vec<RefurbExportRow>, RefurbRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(RefurbItemRow, Option<RefurbDetailRow>)> = refurb_items::table
            .left_join(refurb_details::table)
            .select((
                RefurbItemRow::as_select(),
                Option::<RefurbDetailRow>::as_select(),
            ))
            .order_by(refurb_items::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(item, detail)| {
                Ok(RefurbExportRow {
                    item: to_item(item)?,
                    detail: detail.map(RefurbDetail::from),
                })
            })
            .collect()
    }
}
