//! PostgreSQL-backed `ProductRepository` implementation.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{
    EbayStatus, EbayStatusCount, EbayStatusPatch, Product, ProductDraft, ProductFilter,
    SkuPrefix, StockCode,
};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{EbayPatchUpdate, NewProductRow, ProductRow, ProductUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of the `ProductRepository` port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    ProductRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => ProductRepositoryError::connection(message),
        StoreFailure::Duplicate(message) => ProductRepositoryError::duplicate(message),
        StoreFailure::Rejected(message) => ProductRepositoryError::rejected(message),
        StoreFailure::MissingReference(message) | StoreFailure::Query(message) => {
            ProductRepositoryError::query(message)
        }
    }
}

fn to_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, ProductRepositoryError> {
    rows.into_iter()
        .map(ProductRow::into_domain)
        .collect::<Result<Vec<_>, _>>()
        .map_err(ProductRepositoryError::query)
}

fn to_product(row: Option<ProductRow>) -> Result<Option<Product>, ProductRepositoryError> {
    row.map(ProductRow::into_domain)
        .transpose()
        .map_err(ProductRepositoryError::query)
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn list(&self, filter: ProductFilter) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = products::table
            .select(ProductRow::as_select())
            .order_by(products::sku.asc())
            .into_boxed();
        if let Some(status) = filter.ebay_status {
            query = query.filter(products::ebay_status.eq(status.as_str()));
        }

        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        to_products(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        to_product(row)
    }

    async fn find_by_code(
        &self,
        code: &StockCode,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = products::table
            .filter(
                products::code
                    .eq(code.as_str())
                    .or(products::sku.eq(code.as_str()).nullable()),
            )
            .select(ProductRow::as_select())
            .order_by(products::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_products(rows)
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(products::table)
            .values(NewProductRow::from(draft))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain().map_err(ProductRepositoryError::query)
    }

    async fn replace(
        &self,
        id: i32,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(products::table.find(id))
            .set(ProductUpdate::from(draft))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        to_product(row)
    }

    async fn update_ebay(
        &self,
        id: i32,
        patch: &EbayStatusPatch,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        if patch.ebay_status.is_none() && patch.ebay_notes.is_none() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = EbayPatchUpdate {
            ebay_status: patch.ebay_status.map(EbayStatus::as_str),
            ebay_notes: patch.ebay_notes.as_deref(),
        };
        let row = diesel::update(products::table.find(id))
            .set(changes)
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        to_product(row)
    }

    async fn delete(&self, id: i32) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(products::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn skus_with_prefix(
        &self,
        prefix: &SkuPrefix,
    ) -> Result<Vec<String>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Prefixes are ASCII letters only, so no LIKE escaping is needed.
        products::table
            .filter(products::sku.like(format!("{}%", prefix.as_str())))
            .select(products::sku)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn ebay_status_counts(&self) -> Result<Vec<EbayStatusCount>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(String, i64)> = products::table
            .group_by(products::ebay_status)
            .select((products::ebay_status, count_star()))
            .order_by(products::ebay_status.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|(status, count)| match status.parse::<EbayStatus>() {
                Ok(ebay_status) => Some(EbayStatusCount { ebay_status, count }),
                Err(err) => {
                    warn!(error = %err, count, "skipping unrecognised ebay_status group");
                    None
                }
            })
            .collect())
    }
}
