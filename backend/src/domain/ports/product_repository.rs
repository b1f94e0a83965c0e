//! Port abstraction for product persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{
    EbayStatusCount, EbayStatusPatch, Product, ProductDraft, ProductFilter, SkuPrefix, StockCode,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "product repository query failed: {message}",
        /// A unique SKU or code already exists.
        Duplicate { message: String } => "product already exists: {message}",
        /// The store refused the values (check constraint).
        Rejected { message: String } => "product rejected: {message}",
    }
}

/// Reads and writes product rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products ordered by SKU, optionally restricted to one eBay status.
    async fn list(&self, filter: ProductFilter) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Fetch a product by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ProductRepositoryError>;

    /// Every product whose `code` or `sku` equals `code`, ordered by SKU.
    async fn find_by_code(&self, code: &StockCode)
    -> Result<Vec<Product>, ProductRepositoryError>;

    /// Insert a product.
    async fn create(&self, draft: &ProductDraft) -> Result<Product, ProductRepositoryError>;

    /// Replace every editable column. `None` when the id is unknown.
    async fn replace(
        &self,
        id: i32,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, ProductRepositoryError>;

    /// Apply an eBay patch, keeping omitted fields.
    async fn update_ebay(
        &self,
        id: i32,
        patch: &EbayStatusPatch,
    ) -> Result<Option<Product>, ProductRepositoryError>;

    /// Delete a product. Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, ProductRepositoryError>;

    /// SKUs beginning with `prefix`, for allocation.
    async fn skus_with_prefix(
        &self,
        prefix: &SkuPrefix,
    ) -> Result<Vec<String>, ProductRepositoryError>;

    /// Product counts grouped by eBay status.
    async fn ebay_status_counts(&self) -> Result<Vec<EbayStatusCount>, ProductRepositoryError>;
}
