//! Driving port for catalogue maintenance.
//!
//! HTTP handlers call [`ProductCatalogue`] for everything that edits product
//! records directly. Quantity changes go through
//! [`StockOperations`](super::StockOperations) instead.

use async_trait::async_trait;

use crate::domain::{EbayStatusPatch, Error, Product, ProductDraft, ProductFilter, StockCode};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalogue: Send + Sync {
    /// Products ordered by SKU.
    async fn list(&self, filter: ProductFilter) -> Result<Vec<Product>, Error>;

    /// A single product, or `not_found`.
    async fn get(&self, id: i32) -> Result<Product, Error>;

    /// Resolve a scanned or typed code against `code` and `sku`.
    ///
    /// # Errors
    /// `not_found` when nothing matches; `conflict` when several products
    /// match and none has the code as its SKU.
    async fn lookup(&self, code: StockCode) -> Result<Product, Error>;

    /// Insert a product. Duplicate SKUs or codes are a `conflict`.
    async fn create(&self, draft: ProductDraft) -> Result<Product, Error>;

    /// Replace a product's editable fields.
    async fn replace(&self, id: i32, draft: ProductDraft) -> Result<Product, Error>;

    /// Set eBay status and notes, keeping omitted values.
    async fn update_ebay(&self, id: i32, patch: EbayStatusPatch) -> Result<Product, Error>;

    /// Delete a product; its sales keep their SKU but lose the link.
    async fn delete(&self, id: i32) -> Result<bool, Error>;

    /// The next free SKU for a category prefix.
    async fn next_sku(&self, category: String) -> Result<String, Error>;
}
