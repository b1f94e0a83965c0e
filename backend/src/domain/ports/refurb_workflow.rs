//! Driving port for the refurbishment pipeline.

use async_trait::async_trait;

use crate::domain::{
    Error, RefurbDetail, RefurbDetailDraft, RefurbDraft, RefurbFilter, RefurbItem,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefurbWorkflow: Send + Sync {
    /// Items newest first.
    async fn list(&self, filter: RefurbFilter) -> Result<Vec<RefurbItem>, Error>;

    /// A single item, or `not_found`.
    async fn get(&self, id: i32) -> Result<RefurbItem, Error>;

    /// Insert an item. Creating it as complete stocks its product.
    async fn create(&self, draft: RefurbDraft) -> Result<RefurbItem, Error>;

    /// Replace an item. Moving it into complete stocks its product; a failed
    /// stock sync is logged and does not fail the update.
    async fn replace(&self, id: i32, draft: RefurbDraft) -> Result<RefurbItem, Error>;

    /// Delete an item and its detail.
    async fn delete(&self, id: i32) -> Result<bool, Error>;

    /// The next free refurb SKU for a prefix.
    async fn next_sku(&self, prefix: String) -> Result<String, Error>;

    /// Stored detail, or an empty one when none was saved.
    async fn detail(&self, id: i32) -> Result<RefurbDetail, Error>;

    /// Insert or overwrite an item's detail.
    async fn save_detail(&self, id: i32, draft: RefurbDetailDraft) -> Result<RefurbDetail, Error>;
}
