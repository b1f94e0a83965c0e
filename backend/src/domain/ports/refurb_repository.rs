//! Port abstraction for refurb item and detail persistence.

use async_trait::async_trait;

use crate::domain::{
    RefurbDetail, RefurbDetailDraft, RefurbDraft, RefurbExportRow, RefurbFilter, RefurbItem,
    RefurbStatus, SkuPrefix,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by refurb repository adapters.
    pub enum RefurbRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "refurb repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "refurb repository query failed: {message}",
        /// The store refused the values (check constraint).
        Rejected { message: String } => "refurb item rejected: {message}",
    }
}

/// A replaced refurb item with the status it held before.
#[derive(Debug, Clone, PartialEq)]
pub struct RefurbReplacement {
    pub previous_status: RefurbStatus,
    pub item: RefurbItem,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefurbRepository: Send + Sync {
    /// Items newest first, filtered by category and status when given.
    async fn list(&self, filter: &RefurbFilter) -> Result<Vec<RefurbItem>, RefurbRepositoryError>;

    /// Fetch an item by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<RefurbItem>, RefurbRepositoryError>;

    /// Insert an item.
    async fn create(&self, draft: &RefurbDraft) -> Result<RefurbItem, RefurbRepositoryError>;

    /// Replace an item, reporting the status it replaced.
    ///
    /// The previous status is read under the same row lock as the write so
    /// two concurrent completions cannot both observe a non-complete status.
    async fn replace(
        &self,
        id: i32,
        draft: &RefurbDraft,
    ) -> Result<Option<RefurbReplacement>, RefurbRepositoryError>;

    /// Delete an item and its detail. Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, RefurbRepositoryError>;

    /// SKUs beginning with `prefix`, for allocation.
    async fn skus_with_prefix(&self, prefix: &SkuPrefix)
    -> Result<Vec<String>, RefurbRepositoryError>;

    /// The stored detail for an item, if any.
    async fn find_detail(&self, refurb_id: i32)
    -> Result<Option<RefurbDetail>, RefurbRepositoryError>;

    /// Insert or overwrite the detail for an item.
    async fn upsert_detail(
        &self,
        refurb_id: i32,
        draft: &RefurbDetailDraft,
    ) -> Result<RefurbDetail, RefurbRepositoryError>;

    /// Every item joined with its detail, ordered by id.
    async fn export_rows(&self) -> Result<Vec<RefurbExportRow>, RefurbRepositoryError>;
}
