//! Port for the eBay listing update queue.

use async_trait::async_trait;

use crate::domain::{EbayUpdate, NewEbayUpdate};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by eBay update queue adapters.
    pub enum EbayUpdateRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ebay update queue connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ebay update queue query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EbayUpdateRepository: Send + Sync {
    /// Append an entry.
    async fn enqueue(&self, update: &NewEbayUpdate)
    -> Result<EbayUpdate, EbayUpdateRepositoryError>;

    /// Entries with the given `done` flag, newest first.
    async fn list(&self, done: bool) -> Result<Vec<EbayUpdate>, EbayUpdateRepositoryError>;

    /// Toggle an entry. `None` when the id is unknown.
    async fn set_done(
        &self,
        id: i32,
        done: bool,
    ) -> Result<Option<EbayUpdate>, EbayUpdateRepositoryError>;
}
