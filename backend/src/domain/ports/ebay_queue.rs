//! Driving port for working through queued eBay listing changes.

use async_trait::async_trait;

use crate::domain::{EbayUpdate, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EbayQueue: Send + Sync {
    /// Entries with the given `done` flag, newest first.
    async fn list(&self, done: bool) -> Result<Vec<EbayUpdate>, Error>;

    /// Mark an entry done or pending again.
    async fn set_done(&self, id: i32, done: bool) -> Result<EbayUpdate, Error>;
}
