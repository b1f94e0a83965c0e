//! eBay update queue service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{EbayQueue, EbayUpdateRepository, EbayUpdateRepositoryError};
use crate::domain::{EbayUpdate, Error};

fn map_repository_error(error: EbayUpdateRepositoryError) -> Error {
    match error {
        EbayUpdateRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ebay update queue unavailable: {message}"))
        }
        EbayUpdateRepositoryError::Query { message } => {
            Error::internal(format!("ebay update queue error: {message}"))
        }
    }
}

/// Service implementing [`EbayQueue`].
#[derive(Clone)]
pub struct EbayQueueService<R> {
    repo: Arc<R>,
}

impl<R> EbayQueueService<R> {
    /// Create a new service with the queue repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> EbayQueue for EbayQueueService<R>
where
    R: EbayUpdateRepository,
{
    async fn list(&self, done: bool) -> Result<Vec<EbayUpdate>, Error> {
        self.repo.list(done).await.map_err(map_repository_error)
    }

    async fn set_done(&self, id: i32, done: bool) -> Result<EbayUpdate, Error> {
        self.repo
            .set_done(id, done)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("ebay update {id} not found")))
    }
}
