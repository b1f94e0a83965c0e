//! Port for the export timestamp log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ExportKey, ExportStamp};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by export log adapters.
    pub enum ExportLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "export log connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "export log query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExportLogRepository: Send + Sync {
    /// Overwrite the timestamp stored for `key`.
    async fn record(
        &self,
        key: ExportKey,
        at: DateTime<Utc>,
    ) -> Result<(), ExportLogRepositoryError>;

    /// Every recorded timestamp.
    async fn list(&self) -> Result<Vec<ExportStamp>, ExportLogRepositoryError>;
}
