//! Port for probing the database from the health endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;

define_port_error! {
    /// Errors raised while probing the database.
    pub enum DatabaseHealthError {
        /// A connection could not be checked out.
        Connection { message: String } => "database connection failed: {message}",
        /// The probe query failed.
        Query { message: String } => "database probe failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatabaseHealth: Send + Sync {
    /// Round-trip to the database and return its clock.
    async fn now(&self) -> Result<DateTime<Utc>, DatabaseHealthError>;
}
