//! Port abstraction for customer persistence.

use async_trait::async_trait;

use crate::domain::{Customer, CustomerDraft};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by customer repository adapters.
    pub enum CustomerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "customer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "customer repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Customers ordered by name. `search` matches name, phone or email
    /// case-insensitively.
    async fn list(&self, search: Option<String>)
    -> Result<Vec<Customer>, CustomerRepositoryError>;

    /// Fetch a customer by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, CustomerRepositoryError>;

    /// Insert a customer.
    async fn create(&self, draft: &CustomerDraft) -> Result<Customer, CustomerRepositoryError>;

    /// Replace a customer and refresh `updated_at`.
    async fn replace(
        &self,
        id: i32,
        draft: &CustomerDraft,
    ) -> Result<Option<Customer>, CustomerRepositoryError>;
}
