//! Driving port for customer records.

use async_trait::async_trait;

use crate::domain::{Customer, CustomerDraft, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Customers ordered by name, optionally filtered by a search term.
    async fn list(&self, search: Option<String>) -> Result<Vec<Customer>, Error>;

    /// A single customer, or `not_found`.
    async fn get(&self, id: i32) -> Result<Customer, Error>;

    /// Insert a customer.
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, Error>;

    /// Replace a customer.
    async fn replace(&self, id: i32, draft: CustomerDraft) -> Result<Customer, Error>;
}
