//! Port abstraction for trade-in persistence.

use async_trait::async_trait;

use crate::domain::{NewTradeIn, TradeIn};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by trade-in repository adapters.
    pub enum TradeInRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "trade-in repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "trade-in repository query failed: {message}",
        /// A referenced customer does not exist.
        UnknownCustomer { customer_id: i32 } => "customer {customer_id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeInRepository: Send + Sync {
    /// Trade-ins newest first.
    async fn list(&self) -> Result<Vec<TradeIn>, TradeInRepositoryError>;

    /// Insert a trade-in.
    async fn create(&self, trade_in: &NewTradeIn) -> Result<TradeIn, TradeInRepositoryError>;
}
