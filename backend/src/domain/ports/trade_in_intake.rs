//! Driving port for recording trade-ins.

use async_trait::async_trait;

use crate::domain::{Error, TradeIn, TradeInIntakeRequest};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeInIntake: Send + Sync {
    /// Trade-ins newest first.
    async fn list(&self) -> Result<Vec<TradeIn>, Error>;

    /// Validate and record a trade-in, storing its ID image and spawning a
    /// refurb item when asked.
    async fn intake(&self, request: TradeInIntakeRequest) -> Result<TradeIn, Error>;
}
