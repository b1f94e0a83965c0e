//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockCustomerDirectory, MockDatabaseHealth, MockEbayQueue, MockExports, MockProductCatalogue,
    MockRefurbWorkflow, MockReporting, MockStockOperations, MockTradeInIntake,
};
use crate::inbound::http::state::HttpState;

/// Mock ports for handler tests.
///
/// Set expectations on the port under test and leave the rest untouched;
/// an unexpected call on any other port fails the test.
#[derive(Default)]
pub struct MockPorts {
    pub catalogue: MockProductCatalogue,
    pub stock: MockStockOperations,
    pub ebay_queue: MockEbayQueue,
    pub refurb: MockRefurbWorkflow,
    pub customers: MockCustomerDirectory,
    pub trade_ins: MockTradeInIntake,
    pub reporting: MockReporting,
    pub exports: MockExports,
    pub db_health: MockDatabaseHealth,
}

impl MockPorts {
    /// Wrap the mocks as shared handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            catalogue: Arc::new(self.catalogue),
            stock: Arc::new(self.stock),
            ebay_queue: Arc::new(self.ebay_queue),
            refurb: Arc::new(self.refurb),
            customers: Arc::new(self.customers),
            trade_ins: Arc::new(self.trade_ins),
            reporting: Arc::new(self.reporting),
            exports: Arc::new(self.exports),
            db_health: Arc::new(self.db_health),
        })
    }
}
