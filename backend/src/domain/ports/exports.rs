//! Driving port for CSV backups.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, Product, RefurbExportRow};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Exports: Send + Sync {
    /// Every product ordered by id; records the export time.
    async fn products(&self) -> Result<Vec<Product>, Error>;

    /// Every refurb item with its detail; records the export time.
    async fn refurb(&self) -> Result<Vec<RefurbExportRow>, Error>;

    /// Last export time per key.
    async fn last_exported(&self) -> Result<BTreeMap<String, DateTime<Utc>>, Error>;
}
