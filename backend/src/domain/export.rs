//! CSV backup bookkeeping.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{RefurbDetail, RefurbItem};

/// Names under which export times are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKey {
    Products,
    Refurb,
}

impl ExportKey {
    /// Stored key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Refurb => "refurb",
        }
    }
}

impl fmt::Display for ExportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last time an export ran for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStamp {
    pub key: String,
    pub last_exported: DateTime<Utc>,
}

/// Refurb item joined with its optional detail.
#[derive(Debug, Clone, PartialEq)]
pub struct RefurbExportRow {
    pub item: RefurbItem,
    pub detail: Option<RefurbDetail>,
}

