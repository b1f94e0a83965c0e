//! Devices moving through the refurbishment pipeline.
//!
//! A refurb item is tracked apart from product stock until it reaches
//! [`RefurbStatus::Complete`]; entering that state feeds one unit into the
//! product carrying the same SKU.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category assigned when none is given.
pub const DEFAULT_REFURB_CATEGORY: &str = "laptop";

/// Workflow position of a refurb item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefurbStatus {
    /// Queued for stripping into parts.
    Strip,
    /// Being refurbished.
    #[default]
    Refurb,
    /// Queued for scrapping.
    Scrap,
    /// Ready to sell; entering this state stocks the linked product.
    Complete,
    /// Stripped for parts.
    Stripped,
    /// Disposed of.
    Scrapped,
}

impl RefurbStatus {
    /// Every status, in the order the workflow usually visits them.
    pub const ALL: [Self; 6] = [
        Self::Refurb,
        Self::Strip,
        Self::Scrap,
        Self::Complete,
        Self::Stripped,
        Self::Scrapped,
    ];

    /// Stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strip => "strip",
            Self::Refurb => "refurb",
            Self::Scrap => "scrap",
            Self::Complete => "complete",
            Self::Stripped => "stripped",
            Self::Scrapped => "scrapped",
        }
    }

    /// Whether moving from `previous` to `self` should stock the product.
    ///
    /// `previous` is `None` when the item is being created.
    ///
    /// # Examples
    /// ```
    /// use stockroom::domain::RefurbStatus;
    ///
    /// assert!(RefurbStatus::Complete.completes_from(Some(RefurbStatus::Refurb)));
    /// assert!(RefurbStatus::Complete.completes_from(None));
    /// assert!(!RefurbStatus::Complete.completes_from(Some(RefurbStatus::Complete)));
    /// ```
    pub fn completes_from(self, previous: Option<Self>) -> bool {
        self == Self::Complete && previous != Some(Self::Complete)
    }
}

impl fmt::Display for RefurbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a refurb or parts status is not in its closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be one of {allowed} (got {value})")]
pub struct UnknownStatus {
    pub field: &'static str,
    pub allowed: &'static str,
    pub value: String,
}

impl FromStr for RefurbStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus {
                field: "status",
                allowed: "strip, refurb, scrap, complete, stripped, scrapped",
                value: s.to_owned(),
            })
    }
}

/// Whether a refurb is blocked on parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartsStatus {
    #[default]
    None,
    NeedsParts,
    AwaitingParts,
    HasParts,
}

impl PartsStatus {
    /// Every parts status.
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::NeedsParts,
        Self::AwaitingParts,
        Self::HasParts,
    ];

    /// Stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NeedsParts => "needs_parts",
            Self::AwaitingParts => "awaiting_parts",
            Self::HasParts => "has_parts",
        }
    }
}

impl fmt::Display for PartsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartsStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus {
                field: "parts_status",
                allowed: "none, needs_parts, awaiting_parts, has_parts",
                value: s.to_owned(),
            })
    }
}

/// A device in the refurbishment pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefurbItem {
    pub id: i32,
    pub sku: Option<String>,
    pub serial: Option<String>,
    pub description: String,
    pub status: RefurbStatus,
    pub parts_status: PartsStatus,
    pub supplier: Option<String>,
    pub category: String,
    pub cpu: Option<String>,
    pub colour: Option<String>,
    pub storage: Option<String>,
    pub controller: Option<String>,
    pub cost: Decimal,
    pub retail: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or replacing a refurb item.
#[derive(Debug, Clone, PartialEq)]
pub struct RefurbDraft {
    pub sku: Option<String>,
    pub serial: Option<String>,
    pub description: String,
    pub status: RefurbStatus,
    pub parts_status: PartsStatus,
    pub supplier: Option<String>,
    pub category: String,
    pub cpu: Option<String>,
    pub colour: Option<String>,
    pub storage: Option<String>,
    pub controller: Option<String>,
    pub cost: Decimal,
    pub retail: Decimal,
    pub notes: Option<String>,
}

impl RefurbDraft {
    /// Minimal draft for a device with only a description.
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            sku: None,
            serial: None,
            description: description.into(),
            status: RefurbStatus::default(),
            parts_status: PartsStatus::default(),
            supplier: None,
            category: DEFAULT_REFURB_CATEGORY.to_owned(),
            cpu: None,
            colour: None,
            storage: None,
            controller: None,
            cost: Decimal::ZERO,
            retail: Decimal::ZERO,
            notes: None,
        }
    }
}

/// Listing filter for refurb items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefurbFilter {
    pub category: Option<String>,
    pub status: Option<RefurbStatus>,
}

/// Extended specs and checklist attached one-to-one to a refurb item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefurbDetail {
    pub refurb_id: i32,
    pub specs_cpu: Option<String>,
    pub specs_ram: Option<String>,
    pub specs_storage: Option<String>,
    pub specs_gpu: Option<String>,
    pub specs_screen: Option<String>,
    pub os_version: Option<String>,
    pub specs_colour: Option<String>,
    pub specs_network: Option<String>,
    pub specs_condition: Option<String>,
    pub specs_firmware: Option<String>,
    pub specs_region: Option<String>,
    pub specs_bundle: Option<String>,
    pub parts_needed: Option<String>,
    pub parts_cost: Decimal,
    /// Free-form key/value checklist. Always a JSON object.
    pub checklist: Value,
    pub notes: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RefurbDetail {
    /// The detail reported for an item that has never had one saved.
    pub fn empty(refurb_id: i32) -> Self {
        Self::from_draft(refurb_id, RefurbDetailDraft::default(), None)
    }

    /// Materialise a draft for `refurb_id`.
    pub fn from_draft(
        refurb_id: i32,
        draft: RefurbDetailDraft,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            refurb_id,
            specs_cpu: draft.specs_cpu,
            specs_ram: draft.specs_ram,
            specs_storage: draft.specs_storage,
            specs_gpu: draft.specs_gpu,
            specs_screen: draft.specs_screen,
            os_version: draft.os_version,
            specs_colour: draft.specs_colour,
            specs_network: draft.specs_network,
            specs_condition: draft.specs_condition,
            specs_firmware: draft.specs_firmware,
            specs_region: draft.specs_region,
            specs_bundle: draft.specs_bundle,
            parts_needed: draft.parts_needed,
            parts_cost: draft.parts_cost,
            checklist: Value::Object(draft.checklist),
            notes: draft.notes,
            updated_at,
        }
    }
}

/// Values written by a detail upsert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefurbDetailDraft {
    pub specs_cpu: Option<String>,
    pub specs_ram: Option<String>,
    pub specs_storage: Option<String>,
    pub specs_gpu: Option<String>,
    pub specs_screen: Option<String>,
    pub os_version: Option<String>,
    pub specs_colour: Option<String>,
    pub specs_network: Option<String>,
    pub specs_condition: Option<String>,
    pub specs_firmware: Option<String>,
    pub specs_region: Option<String>,
    pub specs_bundle: Option<String>,
    pub parts_needed: Option<String>,
    pub parts_cost: Decimal,
    pub checklist: Map<String, Value>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, RefurbStatus::Complete, true)]
    #[case(Some(RefurbStatus::Refurb), RefurbStatus::Complete, true)]
    #[case(Some(RefurbStatus::Scrap), RefurbStatus::Complete, true)]
    #[case(Some(RefurbStatus::Complete), RefurbStatus::Complete, false)]
    #[case(Some(RefurbStatus::Complete), RefurbStatus::Refurb, false)]
    #[case(None, RefurbStatus::Strip, false)]
    fn completion_only_on_entry(
        #[case] previous: Option<RefurbStatus>,
        #[case] next: RefurbStatus,
        #[case] expected: bool,
    ) {
        assert_eq!(next.completes_from(previous), expected);
    }

    #[rstest]
    #[case("Complete", RefurbStatus::Complete)]
    #[case(" scrapped ", RefurbStatus::Scrapped)]
    fn refurb_status_parses(#[case] raw: &str, #[case] expected: RefurbStatus) {
        assert_eq!(raw.parse::<RefurbStatus>(), Ok(expected));
    }

    #[rstest]
    fn unknown_status_names_field() {
        let err = "sold".parse::<RefurbStatus>().expect_err("closed set");
        assert_eq!(err.field, "status");
        let err = "lost".parse::<PartsStatus>().expect_err("closed set");
        assert_eq!(err.field, "parts_status");
    }

    #[rstest]
    fn empty_detail_has_object_checklist() {
        let detail = RefurbDetail::empty(7);
        assert_eq!(detail.refurb_id, 7);
        assert_eq!(detail.checklist, Value::Object(Map::new()));
        assert!(detail.updated_at.is_none());
    }
}
