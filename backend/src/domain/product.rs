//! Product catalogue entities.
//!
//! Products are the unit of stock. `sku` is the primary human identifier and
//! `code` an optional alternate (manufacturer part number, barcode); both are
//! stored trimmed and upper-cased so scans and typed input resolve the same
//! way.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalised identifier used for SKUs, alternate codes and lookups.
///
/// ## Invariants
/// - Never empty.
/// - Contains no leading or trailing whitespace.
/// - Upper-case.
///
/// # Examples
/// ```
/// use stockroom::domain::StockCode;
///
/// let code = StockCode::parse("  a0001 ").expect("valid code");
/// assert_eq!(code.as_str(), "A0001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StockCode(String);

/// Raised when an identifier is blank after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("code must not be blank")]
pub struct BlankStockCode;

impl StockCode {
    /// Trim and upper-case `raw`, rejecting blank input.
    pub fn parse(raw: &str) -> Result<Self, BlankStockCode> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BlankStockCode);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Like [`StockCode::parse`] but maps blank or missing input to `None`.
    pub fn parse_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| Self::parse(value).ok())
    }

    /// Borrow the normalised identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StockCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Operator-facing eBay listing state. Not synchronised with eBay itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EbayStatus {
    /// Never listed.
    #[default]
    NotListed,
    /// Stock arrived and the listing needs creating or relisting.
    ReadyToList,
    /// Listed on eBay.
    Listed,
    /// Stock ran out through a sale.
    SoldOnEbay,
}

/// Raised when parsing an unknown eBay status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ebay_status must be one of not_listed, ready_to_list, listed, sold_on_ebay (got {0})")]
pub struct UnknownEbayStatus(pub String);

impl EbayStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::NotListed,
        Self::ReadyToList,
        Self::Listed,
        Self::SoldOnEbay,
    ];

    /// Stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotListed => "not_listed",
            Self::ReadyToList => "ready_to_list",
            Self::Listed => "listed",
            Self::SoldOnEbay => "sold_on_ebay",
        }
    }
}

impl fmt::Display for EbayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EbayStatus {
    type Err = UnknownEbayStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownEbayStatus(s.to_owned()))
    }
}

/// Per-unit money values carried by products and copied onto sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitPricing {
    /// Purchase cost.
    pub cost: Decimal,
    /// Target selling price.
    pub retail: Decimal,
    /// Marketplace fees.
    pub fees: Decimal,
    /// Postage.
    pub postage: Decimal,
}

impl UnitPricing {
    /// Margin left per unit after cost, fees and postage.
    pub fn unit_profit(&self) -> Decimal {
        self.retail - self.cost - self.fees - self.postage
    }
}

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: i32,
    pub sku: String,
    pub code: Option<String>,
    pub name: String,
    pub notes: Option<String>,
    pub on_ebay: bool,
    pub ebay_status: EbayStatus,
    pub ebay_notes: Option<String>,
    pub cost: Decimal,
    pub retail: Decimal,
    pub fees: Decimal,
    pub postage: Decimal,
    /// Units on hand. Never negative.
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Pricing snapshot for sale records.
    pub fn pricing(&self) -> UnitPricing {
        UnitPricing {
            cost: self.cost,
            retail: self.retail,
            fees: self.fees,
            postage: self.postage,
        }
    }

    /// Whether quantity changes should be mirrored on an eBay listing.
    pub fn is_listed(&self) -> bool {
        self.on_ebay || self.ebay_status == EbayStatus::Listed
    }
}

/// Validated input for creating or fully replacing a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub sku: StockCode,
    pub code: Option<StockCode>,
    pub name: String,
    pub notes: Option<String>,
    pub on_ebay: bool,
    pub ebay_status: EbayStatus,
    pub ebay_notes: Option<String>,
    pub pricing: UnitPricing,
    pub quantity: i32,
}

/// Partial eBay bookkeeping update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EbayStatusPatch {
    pub ebay_status: Option<EbayStatus>,
    pub ebay_notes: Option<String>,
}

/// Listing filter for the catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub ebay_status: Option<EbayStatus>,
}

/// Number of products holding a given eBay status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EbayStatusCount {
    pub ebay_status: EbayStatus,
    pub count: i64,
}
