//! SKU allocation per category prefix.
//!
//! Allocation is optimistic: two concurrent callers can compute the same
//! value. The unique constraint on `products.sku` rejects the loser.

use std::fmt;

/// Widest suffix the allocator pads to.
pub const SKU_DIGITS: usize = 4;

const SKU_MAX_SUFFIX: u64 = 9999;

/// Category prefix of one to three ASCII letters, stored upper-case.
///
/// # Examples
/// ```
/// use stockroom::domain::SkuPrefix;
///
/// let prefix = SkuPrefix::parse(" v ").expect("valid prefix");
/// assert_eq!(prefix.as_str(), "V");
/// assert!(SkuPrefix::parse("AB1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SkuPrefix(String);

/// Errors raised while allocating SKUs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkuError {
    /// The prefix is blank, too long or not alphabetic.
    #[error("category prefix must be 1-3 letters")]
    InvalidPrefix,
    /// Every suffix the shape allows is taken.
    #[error("sku range exhausted for prefix {prefix}")]
    Exhausted { prefix: String },
}

impl SkuPrefix {
    /// Trim and upper-case `raw`, accepting only 1-3 ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, SkuError> {
        let trimmed = raw.trim();
        let valid = (1..=3).contains(&trimmed.len())
            && trimmed.chars().all(|ch| ch.is_ascii_alphabetic());
        if !valid {
            return Err(SkuError::InvalidPrefix);
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Borrow the prefix.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SkuPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How strictly existing SKUs must match the `<prefix><digits>` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixShape {
    /// Exactly four digits. Used for products.
    FourDigits,
    /// Any non-empty digit run. Used for refurb items, whose older SKUs were
    /// not always padded. Suffixes grow past four digits instead of running
    /// out.
    AnyDigits,
}

impl SuffixShape {
    fn accepts(self, digits: &str) -> bool {
        let numeric = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
        match self {
            Self::FourDigits => numeric && digits.len() == SKU_DIGITS,
            Self::AnyDigits => numeric,
        }
    }

    fn ceiling(self) -> u64 {
        match self {
            Self::FourDigits => SKU_MAX_SUFFIX,
            Self::AnyDigits => u64::MAX,
        }
    }
}

/// Compute the SKU after the highest one already allocated under `prefix`.
///
/// Existing values that do not match `<prefix><digits>` are ignored, so
/// `A12B` or `AB0001` never influence the `A` sequence.
///
/// # Examples
/// ```
/// use stockroom::domain::{SkuPrefix, SuffixShape, allocate_next_sku};
///
/// let prefix = SkuPrefix::parse("A").expect("valid prefix");
/// let empty: [&str; 0] = [];
/// assert_eq!(allocate_next_sku(&prefix, empty, SuffixShape::FourDigits).unwrap(), "A0001");
/// assert_eq!(allocate_next_sku(&prefix, ["A0001"], SuffixShape::FourDigits).unwrap(), "A0002");
/// ```
pub fn allocate_next_sku<'a, I>(
    prefix: &SkuPrefix,
    existing: I,
    shape: SuffixShape,
) -> Result<String, SkuError>
where
    I: IntoIterator<Item = &'a str>,
{
    let highest = existing
        .into_iter()
        .filter_map(|sku| {
            sku.trim()
                .to_ascii_uppercase()
                .strip_prefix(prefix.as_str())
                .map(str::to_owned)
        })
        .filter(|digits| shape.accepts(digits))
        .filter_map(|digits| digits.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    let next = highest
        .checked_add(1)
        .filter(|next| *next <= shape.ceiling())
        .ok_or_else(|| SkuError::Exhausted {
            prefix: prefix.as_str().to_owned(),
        })?;
    Ok(format!("{prefix}{next:0width$}", width = SKU_DIGITS))
}
