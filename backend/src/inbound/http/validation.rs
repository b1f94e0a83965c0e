//! Shared validation and coercion helpers for inbound HTTP adapters.
//!
//! Scanner and spreadsheet clients send loosely typed JSON: quantities and
//! prices arrive as numbers or numeric strings, flags as `1`/`"yes"`. These
//! helpers normalise that input before it reaches the domain and report
//! failures as `invalid_request` with `{field, code}` details.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use crate::domain::{EbayStatus, Error, PartsStatus, RefurbStatus, StockCode};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidNumber,
    OutOfRange,
    InvalidStatus,
    NotAnObject,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::NotAnObject => "not_an_object",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const QTY: FieldName = FieldName::new("qty");
pub(crate) const CODE: FieldName = FieldName::new("code");

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} is required")).with_code(ErrorCode::MissingField)
}

fn invalid_number_error(field: FieldName, value: &Value) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a number"))
        .with_value(ErrorCode::InvalidNumber, render(value))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Coerce a whole-number quantity from a JSON number or numeric string.
///
/// Absent values take `default`; with no default the field is required.
pub(crate) fn coerce_quantity(
    value: Option<&Value>,
    field: FieldName,
    default: Option<i32>,
) -> Result<i32, Error> {
    if is_absent(value) {
        return default.ok_or_else(|| missing_field_error(field));
    }
    let Some(raw) = value else {
        return Err(missing_field_error(field));
    };
    let parsed = match raw {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid_number_error(field, raw))
}

/// Reject quantities below `min`.
pub(crate) fn require_at_least(quantity: i32, min: i32, field: FieldName) -> Result<i32, Error> {
    if quantity < min {
        let name = field.as_str();
        let message = if min == 1 {
            format!("{name} must be a positive integer")
        } else {
            format!("{name} must be at least {min}")
        };
        return Err(ValidationError::new(field, message)
            .with_value(ErrorCode::OutOfRange, quantity.to_string()));
    }
    Ok(quantity)
}

fn parse_decimal(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Coerce an optional money value; absent means `None`.
pub(crate) fn coerce_optional_money(
    value: Option<&Value>,
    field: FieldName,
) -> Result<Option<Decimal>, Error> {
    if is_absent(value) {
        return Ok(None);
    }
    let Some(raw) = value else {
        return Ok(None);
    };
    parse_decimal(raw)
        .map(Some)
        .ok_or_else(|| invalid_number_error(field, raw))
}

/// Coerce a money value, defaulting to zero when absent.
pub(crate) fn coerce_money(value: Option<&Value>, field: FieldName) -> Result<Decimal, Error> {
    Ok(coerce_optional_money(value, field)?.unwrap_or(Decimal::ZERO))
}

/// Truthiness for loosely typed flags: `true`, `1`, `"1"`, `"yes"`, `"y"`,
/// `"true"` (case-insensitive). Everything else is false.
pub(crate) fn coerce_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => is_truthy_text(s),
        _ => false,
    }
}

/// Text form of [`coerce_flag`], used for multipart fields.
pub(crate) fn is_truthy_text(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "yes" | "y" | "true"
    )
}

/// Trim text, mapping blank to `None`.
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Require non-blank text.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    blank_to_none(value).ok_or_else(|| missing_field_error(field))
}

/// Require a JSON object; absent or null yields an empty map.
pub(crate) fn require_object(
    value: Option<Value>,
    field: FieldName,
) -> Result<Map<String, Value>, Error> {
    match value {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => {
            let name = field.as_str();
            Err(ValidationError::new(field, format!("{name} must be a JSON object"))
                .with_value(ErrorCode::NotAnObject, render(&other)))
        }
    }
}

/// The operator's code: the first non-blank of `sku`, `code`, `barcode`.
pub(crate) fn scanned_code(
    sku: Option<&str>,
    code: Option<&str>,
    barcode: Option<&str>,
) -> Result<StockCode, Error> {
    [sku, code, barcode]
        .into_iter()
        .flatten()
        .find_map(|raw| StockCode::parse(raw).ok())
        .ok_or_else(|| missing_field_error(CODE))
}

fn invalid_status_error(field: FieldName, value: &str, allowed: String) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be one of {allowed}"))
        .with_value(ErrorCode::InvalidStatus, value)
}

/// Parse an optional eBay status; blank means `None`.
pub(crate) fn parse_ebay_status(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<EbayStatus>, Error> {
    blank_to_none(value)
        .map(|raw| {
            raw.parse::<EbayStatus>().map_err(|_| {
                let allowed = EbayStatus::ALL
                    .iter()
                    .map(|status| status.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                invalid_status_error(field, &raw, allowed)
            })
        })
        .transpose()
}

/// Parse an optional refurb status; blank means `None`.
pub(crate) fn parse_refurb_status(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<RefurbStatus>, Error> {
    blank_to_none(value)
        .map(|raw| {
            raw.parse::<RefurbStatus>()
                .map_err(|err| invalid_status_error(field, &raw, err.allowed.to_owned()))
        })
        .transpose()
}

/// Parse an optional parts status; blank means `None`.
pub(crate) fn parse_parts_status(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<PartsStatus>, Error> {
    blank_to_none(value)
        .map(|raw| {
            raw.parse::<PartsStatus>()
                .map_err(|err| invalid_status_error(field, &raw, err.allowed.to_owned()))
        })
        .transpose()
}
