//! Customers and the trade-ins they bring in.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A repeat trade-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub id_image_path: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated customer fields for create and replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub id_image_path: Option<String>,
    pub notes: Option<String>,
}

/// A device bought from a customer.
///
/// `refurb_id` points at the refurb item spawned for the device, if any. It is
/// not enforced by the store and survives deletion of that item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeIn {
    pub id: i32,
    pub customer_id: Option<i32>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub serial: Option<String>,
    pub device_desc: String,
    pub valuation: Option<Decimal>,
    pub agreed_value: Option<Decimal>,
    pub id_image_path: Option<String>,
    pub refurb_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Contact fields entered on a trade-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeInContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl TradeInContact {
    /// Fill blanks from a stored customer. Typed values win.
    pub fn fill_from(self, customer: &Customer) -> Self {
        Self {
            name: self.name.or_else(|| Some(customer.name.clone())),
            phone: self.phone.or_else(|| customer.phone.clone()),
            email: self.email.or_else(|| customer.email.clone()),
            address: self.address.or_else(|| customer.address.clone()),
        }
    }
}

/// An ID image received with a trade-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdImageUpload {
    pub original_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Intake request as received from the operator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeInIntakeRequest {
    pub customer_id: Option<i32>,
    pub contact: TradeInContact,
    pub serial: Option<String>,
    pub device_desc: Option<String>,
    pub valuation: Option<Decimal>,
    pub agreed_value: Option<Decimal>,
    pub create_refurb: bool,
    pub id_image: Option<IdImageUpload>,
}

/// Row written for a validated trade-in.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTradeIn {
    pub customer_id: Option<i32>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub serial: Option<String>,
    pub device_desc: String,
    pub valuation: Option<Decimal>,
    pub agreed_value: Option<Decimal>,
    pub id_image_path: Option<String>,
    pub refurb_id: Option<i32>,
}
