//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Status columns are stored as text; rows
//! convert into domain types through `into_domain`, which rejects values
//! outside the closed sets.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::{
    Customer, CustomerDraft, EbayStatus, EbayUpdate, NewEbayUpdate, NewTradeIn, PartsStatus,
    Product, ProductDraft, RefurbDetail, RefurbDetailDraft, RefurbDraft, RefurbItem,
    RefurbStatus, Sale, TradeIn,
};

use super::schema::{
    customers, ebay_updates, export_logs, products, refurb_details, refurb_items, sales,
    trade_ins,
};

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: i32,
    pub sku: String,
    pub code: Option<String>,
    pub name: String,
    pub notes: Option<String>,
    pub on_ebay: bool,
    pub ebay_status: String,
    pub ebay_notes: Option<String>,
    pub cost: Decimal,
    pub retail: Decimal,
    pub fees: Decimal,
    pub postage: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl ProductRow {
    pub fn into_domain(self) -> Result<Product, String> {
        let ebay_status = self
            .ebay_status
            .parse::<EbayStatus>()
            .map_err(|err| format!("product {}: {err}", self.id))?;
        Ok(Product {
            id: self.id,
            sku: self.sku,
            code: self.code,
            name: self.name,
            notes: self.notes,
            on_ebay: self.on_ebay,
            ebay_status,
            ebay_notes: self.ebay_notes,
            cost: self.cost,
            retail: self.retail,
            fees: self.fees,
            postage: self.postage,
            quantity: self.quantity,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating product records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub sku: &'a str,
    pub code: Option<&'a str>,
    pub name: &'a str,
    pub notes: Option<&'a str>,
    pub on_ebay: bool,
    pub ebay_status: &'a str,
    pub ebay_notes: Option<&'a str>,
    pub cost: Decimal,
    pub retail: Decimal,
    pub fees: Decimal,
    pub postage: Decimal,
    pub quantity: i32,
}

impl<'a> From<&'a ProductDraft> for NewProductRow<'a> {
    fn from(draft: &'a ProductDraft) -> Self {
        Self {
            sku: draft.sku.as_str(),
            code: draft.code.as_ref().map(|code| code.as_str()),
            name: draft.name.as_str(),
            notes: draft.notes.as_deref(),
            on_ebay: draft.on_ebay,
            ebay_status: draft.ebay_status.as_str(),
            ebay_notes: draft.ebay_notes.as_deref(),
            cost: draft.pricing.cost,
            retail: draft.pricing.retail,
            fees: draft.pricing.fees,
            postage: draft.pricing.postage,
            quantity: draft.quantity,
        }
    }
}

/// Full-replace changeset. eBay status and notes are left to the eBay patch.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProductUpdate<'a> {
    pub sku: &'a str,
    pub code: Option<&'a str>,
    pub name: &'a str,
    pub notes: Option<&'a str>,
    pub on_ebay: bool,
    pub cost: Decimal,
    pub retail: Decimal,
    pub fees: Decimal,
    pub postage: Decimal,
    pub quantity: i32,
}

impl<'a> From<&'a ProductDraft> for ProductUpdate<'a> {
    fn from(draft: &'a ProductDraft) -> Self {
        Self {
            sku: draft.sku.as_str(),
            code: draft.code.as_ref().map(|code| code.as_str()),
            name: draft.name.as_str(),
            notes: draft.notes.as_deref(),
            on_ebay: draft.on_ebay,
            cost: draft.pricing.cost,
            retail: draft.pricing.retail,
            fees: draft.pricing.fees,
            postage: draft.pricing.postage,
            quantity: draft.quantity,
        }
    }
}

/// eBay patch; `None` fields keep their stored value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub(crate) struct EbayPatchUpdate<'a> {
    pub ebay_status: Option<&'a str>,
    pub ebay_notes: Option<&'a str>,
}

/// Quantity change applied by the stock ledger.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub(crate) struct StockUpdate<'a> {
    pub quantity: i32,
    pub ebay_status: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

/// Row struct for reading from the sales table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sales)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SaleRow {
    pub id: i32,
    pub product_id: Option<i32>,
    pub sku: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub unit_retail: Decimal,
    pub fees: Decimal,
    pub postage: Decimal,
    pub channel: String,
    pub order_ref: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            sku: row.sku,
            quantity: row.quantity,
            unit_cost: row.unit_cost,
            unit_retail: row.unit_retail,
            fees: row.fees,
            postage: row.postage,
            channel: row.channel,
            order_ref: row.order_ref,
            note: row.note,
            created_at: row.created_at,
        }
    }
}

/// Insertable sale snapshot.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sales)]
pub(crate) struct NewSaleRow<'a> {
    pub product_id: i32,
    pub sku: &'a str,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub unit_retail: Decimal,
    pub fees: Decimal,
    pub postage: Decimal,
    pub channel: &'a str,
    pub order_ref: Option<&'a str>,
    pub note: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// eBay update queue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ebay_updates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EbayUpdateRow {
    pub id: i32,
    pub sku: String,
    pub code: Option<String>,
    pub delta: i32,
    pub old_qty: i32,
    pub new_qty: i32,
    pub note: Option<String>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

impl From<EbayUpdateRow> for EbayUpdate {
    fn from(row: EbayUpdateRow) -> Self {
        Self {
            id: row.id,
            sku: row.sku,
            code: row.code,
            delta: row.delta,
            old_qty: row.old_qty,
            new_qty: row.new_qty,
            note: row.note,
            done: row.done,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ebay_updates)]
pub(crate) struct NewEbayUpdateRow<'a> {
    pub sku: &'a str,
    pub code: Option<&'a str>,
    pub delta: i32,
    pub old_qty: i32,
    pub new_qty: i32,
    pub note: Option<&'a str>,
}

impl<'a> From<&'a NewEbayUpdate> for NewEbayUpdateRow<'a> {
    fn from(update: &'a NewEbayUpdate) -> Self {
        Self {
            sku: update.sku.as_str(),
            code: update.code.as_deref(),
            delta: update.delta,
            old_qty: update.old_qty,
            new_qty: update.new_qty,
            note: update.note.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Refurbishment
// ---------------------------------------------------------------------------

/// Row struct for reading from the refurb_items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = refurb_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RefurbItemRow {
    pub id: i32,
    pub sku: Option<String>,
    pub serial: Option<String>,
    pub description: String,
    pub status: String,
    pub parts_status: String,
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

impl RefurbItemRow {
    pub fn into_domain(self) -> Result<RefurbItem, String> {
        let status = self
            .status
            .parse::<RefurbStatus>()
            .map_err(|err| format!("refurb item {}: {err}", self.id))?;
        let parts_status = self
            .parts_status
            .parse::<PartsStatus>()
            .map_err(|err| format!("refurb item {}: {err}", self.id))?;
        Ok(RefurbItem {
            id: self.id,
            sku: self.sku,
            serial: self.serial,
            description: self.description,
            status,
            parts_status,
            supplier: self.supplier,
            category: self.category,
            cpu: self.cpu,
            colour: self.colour,
            storage: self.storage,
            controller: self.controller,
            cost: self.cost,
            retail: self.retail,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

/// Insert and full-replace payload for refurb items.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = refurb_items)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RefurbItemWrite<'a> {
    pub sku: Option<&'a str>,
    pub serial: Option<&'a str>,
    pub description: &'a str,
    pub status: &'a str,
    pub parts_status: &'a str,
    pub supplier: Option<&'a str>,
    pub category: &'a str,
    pub cpu: Option<&'a str>,
    pub colour: Option<&'a str>,
    pub storage: Option<&'a str>,
    pub controller: Option<&'a str>,
    pub cost: Decimal,
    pub retail: Decimal,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a RefurbDraft> for RefurbItemWrite<'a> {
    fn from(draft: &'a RefurbDraft) -> Self {
        Self {
            sku: draft.sku.as_deref(),
            serial: draft.serial.as_deref(),
            description: draft.description.as_str(),
            status: draft.status.as_str(),
            parts_status: draft.parts_status.as_str(),
            supplier: draft.supplier.as_deref(),
            category: draft.category.as_str(),
            cpu: draft.cpu.as_deref(),
            colour: draft.colour.as_deref(),
            storage: draft.storage.as_deref(),
            controller: draft.controller.as_deref(),
            cost: draft.cost,
            retail: draft.retail,
            notes: draft.notes.as_deref(),
        }
    }
}

/// Row struct for reading from the refurb_details table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = refurb_details)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RefurbDetailRow {
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
    pub checklist: Value,
    pub notes: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RefurbDetailRow> for RefurbDetail {
    fn from(row: RefurbDetailRow) -> Self {
        Self {
            refurb_id: row.refurb_id,
            specs_cpu: row.specs_cpu,
            specs_ram: row.specs_ram,
            specs_storage: row.specs_storage,
            specs_gpu: row.specs_gpu,
            specs_screen: row.specs_screen,
            os_version: row.os_version,
            specs_colour: row.specs_colour,
            specs_network: row.specs_network,
            specs_condition: row.specs_condition,
            specs_firmware: row.specs_firmware,
            specs_region: row.specs_region,
            specs_bundle: row.specs_bundle,
            parts_needed: row.parts_needed,
            parts_cost: row.parts_cost,
            checklist: row.checklist,
            notes: row.notes,
            updated_at: row.updated_at,
        }
    }
}

/// Upsert payload for refurb details.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = refurb_details)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RefurbDetailWrite<'a> {
    pub refurb_id: i32,
    pub specs_cpu: Option<&'a str>,
    pub specs_ram: Option<&'a str>,
    pub specs_storage: Option<&'a str>,
    pub specs_gpu: Option<&'a str>,
    pub specs_screen: Option<&'a str>,
    pub os_version: Option<&'a str>,
    pub specs_colour: Option<&'a str>,
    pub specs_network: Option<&'a str>,
    pub specs_condition: Option<&'a str>,
    pub specs_firmware: Option<&'a str>,
    pub specs_region: Option<&'a str>,
    pub specs_bundle: Option<&'a str>,
    pub parts_needed: Option<&'a str>,
    pub parts_cost: Decimal,
    pub checklist: Value,
    pub notes: Option<&'a str>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<'a> RefurbDetailWrite<'a> {
    pub fn new(refurb_id: i32, draft: &'a RefurbDetailDraft, updated_at: DateTime<Utc>) -> Self {
        Self {
            refurb_id,
            specs_cpu: draft.specs_cpu.as_deref(),
            specs_ram: draft.specs_ram.as_deref(),
            specs_storage: draft.specs_storage.as_deref(),
            specs_gpu: draft.specs_gpu.as_deref(),
            specs_screen: draft.specs_screen.as_deref(),
            os_version: draft.os_version.as_deref(),
            specs_colour: draft.specs_colour.as_deref(),
            specs_network: draft.specs_network.as_deref(),
            specs_condition: draft.specs_condition.as_deref(),
            specs_firmware: draft.specs_firmware.as_deref(),
            specs_region: draft.specs_region.as_deref(),
            specs_bundle: draft.specs_bundle.as_deref(),
            parts_needed: draft.parts_needed.as_deref(),
            parts_cost: draft.parts_cost,
            checklist: Value::Object(draft.checklist.clone()),
            notes: draft.notes.as_deref(),
            updated_at: Some(updated_at),
        }
    }
}

// ---------------------------------------------------------------------------
// Customers and trade-ins
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
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

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            id_image_path: row.id_image_path,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert payload for customers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub(crate) struct NewCustomerRow<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub id_image_path: Option<&'a str>,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a CustomerDraft> for NewCustomerRow<'a> {
    fn from(draft: &'a CustomerDraft) -> Self {
        Self {
            name: draft.name.as_str(),
            phone: draft.phone.as_deref(),
            email: draft.email.as_deref(),
            address: draft.address.as_deref(),
            id_image_path: draft.id_image_path.as_deref(),
            notes: draft.notes.as_deref(),
        }
    }
}

/// Full-replace changeset for customers; refreshes `updated_at`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = customers)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CustomerUpdate<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub id_image_path: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> CustomerUpdate<'a> {
    pub fn new(draft: &'a CustomerDraft, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: draft.name.as_str(),
            phone: draft.phone.as_deref(),
            email: draft.email.as_deref(),
            address: draft.address.as_deref(),
            id_image_path: draft.id_image_path.as_deref(),
            notes: draft.notes.as_deref(),
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trade_ins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TradeInRow {
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

impl From<TradeInRow> for TradeIn {
    fn from(row: TradeInRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            customer_address: row.customer_address,
            serial: row.serial,
            device_desc: row.device_desc,
            valuation: row.valuation,
            agreed_value: row.agreed_value,
            id_image_path: row.id_image_path,
            refurb_id: row.refurb_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trade_ins)]
pub(crate) struct NewTradeInRow<'a> {
    pub customer_id: Option<i32>,
    pub customer_name: &'a str,
    pub customer_phone: Option<&'a str>,
    pub customer_email: Option<&'a str>,
    pub customer_address: Option<&'a str>,
    pub serial: Option<&'a str>,
    pub device_desc: &'a str,
    pub valuation: Option<Decimal>,
    pub agreed_value: Option<Decimal>,
    pub id_image_path: Option<&'a str>,
    pub refurb_id: Option<i32>,
}

impl<'a> From<&'a NewTradeIn> for NewTradeInRow<'a> {
    fn from(record: &'a NewTradeIn) -> Self {
        Self {
            customer_id: record.customer_id,
            customer_name: record.customer_name.as_str(),
            customer_phone: record.customer_phone.as_deref(),
            customer_email: record.customer_email.as_deref(),
            customer_address: record.customer_address.as_deref(),
            serial: record.serial.as_deref(),
            device_desc: record.device_desc.as_str(),
            valuation: record.valuation,
            agreed_value: record.agreed_value,
            id_image_path: record.id_image_path.as_deref(),
            refurb_id: record.refurb_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Export log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = export_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExportLogRow {
    pub key: String,
    pub last_exported: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StockCode, UnitPricing};
    use rstest::rstest;

    fn product_row(status: &str) -> ProductRow {
        ProductRow {
            id: 4,
            sku: "A0004".to_owned(),
            code: None,
            name: "Cable".to_owned(),
            notes: None,
            on_ebay: false,
            ebay_status: status.to_owned(),
            ebay_notes: None,
            cost: Decimal::ONE,
            retail: Decimal::TWO,
            fees: Decimal::ZERO,
            postage: Decimal::ZERO,
            quantity: 3,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("listed", EbayStatus::Listed)]
    #[case("sold_on_ebay", EbayStatus::SoldOnEbay)]
    fn product_rows_parse_status(#[case] stored: &str, #[case] expected: EbayStatus) {
        let product = product_row(stored).into_domain().expect("known status");
        assert_eq!(product.ebay_status, expected);
    }

    #[rstest]
    fn product_rows_reject_unknown_status() {
        let err = product_row("archived").into_domain().expect_err("unknown status");
        assert!(err.contains("product 4"));
    }

    #[rstest]
    fn product_writes_borrow_normalised_codes() {
        let draft = ProductDraft {
            sku: StockCode::parse(" a0001 ").expect("sku"),
            code: StockCode::parse_optional(Some("bar-1")),
            name: "Mouse".to_owned(),
            notes: None,
            on_ebay: true,
            ebay_status: EbayStatus::Listed,
            ebay_notes: None,
            pricing: UnitPricing::default(),
            quantity: 2,
        };
        let row = NewProductRow::from(&draft);
        assert_eq!(row.sku, "A0001");
        assert_eq!(row.code, Some("BAR-1"));
        assert_eq!(row.ebay_status, "listed");
    }

    #[rstest]
    fn detail_writes_store_checklist_as_object() {
        let mut draft = RefurbDetailDraft::default();
        draft
            .checklist
            .insert("battery".to_owned(), Value::Bool(true));
        let row = RefurbDetailWrite::new(7, &draft, Utc::now());
        assert_eq!(row.checklist, serde_json::json!({"battery": true}));
        assert!(row.updated_at.is_some());
    }
}
