//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, update the matching block here (or regenerate
//! with `diesel print-schema`).

diesel::table! {
    /// Sellable stock keyed by SKU.
    ///
    /// `quantity` carries a `CHECK (quantity >= 0)` constraint and
    /// `ebay_status` a closed-set check.
    products (id) {
        id -> Int4,
        /// Unique, trimmed and uppercased.
        sku -> Text,
        /// Alternate scan code; unique when present.
        code -> Nullable<Text>,
        name -> Text,
        notes -> Nullable<Text>,
        on_ebay -> Bool,
        ebay_status -> Text,
        ebay_notes -> Nullable<Text>,
        cost -> Numeric,
        retail -> Numeric,
        fees -> Numeric,
        postage -> Numeric,
        quantity -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable sales ledger. Pricing columns are per-unit snapshots.
    sales (id) {
        id -> Int4,
        /// Set to NULL when the product is deleted.
        product_id -> Nullable<Int4>,
        sku -> Text,
        quantity -> Int4,
        unit_cost -> Numeric,
        unit_retail -> Numeric,
        fees -> Numeric,
        postage -> Numeric,
        channel -> Text,
        order_ref -> Nullable<Text>,
        note -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pending listing changes for the operator to mirror on eBay.
    ebay_updates (id) {
        id -> Int4,
        sku -> Text,
        code -> Nullable<Text>,
        delta -> Int4,
        old_qty -> Int4,
        new_qty -> Int4,
        note -> Nullable<Text>,
        done -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Devices moving through the refurbishment workflow.
    refurb_items (id) {
        id -> Int4,
        sku -> Nullable<Text>,
        serial -> Nullable<Text>,
        description -> Text,
        status -> Text,
        parts_status -> Text,
        supplier -> Nullable<Text>,
        category -> Text,
        cpu -> Nullable<Text>,
        colour -> Nullable<Text>,
        storage -> Nullable<Text>,
        controller -> Nullable<Text>,
        cost -> Numeric,
        retail -> Numeric,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Extended device specs, one row per refurb item (cascade delete).
    refurb_details (refurb_id) {
        refurb_id -> Int4,
        specs_cpu -> Nullable<Text>,
        specs_ram -> Nullable<Text>,
        specs_storage -> Nullable<Text>,
        specs_gpu -> Nullable<Text>,
        specs_screen -> Nullable<Text>,
        os_version -> Nullable<Text>,
        specs_colour -> Nullable<Text>,
        specs_network -> Nullable<Text>,
        specs_condition -> Nullable<Text>,
        specs_firmware -> Nullable<Text>,
        specs_region -> Nullable<Text>,
        specs_bundle -> Nullable<Text>,
        parts_needed -> Nullable<Text>,
        parts_cost -> Numeric,
        /// Always a JSON object.
        checklist -> Jsonb,
        notes -> Nullable<Text>,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    customers (id) {
        id -> Int4,
        name -> Text,
        phone -> Nullable<Text>,
        email -> Nullable<Text>,
        address -> Nullable<Text>,
        id_image_path -> Nullable<Text>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Devices bought from customers. `refurb_id` has no foreign key.
    trade_ins (id) {
        id -> Int4,
        customer_id -> Nullable<Int4>,
        customer_name -> Text,
        customer_phone -> Nullable<Text>,
        customer_email -> Nullable<Text>,
        customer_address -> Nullable<Text>,
        serial -> Nullable<Text>,
        device_desc -> Text,
        valuation -> Nullable<Numeric>,
        agreed_value -> Nullable<Numeric>,
        id_image_path -> Nullable<Text>,
        refurb_id -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Last export time per export key.
    export_logs (key) {
        key -> Text,
        last_exported -> Timestamptz,
    }
}

diesel::joinable!(sales -> products (product_id));
diesel::joinable!(refurb_details -> refurb_items (refurb_id));
diesel::joinable!(trade_ins -> customers (customer_id));

diesel::allow_tables_to_appear_in_same_query!(
    products,
    sales,
    ebay_updates,
    refurb_items,
    refurb_details,
    customers,
    trade_ins,
    export_logs,
);
