//! Inventory domain services.
//!
//! [`InventoryService`] implements the catalogue and stock driving ports on
//! top of the product repository, the stock ledger and the eBay update queue.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    EbayUpdateRepository, ProductCatalogue, ProductRepository, ProductRepositoryError,
    SmartAddOutcome, SmartAddRequest, StockCommand, StockLedger, StockLedgerError, StockOutcome,
    StockOperations,
};
use crate::domain::{
    EbayStatus, EbayStatusPatch, Error, NewEbayUpdate, Product, ProductDraft, ProductFilter,
    Sale, SaleDetails, SkuError, SkuPrefix, StockCode, SuffixShape, allocate_next_sku,
};

/// Note attached to queue entries written by smart-add.
pub const SMART_ADD_NOTE: &str = "smart-add";

pub(crate) fn map_product_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
        ProductRepositoryError::Duplicate { message } => {
            Error::conflict("sku or code already exists")
                .with_details(json!({ "reason": message }))
        }
        ProductRepositoryError::Rejected { message } => Error::invalid_request(message),
    }
}

pub(crate) fn map_ledger_error(error: StockLedgerError) -> Error {
    match error {
        StockLedgerError::Connection { message } => {
            Error::service_unavailable(format!("stock ledger unavailable: {message}"))
        }
        StockLedgerError::Query { message } => {
            Error::internal(format!("stock ledger error: {message}"))
        }
        StockLedgerError::ProductNotFound { .. } => Error::not_found("product not found"),
        StockLedgerError::InsufficientStock {
            available,
            requested,
        } => Error::invalid_request("insufficient stock").with_details(json!({
            "available": available,
            "requested": requested,
        })),
        StockLedgerError::Rejected { message } => Error::invalid_request(message),
    }
}

pub(crate) fn map_sku_error(error: SkuError) -> Error {
    match error {
        SkuError::InvalidPrefix => Error::invalid_request(error.to_string()),
        SkuError::Exhausted { .. } => Error::conflict(error.to_string()),
    }
}

/// Pick the product a code refers to.
///
/// A single match wins. Among several, the one whose SKU is exactly the code
/// wins; otherwise the code is ambiguous.
pub(crate) fn resolve_code(code: &StockCode, matches: Vec<Product>) -> Result<Product, Error> {
    if matches.len() <= 1 {
        return matches
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found("product not found"));
    }
    let skus: Vec<String> = matches.iter().map(|product| product.sku.clone()).collect();
    matches
        .into_iter()
        .find(|product| product.sku == code.as_str())
        .ok_or_else(|| {
            Error::conflict(format!("code {code} matches more than one product"))
                .with_details(json!({ "skus": skus }))
        })
}

fn require_positive(quantity: i32) -> Result<(), Error> {
    if quantity < 1 {
        return Err(Error::invalid_request("qty must be a positive integer"));
    }
    Ok(())
}

/// Catalogue and stock service.
#[derive(Clone)]
pub struct InventoryService<P, L, Q> {
    products: Arc<P>,
    ledger: Arc<L>,
    ebay_updates: Arc<Q>,
}

impl<P, L, Q> InventoryService<P, L, Q> {
    /// Create a service over the given adapters.
    pub fn new(products: Arc<P>, ledger: Arc<L>, ebay_updates: Arc<Q>) -> Self {
        Self {
            products,
            ledger,
            ebay_updates,
        }
    }
}

impl<P, L, Q> InventoryService<P, L, Q>
where
    P: ProductRepository,
    L: StockLedger,
    Q: EbayUpdateRepository,
{
    async fn resolve(&self, code: &StockCode) -> Result<Product, Error> {
        let matches = self
            .products
            .find_by_code(code)
            .await
            .map_err(map_product_error)?;
        resolve_code(code, matches)
    }

    async fn apply(&self, product_id: i32, command: StockCommand) -> Result<StockOutcome, Error> {
        self.ledger
            .apply(product_id, command)
            .await
            .map_err(map_ledger_error)
    }

    async fn allocate_sku(&self, category: &str) -> Result<String, Error> {
        let prefix = SkuPrefix::parse(category).map_err(map_sku_error)?;
        let existing = self
            .products
            .skus_with_prefix(&prefix)
            .await
            .map_err(map_product_error)?;
        allocate_next_sku(
            &prefix,
            existing.iter().map(String::as_str),
            SuffixShape::FourDigits,
        )
        .map_err(map_sku_error)
    }

    /// Restock `product` and queue a listing change when it is on eBay.
    async fn restock_known(
        &self,
        product: Product,
        quantity: i32,
    ) -> Result<SmartAddOutcome, Error> {
        let listed = product.is_listed();
        let outcome = self
            .apply(product.id, StockCommand::In { quantity })
            .await?;

        let mut ebay_update_queued = false;
        if listed {
            let update =
                NewEbayUpdate::for_transition(&outcome.product, &outcome.transition, SMART_ADD_NOTE);
            match self.ebay_updates.enqueue(&update).await {
                Ok(_) => ebay_update_queued = true,
                Err(err) => warn!(
                    error = %err,
                    sku = %outcome.product.sku,
                    "failed to queue ebay update after smart-add"
                ),
            }
        }

        Ok(SmartAddOutcome::StockedIn {
            product: outcome.product,
            ebay_update_queued,
        })
    }

    async fn create_from_scan(&self, request: SmartAddRequest) -> Result<SmartAddOutcome, Error> {
        let category = request
            .category
            .as_deref()
            .ok_or_else(|| Error::invalid_request("category is required for a new product"))?;
        let name = request
            .name
            .clone()
            .ok_or_else(|| Error::invalid_request("name is required for a new product"))?;
        let sku = self.allocate_sku(category).await?;
        let sku = StockCode::parse(&sku)
            .map_err(|err| Error::internal(format!("allocated sku invalid: {err}")))?;

        let draft = ProductDraft {
            sku,
            code: Some(request.code),
            name,
            notes: request.notes,
            on_ebay: false,
            ebay_status: EbayStatus::NotListed,
            ebay_notes: None,
            pricing: request.pricing,
            quantity: request.quantity,
        };
        let product = self
            .products
            .create(&draft)
            .await
            .map_err(map_product_error)?;
        info!(sku = %product.sku, quantity = product.quantity, "smart-add created product");
        Ok(SmartAddOutcome::Created { product })
    }
}

#[async_trait]
impl<P, L, Q> ProductCatalogue for InventoryService<P, L, Q>
where
    P: ProductRepository,
    L: StockLedger,
    Q: EbayUpdateRepository,
{
    async fn list(&self, filter: ProductFilter) -> Result<Vec<Product>, Error> {
        self.products.list(filter).await.map_err(map_product_error)
    }

    async fn get(&self, id: i32) -> Result<Product, Error> {
        self.products
            .find_by_id(id)
            .await
            .map_err(map_product_error)?
            .ok_or_else(|| Error::not_found("not found"))
    }

    async fn lookup(&self, code: StockCode) -> Result<Product, Error> {
        self.resolve(&code).await
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, Error> {
        if draft.quantity < 0 {
            return Err(Error::invalid_request("quantity must not be negative"));
        }
        self.products
            .create(&draft)
            .await
            .map_err(map_product_error)
    }

    async fn replace(&self, id: i32, draft: ProductDraft) -> Result<Product, Error> {
        if draft.quantity < 0 {
            return Err(Error::invalid_request("quantity must not be negative"));
        }
        self.products
            .replace(id, &draft)
            .await
            .map_err(map_product_error)?
            .ok_or_else(|| Error::not_found("not found"))
    }

    async fn update_ebay(&self, id: i32, patch: EbayStatusPatch) -> Result<Product, Error> {
        self.products
            .update_ebay(id, &patch)
            .await
            .map_err(map_product_error)?
            .ok_or_else(|| Error::not_found("not found"))
    }

    async fn delete(&self, id: i32) -> Result<bool, Error> {
        self.products.delete(id).await.map_err(map_product_error)
    }

    async fn next_sku(&self, category: String) -> Result<String, Error> {
        self.allocate_sku(&category).await
    }
}

#[async_trait]
impl<P, L, Q> StockOperations for InventoryService<P, L, Q>
where
    P: ProductRepository,
    L: StockLedger,
    Q: EbayUpdateRepository,
{
    async fn stock_in(&self, code: StockCode, quantity: i32) -> Result<Product, Error> {
        require_positive(quantity)?;
        let product = self.resolve(&code).await?;
        let outcome = self
            .apply(product.id, StockCommand::In { quantity })
            .await?;
        Ok(outcome.product)
    }

    async fn stock_out(
        &self,
        code: StockCode,
        quantity: i32,
        details: SaleDetails,
    ) -> Result<Product, Error> {
        require_positive(quantity)?;
        let product = self.resolve(&code).await?;
        let outcome = self
            .apply(product.id, StockCommand::Out { quantity, details })
            .await?;
        Ok(outcome.product)
    }

    async fn stock_take(&self, code: StockCode, quantity: i32) -> Result<Product, Error> {
        if quantity < 0 {
            return Err(Error::invalid_request("qty must not be negative"));
        }
        let product = self.resolve(&code).await?;
        let outcome = self
            .apply(product.id, StockCommand::Take { quantity })
            .await?;
        Ok(outcome.product)
    }

    async fn smart_add(&self, request: SmartAddRequest) -> Result<SmartAddOutcome, Error> {
        require_positive(request.quantity)?;
        let mut matches = self
            .products
            .find_by_code(&request.code)
            .await
            .map_err(map_product_error)?;

        if let Some(pick_id) = request.pick_id {
            let picked = matches
                .into_iter()
                .find(|product| product.id == pick_id)
                .ok_or_else(|| {
                    Error::invalid_request(format!(
                        "pick_id {pick_id} is not a candidate for {}",
                        request.code
                    ))
                })?;
            return self.restock_known(picked, request.quantity).await;
        }

        if matches.len() > 1 {
            return Ok(SmartAddOutcome::NeedsPick {
                candidates: matches,
            });
        }
        match matches.pop() {
            Some(product) => self.restock_known(product, request.quantity).await,
            None => self.create_from_scan(request).await,
        }
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, Error> {
        self.ledger.list_sales().await.map_err(map_ledger_error)
    }
}

#[cfg(test)]
#[path = "inventory_service_tests.rs"]
mod tests;
