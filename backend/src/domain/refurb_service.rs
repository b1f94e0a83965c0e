//! Refurbishment workflow service.
//!
//! Besides plain record keeping, the service feeds completed devices into
//! product stock. That sync is best effort: the refurb record is the source of
//! truth and a failed sync only produces a warning.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::inventory_service::{map_ledger_error, map_product_error, map_sku_error};
use crate::domain::ports::{
    ProductRepository, RefurbRepository, RefurbRepositoryError, RefurbWorkflow, StockCommand,
    StockLedger,
};
use crate::domain::{
    EbayStatus, Error, ProductDraft, RefurbDetail, RefurbDetailDraft, RefurbDraft, RefurbFilter,
    RefurbItem, SkuPrefix, StockCode, SuffixShape, UnitPricing, allocate_next_sku,
};

pub(crate) fn map_refurb_error(error: RefurbRepositoryError) -> Error {
    match error {
        RefurbRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("refurb repository unavailable: {message}"))
        }
        RefurbRepositoryError::Query { message } => {
            Error::internal(format!("refurb repository error: {message}"))
        }
        RefurbRepositoryError::Rejected { message } => Error::invalid_request(message),
    }
}

/// Service implementing [`RefurbWorkflow`].
#[derive(Clone)]
pub struct RefurbService<R, P, L> {
    refurbs: Arc<R>,
    products: Arc<P>,
    ledger: Arc<L>,
}

impl<R, P, L> RefurbService<R, P, L> {
    /// Create a service over the refurb store and the stock adapters used for
    /// completion sync.
    pub fn new(refurbs: Arc<R>, products: Arc<P>, ledger: Arc<L>) -> Self {
        Self {
            refurbs,
            products,
            ledger,
        }
    }
}

impl<R, P, L> RefurbService<R, P, L>
where
    R: RefurbRepository,
    P: ProductRepository,
    L: StockLedger,
{
    async fn require_item(&self, id: i32) -> Result<RefurbItem, Error> {
        self.refurbs
            .find_by_id(id)
            .await
            .map_err(map_refurb_error)?
            .ok_or_else(|| Error::not_found(format!("refurb item {id} not found")))
    }

    async fn sync_completed(&self, item: &RefurbItem) {
        let Some(sku) = StockCode::parse_optional(item.sku.as_deref()) else {
            return;
        };
        if let Err(err) = self.stock_completed(&sku, item).await {
            warn!(
                error = %err,
                refurb_id = item.id,
                sku = %sku,
                "refurb completion stock sync failed"
            );
        }
    }

    async fn stock_completed(&self, sku: &StockCode, item: &RefurbItem) -> Result<(), Error> {
        let existing = self
            .products
            .find_by_code(sku)
            .await
            .map_err(map_product_error)?
            .into_iter()
            .find(|product| product.sku == sku.as_str());

        match existing {
            Some(product) => {
                let outcome = self
                    .ledger
                    .apply(product.id, StockCommand::In { quantity: 1 })
                    .await
                    .map_err(map_ledger_error)?;
                info!(
                    refurb_id = item.id,
                    sku = %sku,
                    quantity = outcome.product.quantity,
                    "refurb completion stocked existing product"
                );
            }
            None => {
                let draft = ProductDraft {
                    sku: sku.clone(),
                    code: None,
                    name: item.description.clone(),
                    notes: None,
                    on_ebay: false,
                    ebay_status: EbayStatus::NotListed,
                    ebay_notes: None,
                    pricing: UnitPricing {
                        cost: item.cost,
                        retail: item.retail,
                        ..UnitPricing::default()
                    },
                    quantity: 1,
                };
                self.products
                    .create(&draft)
                    .await
                    .map_err(map_product_error)?;
                info!(refurb_id = item.id, sku = %sku, "refurb completion created product");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<R, P, L> RefurbWorkflow for RefurbService<R, P, L>
where
    R: RefurbRepository,
    P: ProductRepository,
    L: StockLedger,
{
    async fn list(&self, filter: RefurbFilter) -> Result<Vec<RefurbItem>, Error> {
        self.refurbs.list(&filter).await.map_err(map_refurb_error)
    }

    async fn get(&self, id: i32) -> Result<RefurbItem, Error> {
        self.require_item(id).await
    }

    async fn create(&self, draft: RefurbDraft) -> Result<RefurbItem, Error> {
        let item = self
            .refurbs
            .create(&draft)
            .await
            .map_err(map_refurb_error)?;
        if item.status.completes_from(None) {
            self.sync_completed(&item).await;
        }
        Ok(item)
    }

    async fn replace(&self, id: i32, draft: RefurbDraft) -> Result<RefurbItem, Error> {
        let replaced = self
            .refurbs
            .replace(id, &draft)
            .await
            .map_err(map_refurb_error)?
            .ok_or_else(|| Error::not_found(format!("refurb item {id} not found")))?;
        if replaced
            .item
            .status
            .completes_from(Some(replaced.previous_status))
        {
            self.sync_completed(&replaced.item).await;
        }
        Ok(replaced.item)
    }

    async fn delete(&self, id: i32) -> Result<bool, Error> {
        self.refurbs.delete(id).await.map_err(map_refurb_error)
    }

    async fn next_sku(&self, prefix: String) -> Result<String, Error> {
        let prefix = SkuPrefix::parse(&prefix).map_err(map_sku_error)?;
        let existing = self
            .refurbs
            .skus_with_prefix(&prefix)
            .await
            .map_err(map_refurb_error)?;
        allocate_next_sku(
            &prefix,
            existing.iter().map(String::as_str),
            SuffixShape::AnyDigits,
        )
        .map_err(map_sku_error)
    }

    async fn detail(&self, id: i32) -> Result<RefurbDetail, Error> {
        self.require_item(id).await?;
        let stored = self
            .refurbs
            .find_detail(id)
            .await
            .map_err(map_refurb_error)?;
        Ok(stored.unwrap_or_else(|| RefurbDetail::empty(id)))
    }

    async fn save_detail(&self, id: i32, draft: RefurbDetailDraft) -> Result<RefurbDetail, Error> {
        self.require_item(id).await?;
        self.refurbs
            .upsert_detail(id, &draft)
            .await
            .map_err(map_refurb_error)
    }
}

#[cfg(test)]
#[path = "refurb_service_tests.rs"]
mod tests;
