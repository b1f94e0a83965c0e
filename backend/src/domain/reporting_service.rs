//! Reporting and export services.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::inventory_service::{map_ledger_error, map_product_error};
use crate::domain::ports::{
    ExportLogRepository, ExportLogRepositoryError, Exports, ProductRepository, RefurbRepository,
    Reporting, StockLedger,
};
use crate::domain::refurb_service::map_refurb_error;
use crate::domain::{
    CashReport, DateRange, EbayStatusCount, Error, ExportKey, Product, ProductFilter,
    RefurbExportRow, StockReport, build_cash_report, build_stock_report,
};

fn map_export_log_error(error: ExportLogRepositoryError) -> Error {
    match error {
        ExportLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("export log unavailable: {message}"))
        }
        ExportLogRepositoryError::Query { message } => {
            Error::internal(format!("export log error: {message}"))
        }
    }
}

/// Service implementing [`Reporting`].
#[derive(Clone)]
pub struct ReportingService<P, L> {
    products: Arc<P>,
    ledger: Arc<L>,
}

impl<P, L> ReportingService<P, L> {
    /// Create a service reading products and the sales ledger.
    pub fn new(products: Arc<P>, ledger: Arc<L>) -> Self {
        Self { products, ledger }
    }
}

#[async_trait]
impl<P, L> Reporting for ReportingService<P, L>
where
    P: ProductRepository,
    L: StockLedger,
{
    async fn stock_report(&self) -> Result<StockReport, Error> {
        let products = self
            .products
            .list(ProductFilter::default())
            .await
            .map_err(map_product_error)?;
        Ok(build_stock_report(&products))
    }

    async fn cash_report(&self, range: DateRange) -> Result<CashReport, Error> {
        let sales = self
            .ledger
            .sales_between(range.start(), range.end_exclusive())
            .await
            .map_err(map_ledger_error)?;
        Ok(build_cash_report(range, &sales))
    }

    async fn ebay_status_counts(&self) -> Result<Vec<EbayStatusCount>, Error> {
        self.products
            .ebay_status_counts()
            .await
            .map_err(map_product_error)
    }
}

/// Service implementing [`Exports`].
#[derive(Clone)]
pub struct ExportService<P, R, E> {
    products: Arc<P>,
    refurbs: Arc<R>,
    log: Arc<E>,
}

impl<P, R, E> ExportService<P, R, E> {
    /// Create a service over the product and refurb stores and the export log.
    pub fn new(products: Arc<P>, refurbs: Arc<R>, log: Arc<E>) -> Self {
        Self {
            products,
            refurbs,
            log,
        }
    }
}

impl<P, R, E> ExportService<P, R, E>
where
    E: ExportLogRepository,
{
    async fn stamp(&self, key: ExportKey) -> Result<(), Error> {
        self.log
            .record(key, Utc::now())
            .await
            .map_err(map_export_log_error)
    }
}

#[async_trait]
impl<P, R, E> Exports for ExportService<P, R, E>
where
    P: ProductRepository,
    R: RefurbRepository,
    E: ExportLogRepository,
{
    async fn products(&self) -> Result<Vec<Product>, Error> {
        let mut products = self
            .products
            .list(ProductFilter::default())
            .await
            .map_err(map_product_error)?;
        products.sort_by_key(|product| product.id);
        self.stamp(ExportKey::Products).await?;
        Ok(products)
    }

    async fn refurb(&self) -> Result<Vec<RefurbExportRow>, Error> {
        let rows = self
            .refurbs
            .export_rows()
            .await
            .map_err(map_refurb_error)?;
        self.stamp(ExportKey::Refurb).await?;
        Ok(rows)
    }

    async fn last_exported(&self) -> Result<BTreeMap<String, DateTime<Utc>>, Error> {
        let stamps = self.log.list().await.map_err(map_export_log_error)?;
        Ok(stamps
            .into_iter()
            .map(|stamp| (stamp.key, stamp.last_exported))
            .collect())
    }
}
