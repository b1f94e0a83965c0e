//! Customer directory and trade-in intake services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    CustomerDirectory, CustomerRepository, CustomerRepositoryError, IdImageStore,
    IdImageStoreError, RefurbRepository, TradeInIntake, TradeInRepository,
    TradeInRepositoryError,
};
use crate::domain::refurb_service::map_refurb_error;
use crate::domain::{
    Customer, CustomerDraft, Error, NewTradeIn, RefurbDraft, TradeIn, TradeInIntakeRequest,
};

/// Supplier recorded on refurb items spawned by a trade-in.
pub const TRADE_IN_SUPPLIER: &str = "trade-in";

fn map_customer_error(error: CustomerRepositoryError) -> Error {
    match error {
        CustomerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("customer repository unavailable: {message}"))
        }
        CustomerRepositoryError::Query { message } => {
            Error::internal(format!("customer repository error: {message}"))
        }
    }
}

fn map_trade_in_error(error: TradeInRepositoryError) -> Error {
    match error {
        TradeInRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("trade-in repository unavailable: {message}"))
        }
        TradeInRepositoryError::Query { message } => {
            Error::internal(format!("trade-in repository error: {message}"))
        }
        TradeInRepositoryError::UnknownCustomer { customer_id } => {
            Error::invalid_request(format!("customer {customer_id} not found"))
        }
    }
}

fn map_image_error(error: IdImageStoreError) -> Error {
    match error {
        IdImageStoreError::Io { message } => {
            Error::internal(format!("failed to store id image: {message}"))
        }
    }
}

fn require_name(draft: &CustomerDraft) -> Result<(), Error> {
    if draft.name.trim().is_empty() {
        return Err(Error::invalid_request("name is required"));
    }
    Ok(())
}

/// Service implementing [`CustomerDirectory`].
#[derive(Clone)]
pub struct CustomerService<C> {
    customers: Arc<C>,
}

impl<C> CustomerService<C> {
    /// Create a new service with the customer repository.
    pub fn new(customers: Arc<C>) -> Self {
        Self { customers }
    }
}

#[async_trait]
impl<C> CustomerDirectory for CustomerService<C>
where
    C: CustomerRepository,
{
    async fn list(&self, search: Option<String>) -> Result<Vec<Customer>, Error> {
        let search = search
            .map(|term| term.trim().to_owned())
            .filter(|term| !term.is_empty());
        self.customers
            .list(search)
            .await
            .map_err(map_customer_error)
    }

    async fn get(&self, id: i32) -> Result<Customer, Error> {
        self.customers
            .find_by_id(id)
            .await
            .map_err(map_customer_error)?
            .ok_or_else(|| Error::not_found(format!("customer {id} not found")))
    }

    async fn create(&self, draft: CustomerDraft) -> Result<Customer, Error> {
        require_name(&draft)?;
        self.customers
            .create(&draft)
            .await
            .map_err(map_customer_error)
    }

    async fn replace(&self, id: i32, draft: CustomerDraft) -> Result<Customer, Error> {
        require_name(&draft)?;
        self.customers
            .replace(id, &draft)
            .await
            .map_err(map_customer_error)?
            .ok_or_else(|| Error::not_found(format!("customer {id} not found")))
    }
}

/// Service implementing [`TradeInIntake`].
#[derive(Clone)]
pub struct TradeInService<T, C, R, S> {
    trade_ins: Arc<T>,
    customers: Arc<C>,
    refurbs: Arc<R>,
    images: Arc<S>,
}

impl<T, C, R, S> TradeInService<T, C, R, S> {
    /// Create a service over the trade-in, customer and refurb stores and the
    /// ID image store.
    pub fn new(trade_ins: Arc<T>, customers: Arc<C>, refurbs: Arc<R>, images: Arc<S>) -> Self {
        Self {
            trade_ins,
            customers,
            refurbs,
            images,
        }
    }
}

impl<T, C, R, S> TradeInService<T, C, R, S>
where
    R: RefurbRepository,
    S: IdImageStore,
{
    /// Undo the side effects of an intake whose record was never written.
    async fn discard(&self, refurb_id: Option<i32>, id_image_path: Option<&str>) {
        if let Some(id) = refurb_id {
            if let Err(err) = self.refurbs.delete(id).await {
                warn!(error = %err, refurb_id = id, "failed to remove refurb item of rejected trade-in");
            }
        }
        if let Some(path) = id_image_path {
            if let Err(err) = self.images.remove(path).await {
                warn!(error = %err, file = path, "failed to remove id image of rejected trade-in");
            }
        }
    }
}

#[async_trait]
impl<T, C, R, S> TradeInIntake for TradeInService<T, C, R, S>
where
    T: TradeInRepository,
    C: CustomerRepository,
    R: RefurbRepository,
    S: IdImageStore,
{
    async fn list(&self) -> Result<Vec<TradeIn>, Error> {
        self.trade_ins.list().await.map_err(map_trade_in_error)
    }

    async fn intake(&self, request: TradeInIntakeRequest) -> Result<TradeIn, Error> {
        let TradeInIntakeRequest {
            customer_id,
            contact,
            serial,
            device_desc,
            valuation,
            agreed_value,
            create_refurb,
            id_image,
        } = request;

        let device_desc =
            device_desc.ok_or_else(|| Error::invalid_request("device_desc is required"))?;

        let contact = match customer_id {
            Some(id) => {
                let customer = self
                    .customers
                    .find_by_id(id)
                    .await
                    .map_err(map_customer_error)?
                    .ok_or_else(|| Error::invalid_request(format!("customer {id} not found")))?;
                contact.fill_from(&customer)
            }
            None => contact,
        };
        let customer_name = contact
            .name
            .clone()
            .ok_or_else(|| Error::invalid_request("customer_name is required"))?;

        let id_image_path = match id_image {
            Some(upload) => Some(
                self.images
                    .store(upload.original_name, upload.bytes)
                    .await
                    .map_err(map_image_error)?,
            ),
            None => None,
        };

        let refurb_id = if create_refurb {
            let draft = RefurbDraft {
                serial: serial.clone(),
                supplier: Some(TRADE_IN_SUPPLIER.to_owned()),
                cost: agreed_value.unwrap_or_default(),
                ..RefurbDraft::described(device_desc.clone())
            };
            let item = match self.refurbs.create(&draft).await {
                Ok(item) => item,
                Err(err) => {
                    self.discard(None, id_image_path.as_deref()).await;
                    return Err(map_refurb_error(err));
                }
            };
            info!(refurb_id = item.id, "trade-in spawned refurb item");
            Some(item.id)
        } else {
            None
        };

        let record = NewTradeIn {
            customer_id,
            customer_name,
            customer_phone: contact.phone,
            customer_email: contact.email,
            customer_address: contact.address,
            serial,
            device_desc,
            valuation,
            agreed_value,
            id_image_path: id_image_path.clone(),
            refurb_id,
        };
        match self.trade_ins.create(&record).await {
            Ok(trade_in) => Ok(trade_in),
            Err(err) => {
                self.discard(refurb_id, id_image_path.as_deref()).await;
                Err(map_trade_in_error(err))
            }
        }
    }
}

#[cfg(test)]
#[path = "customer_service_tests.rs"]
mod tests;
