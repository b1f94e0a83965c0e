//! PostgreSQL-backed customer directory.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};
use crate::domain::{Customer, CustomerDraft};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{CustomerRow, CustomerUpdate, NewCustomerRow};
use super::pool::{DbPool, PoolError};
use super::schema::customers;

/// Diesel-backed implementation of the `CustomerRepository` port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CustomerRepositoryError {
    CustomerRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CustomerRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => CustomerRepositoryError::connection(message),
        StoreFailure::Duplicate(message)
        | StoreFailure::Rejected(message)
        | StoreFailure::MissingReference(message)
        | StoreFailure::Query(message) => CustomerRepositoryError::query(message),
    }
}

/// Build an `ILIKE` substring pattern, escaping the wildcard characters.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn list(
        &self,
        search: Option<String>,
    ) -> Result<Vec<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = customers::table
            .select(CustomerRow::as_select())
            .order_by((customers::name.asc(), customers::id.asc()))
            .into_boxed();
        if let Some(term) = search {
            let pattern = contains_pattern(&term);
            query = query.filter(
                customers::name
                    .ilike(pattern.clone())
                    .nullable()
                    .or(customers::phone.ilike(pattern.clone()))
                    .or(customers::email.ilike(pattern)),
            );
        }

        let rows: Vec<CustomerRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CustomerRow> = customers::table
            .find(id)
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Customer::from))
    }

    async fn create(&self, draft: &CustomerDraft) -> Result<Customer, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: CustomerRow = diesel::insert_into(customers::table)
            .values(NewCustomerRow::from(draft))
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn replace(
        &self,
        id: i32,
        draft: &CustomerDraft,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CustomerRow> = diesel::update(customers::table.find(id))
            .set(CustomerUpdate::new(draft, Utc::now()))
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Customer::from))
    }
}
