/// Customer directory
///
/// Plain CRUD plus a paginated, searchable listing. Uniqueness of email and phone
/// is left to the store; a violation comes back naming the field and is reported
/// as a conflict on that field.

use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::pagination::{PageWindow, Paginated};
use crate::store::{CustomerStore, StoreError};

pub const CUSTOMER_NOT_FOUND: &str = "Customer not found";

/// Listing parameters as sent by the client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl CustomerQuery {
    /// The search term, or `None` when absent or blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

fn conflict_or(err: StoreError) -> ServiceError {
    match err {
        StoreError::UniqueViolation { field } => {
            ServiceError::Conflict(format!("Customer with this {field} already exists"))
        }
        other => other.into(),
    }
}

pub async fn create<S>(store: &S, input: CreateCustomer) -> ServiceResult<Customer>
where
    S: CustomerStore + ?Sized,
{
    let customer = store.insert_customer(input).await.map_err(conflict_or)?;

    info!(customer_id = %customer.id, "Customer created");
    Ok(customer)
}

/// One page of customers, newest first
pub async fn find_all<S>(store: &S, query: &CustomerQuery) -> ServiceResult<Paginated<Customer>>
where
    S: CustomerStore + ?Sized,
{
    let search = query.search_term();
    let total = store.count_customers(search).await?;
    let window = PageWindow::resolve(query.page, query.limit, total);

    let data = if total == 0 {
        Vec::new()
    } else {
        store
            .list_customers(search, window.offset, window.limit)
            .await?
    };

    debug!(
        page = window.page,
        limit = window.limit,
        total_records = window.total_records,
        searched = search.is_some(),
        "Listed customers"
    );

    Ok(Paginated::new(window, data))
}

pub async fn find_one<S>(store: &S, id: Uuid) -> ServiceResult<Customer>
where
    S: CustomerStore + ?Sized,
{
    store
        .find_customer(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(CUSTOMER_NOT_FOUND.to_string()))
}

/// Applies a partial update
pub async fn update<S>(store: &S, id: Uuid, input: UpdateCustomer) -> ServiceResult<Customer>
where
    S: CustomerStore + ?Sized,
{
    let customer = store
        .update_customer(id, input)
        .await
        .map_err(conflict_or)?
        .ok_or_else(|| ServiceError::NotFound(CUSTOMER_NOT_FOUND.to_string()))?;

    info!(customer_id = %customer.id, "Customer updated");
    Ok(customer)
}

/// Deletes a customer and returns what was deleted
pub async fn remove<S>(store: &S, id: Uuid) -> ServiceResult<Customer>
where
    S: CustomerStore + ?Sized,
{
    let customer = store
        .delete_customer(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(CUSTOMER_NOT_FOUND.to_string()))?;

    info!(customer_id = %customer.id, "Customer deleted");
    Ok(customer)
}
