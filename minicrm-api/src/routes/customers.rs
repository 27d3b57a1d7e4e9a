/// Customer directory endpoints
///
/// - `POST /customers` - Create (admin)
/// - `GET /customers?page&limit&search` - Paginated listing
/// - `GET /customers/:id` - Get one
/// - `PATCH /customers/:id` - Partial update (admin)
/// - `DELETE /customers/:id` - Delete, returns the deleted record (admin)
///
/// A listing looks like:
///
/// ```json
/// {
///   "page": 1,
///   "limit": 10,
///   "totalRecords": 42,
///   "totalPages": 5,
///   "data": [ { "id": "uuid", "name": "Acme", "email": "...", "phone": "...", "company": null } ]
/// }
/// ```

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{parse_id, ValidatedJson},
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use minicrm_shared::{
    models::customer::{CreateCustomer, Customer, UpdateCustomer},
    pagination::Paginated,
    services::customers::{self, CustomerQuery, CUSTOMER_NOT_FOUND},
};

pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCustomer>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let customer = customers::create(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Out-of-range `page` and `limit` are clamped, never rejected
pub async fn list_customers(
    State(state): State<AppState>,
    query: Result<Query<CustomerQuery>, QueryRejection>,
) -> ApiResult<Json<Paginated<Customer>>> {
    let Query(query) = query?;
    let page = customers::find_all(state.store.as_ref(), &query).await?;
    Ok(Json(page))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    let id = parse_id(&id, CUSTOMER_NOT_FOUND)?;
    let customer = customers::find_one(state.store.as_ref(), id).await?;
    Ok(Json(customer))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateCustomer>,
) -> ApiResult<Json<Customer>> {
    let id = parse_id(&id, CUSTOMER_NOT_FOUND)?;
    let customer = customers::update(state.store.as_ref(), id, req).await?;
    Ok(Json(customer))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    let id = parse_id(&id, CUSTOMER_NOT_FOUND)?;
    let customer = customers::remove(state.store.as_ref(), id).await?;
    Ok(Json(customer))
}
