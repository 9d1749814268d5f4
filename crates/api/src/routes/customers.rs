//! Customer endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use domain::{Customer, CustomerData, CustomerId};
use serde::{Deserialize, Serialize};
use store::RecordStore;

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: Option<CustomerId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub registered_at: DateTime<Utc>,
    pub active: bool,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            active: customer.is_active(),
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            registered_at: customer.registered_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NameParams {
    pub name: String,
}

fn to_responses(customers: Vec<Customer>) -> Json<Vec<CustomerResponse>> {
    Json(customers.into_iter().map(CustomerResponse::from).collect())
}

/// POST /customers
#[tracing::instrument(skip(state, req))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CustomerData>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = state.customers.register(req).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// GET /customers: active customers only.
#[tracing::instrument(skip(state))]
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    Ok(to_responses(state.customers.list_active().await?))
}

/// GET /customers/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer_id = parse_id(&id)?;
    let customer = state
        .customers
        .find_by_id(customer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer {id} not found")))?;
    Ok(Json(customer.into()))
}

/// PUT /customers/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<CustomerData>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state.customers.update(parse_id(&id)?, req).await?;
    Ok(Json(customer.into()))
}

/// DELETE /customers/{id}: deactivates the customer.
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    state.customers.deactivate(parse_id(&id)?).await?;
    Ok("Customer deleted successfully")
}

/// GET /customers/search?name=
#[tracing::instrument(skip(state))]
pub async fn search_by_name<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<NameParams>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    Ok(to_responses(
        state.customers.search_by_name(&params.name).await?,
    ))
}

/// GET /customers/email/{email}
#[tracing::instrument(skip(state))]
pub async fn find_by_email<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(email): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .customers
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer with email {email} not found")))?;
    Ok(Json(customer.into()))
}
