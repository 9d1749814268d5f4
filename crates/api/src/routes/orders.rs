//! Order CRUD, lifecycle and search endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use domain::{CustomerId, Order, OrderData, OrderId, OrderStatus, ProductId, RestaurantId};
use serde::{Deserialize, Serialize};
use store::RecordStore;

use super::{AppState, DateRangeParams, EntityRef, parse_datetime, parse_id};
use crate::error::ApiError;

// -- Request types --

/// Order payload. Customer and restaurant may be given as ids or as
/// embedded `{ "id": ... }` objects.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderRequest {
    pub order_number: String,
    pub order_date: Option<String>,
    pub status: Option<String>,
    pub total_value: Option<f64>,
    pub customer_id: Option<CustomerId>,
    pub customer: Option<EntityRef<CustomerId>>,
    pub restaurant_id: Option<RestaurantId>,
    pub restaurant: Option<EntityRef<RestaurantId>>,
    pub items: String,
}

impl OrderRequest {
    fn into_data(self) -> Result<OrderData, ApiError> {
        let order_date = self
            .order_date
            .as_deref()
            .map(parse_datetime)
            .transpose()?;

        Ok(OrderData {
            order_number: self.order_number,
            order_date,
            status: self.status,
            total_value: self.total_value,
            customer_id: self.customer_id.or(self.customer.map(|c| c.id)),
            restaurant_id: self.restaurant_id.or(self.restaurant.map(|r| r.id)),
            items: self.items,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: Option<OrderId>,
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_value: f64,
    pub customer_id: CustomerId,
    pub restaurant_id: RestaurantId,
    pub items: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            status: order.status(),
            id: order.id,
            order_number: order.order_number,
            order_date: order.order_date,
            total_value: order.total_value.as_decimal(),
            customer_id: order.customer_id,
            restaurant_id: order.restaurant_id,
            items: order.items,
        }
    }
}

#[derive(Serialize)]
pub struct TotalResponse {
    pub total: f64,
}

fn to_responses(orders: Vec<Order>) -> Json<Vec<OrderResponse>> {
    Json(orders.into_iter().map(OrderResponse::from).collect())
}

/// POST /orders
#[tracing::instrument(skip(state, req))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<OrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state.orders.register(req.into_data()?).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders
#[tracing::instrument(skip(state))]
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    Ok(to_responses(state.orders.list_all().await?))
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .orders
        .find_by_id(parse_id(&id)?)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;
    Ok(Json(order.into()))
}

/// PUT /orders/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<OrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .orders
        .update(parse_id(&id)?, req.into_data()?)
        .await?;
    Ok(Json(order.into()))
}

/// DELETE /orders/{id}: removes the order.
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    state.orders.delete(parse_id(&id)?).await?;
    Ok("Order deleted successfully")
}

/// POST /orders/calculate: body is a JSON array of product ids.
#[tracing::instrument(skip(state, product_ids))]
pub async fn calculate<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(product_ids): Json<Vec<ProductId>>,
) -> Result<Json<TotalResponse>, ApiError> {
    let total = state.orders.calculate_order_total(&product_ids).await?;
    Ok(Json(TotalResponse {
        total: total.as_decimal(),
    }))
}

/// PATCH /orders/{id}/confirm
#[tracing::instrument(skip(state))]
pub async fn confirm<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.confirm(parse_id(&id)?).await?;
    Ok(Json(order.into()))
}

/// PATCH /orders/{id}/deliver
#[tracing::instrument(skip(state))]
pub async fn deliver<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.deliver(parse_id(&id)?).await?;
    Ok(Json(order.into()))
}

/// PATCH /orders/{id}/cancel
#[tracing::instrument(skip(state))]
pub async fn cancel<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.cancel(parse_id(&id)?).await?;
    Ok(Json(order.into()))
}

/// PATCH /orders/{id}/status?status=
#[tracing::instrument(skip(state))]
pub async fn update_status<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Query(params): Query<StatusParams>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .orders
        .update_status(parse_id(&id)?, &params.status)
        .await?;
    Ok(Json(order.into()))
}

/// GET /orders/status/{status}
#[tracing::instrument(skip(state))]
pub async fn search_by_status<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(status): Path<String>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    Ok(to_responses(state.orders.search_by_status(&status).await?))
}

/// GET /orders/customer/{id}
#[tracing::instrument(skip(state))]
pub async fn search_by_customer<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    Ok(to_responses(
        state.orders.search_by_customer(parse_id(&id)?).await?,
    ))
}

/// GET /orders/customer/{id}/status/{status}
#[tracing::instrument(skip(state))]
pub async fn search_by_customer_and_status<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((id, status)): Path<(String, String)>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    Ok(to_responses(
        state
            .orders
            .search_by_customer_and_status(parse_id(&id)?, &status)
            .await?,
    ))
}

/// GET /orders/date-range?start_date=&end_date=
#[tracing::instrument(skip(state))]
pub async fn search_by_date_range<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<DateRangeParams>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let (start, end) = params.parse()?;
    Ok(to_responses(
        state.orders.search_by_date_range(start, end).await?,
    ))
}

/// GET /orders/customer/{id}/date-range?start_date=&end_date=
#[tracing::instrument(skip(state))]
pub async fn search_by_customer_and_date_range<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Query(params): Query<DateRangeParams>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let customer_id = parse_id(&id)?;
    let (start, end) = params.parse()?;
    Ok(to_responses(
        state
            .orders
            .search_by_customer_and_date_range(customer_id, start, end)
            .await?,
    ))
}
