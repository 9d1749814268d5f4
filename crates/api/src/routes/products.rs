//! Product (menu item) endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::{Product, ProductData, ProductId, RestaurantId};
use serde::{Deserialize, Serialize};
use store::RecordStore;

use super::{AppState, EntityRef, parse_id};
use crate::error::ApiError;

// -- Request types --

/// Product payload. The owning restaurant may be given either as
/// `restaurant_id` or as an embedded `restaurant: { id }` object.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub category: String,
    pub restaurant_id: Option<RestaurantId>,
    pub restaurant: Option<EntityRef<RestaurantId>>,
}

impl From<ProductRequest> for ProductData {
    fn from(req: ProductRequest) -> Self {
        ProductData {
            name: req.name,
            description: req.description,
            price: req.price,
            category: req.category,
            restaurant_id: req.restaurant_id.or(req.restaurant.map(|r| r.id)),
        }
    }
}

#[derive(Deserialize)]
pub struct PriceRequest {
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct NameParams {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PriceRangeParams {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub restaurant_id: RestaurantId,
    pub available: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            available: product.is_available(),
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price.as_decimal(),
            category: product.category,
            restaurant_id: product.restaurant_id,
        }
    }
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub id: ProductId,
    pub available: bool,
}

pub(crate) fn to_responses(products: Vec<Product>) -> Json<Vec<ProductResponse>> {
    Json(products.into_iter().map(ProductResponse::from).collect())
}

/// POST /products
#[tracing::instrument(skip(state, req))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state.products.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /products: available products only.
#[tracing::instrument(skip(state))]
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    Ok(to_responses(state.products.list_available().await?))
}

/// GET /products/unavailable
#[tracing::instrument(skip(state))]
pub async fn list_unavailable<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    Ok(to_responses(state.products.list_unavailable().await?))
}

/// GET /products/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .products
        .find_by_id(parse_id(&id)?)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;
    Ok(Json(product.into()))
}

/// PUT /products/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.products.update(parse_id(&id)?, req.into()).await?;
    Ok(Json(product.into()))
}

/// DELETE /products/{id}: takes the product off the menu.
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    state.products.make_unavailable(parse_id(&id)?).await?;
    Ok("Product deleted successfully")
}

/// GET /products/{id}/availability
#[tracing::instrument(skip(state))]
pub async fn availability<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let product_id = parse_id(&id)?;
    let available = state.products.check_availability(product_id).await?;
    Ok(Json(AvailabilityResponse {
        id: product_id,
        available,
    }))
}

/// PATCH /products/{id}/price
#[tracing::instrument(skip(state, req))]
pub async fn update_price<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<PriceRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .products
        .update_price(parse_id(&id)?, req.price)
        .await?;
    Ok(Json(product.into()))
}

/// PATCH /products/{id}/available: puts the product back on the menu.
#[tracing::instrument(skip(state))]
pub async fn make_available<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.products.make_available(parse_id(&id)?).await?;
    Ok(Json(product.into()))
}

/// GET /products/search?name=
#[tracing::instrument(skip(state))]
pub async fn search_by_name<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<NameParams>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    Ok(to_responses(
        state.products.search_by_name(&params.name).await?,
    ))
}

/// GET /products/category/{category}
#[tracing::instrument(skip(state))]
pub async fn search_by_category<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    Ok(to_responses(
        state.products.search_by_category(&category).await?,
    ))
}

/// GET /products/price-range?min=&max=
#[tracing::instrument(skip(state))]
pub async fn search_by_price_range<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<PriceRangeParams>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    Ok(to_responses(
        state
            .products
            .search_by_price_range(params.min, params.max)
            .await?,
    ))
}
