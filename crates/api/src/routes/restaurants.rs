//! Restaurant endpoints, including the restaurant-scoped product menu.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::{Restaurant, RestaurantData, RestaurantId};
use serde::{Deserialize, Serialize};
use store::RecordStore;

use super::products::{ProductRequest, ProductResponse};
use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Serialize)]
pub struct RestaurantResponse {
    pub id: Option<RestaurantId>,
    pub name: String,
    pub category: String,
    pub address: String,
    pub phone: String,
    pub delivery_fee: f64,
    pub rating: Option<f64>,
    pub active: bool,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            active: restaurant.is_active(),
            id: restaurant.id,
            name: restaurant.name,
            category: restaurant.category,
            address: restaurant.address,
            phone: restaurant.phone,
            delivery_fee: restaurant.delivery_fee.as_decimal(),
            rating: restaurant.rating,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NameParams {
    pub name: String,
}

fn to_responses(restaurants: Vec<Restaurant>) -> Json<Vec<RestaurantResponse>> {
    Json(restaurants.into_iter().map(RestaurantResponse::from).collect())
}

/// POST /restaurants
#[tracing::instrument(skip(state, req))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RestaurantData>,
) -> Result<(StatusCode, Json<RestaurantResponse>), ApiError> {
    let restaurant = state.restaurants.register(req).await?;
    Ok((StatusCode::CREATED, Json(restaurant.into())))
}

/// GET /restaurants: online restaurants only.
#[tracing::instrument(skip(state))]
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<RestaurantResponse>>, ApiError> {
    Ok(to_responses(state.restaurants.list_active().await?))
}

/// GET /restaurants/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    let restaurant = state
        .restaurants
        .find_by_id(parse_id(&id)?)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Restaurant {id} not found")))?;
    Ok(Json(restaurant.into()))
}

/// PUT /restaurants/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<RestaurantData>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    let restaurant = state.restaurants.update(parse_id(&id)?, req).await?;
    Ok(Json(restaurant.into()))
}

/// DELETE /restaurants/{id}: takes the restaurant offline.
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    state.restaurants.set_offline(parse_id(&id)?).await?;
    Ok("Restaurant deleted successfully")
}

/// PATCH /restaurants/{id}/online
#[tracing::instrument(skip(state))]
pub async fn set_online<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    let restaurant = state.restaurants.set_online(parse_id(&id)?).await?;
    Ok(Json(restaurant.into()))
}

/// PATCH /restaurants/{id}/offline
#[tracing::instrument(skip(state))]
pub async fn set_offline<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    let restaurant = state.restaurants.set_offline(parse_id(&id)?).await?;
    Ok(Json(restaurant.into()))
}

/// PATCH /restaurants/{id}/toggle
#[tracing::instrument(skip(state))]
pub async fn toggle<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    let restaurant = state.restaurants.toggle(parse_id(&id)?).await?;
    Ok(Json(restaurant.into()))
}

/// GET /restaurants/search?name=
#[tracing::instrument(skip(state))]
pub async fn search_by_name<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<NameParams>,
) -> Result<Json<Vec<RestaurantResponse>>, ApiError> {
    Ok(to_responses(
        state.restaurants.search_by_name(&params.name).await?,
    ))
}

/// GET /restaurants/category/{category}
#[tracing::instrument(skip(state))]
pub async fn search_by_category<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<RestaurantResponse>>, ApiError> {
    Ok(to_responses(
        state.restaurants.search_by_category(&category).await?,
    ))
}

/// GET /restaurants/rating/{min}
#[tracing::instrument(skip(state))]
pub async fn search_by_rating<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(min): Path<f64>,
) -> Result<Json<Vec<RestaurantResponse>>, ApiError> {
    Ok(to_responses(state.restaurants.search_by_rating(min).await?))
}

/// POST /restaurants/{id}/products
#[tracing::instrument(skip(state, req))]
pub async fn add_product<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state
        .products
        .register_for_restaurant(parse_id(&id)?, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /restaurants/{id}/products
#[tracing::instrument(skip(state))]
pub async fn products<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.products.search_by_restaurant(parse_id(&id)?).await?;
    Ok(super::products::to_responses(products))
}
