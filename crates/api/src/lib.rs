//! HTTP API server with observability for the delivery marketplace.
//!
//! Provides REST endpoints for customers, restaurants, products and the
//! order lifecycle, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod seed;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use metrics_exporter_prometheus::PrometheusHandle;
use store::RecordStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::{AppState, customers, orders, products, restaurants};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: RecordStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/info", get(routes::health::info))
        // Customers
        .route(
            "/customers",
            post(customers::create::<S>).get(customers::list::<S>),
        )
        .route("/customers/search", get(customers::search_by_name::<S>))
        .route(
            "/customers/email/{email}",
            get(customers::find_by_email::<S>),
        )
        .route(
            "/customers/{id}",
            get(customers::get::<S>)
                .put(customers::update::<S>)
                .delete(customers::delete::<S>),
        )
        // Restaurants
        .route(
            "/restaurants",
            post(restaurants::create::<S>).get(restaurants::list::<S>),
        )
        .route("/restaurants/search", get(restaurants::search_by_name::<S>))
        .route(
            "/restaurants/category/{category}",
            get(restaurants::search_by_category::<S>),
        )
        .route(
            "/restaurants/rating/{min}",
            get(restaurants::search_by_rating::<S>),
        )
        .route(
            "/restaurants/{id}",
            get(restaurants::get::<S>)
                .put(restaurants::update::<S>)
                .delete(restaurants::delete::<S>),
        )
        .route(
            "/restaurants/{id}/online",
            patch(restaurants::set_online::<S>),
        )
        .route(
            "/restaurants/{id}/offline",
            patch(restaurants::set_offline::<S>),
        )
        .route("/restaurants/{id}/toggle", patch(restaurants::toggle::<S>))
        .route(
            "/restaurants/{id}/products",
            post(restaurants::add_product::<S>).get(restaurants::products::<S>),
        )
        // Products
        .route(
            "/products",
            post(products::create::<S>).get(products::list::<S>),
        )
        .route("/products/unavailable", get(products::list_unavailable::<S>))
        .route("/products/search", get(products::search_by_name::<S>))
        .route(
            "/products/category/{category}",
            get(products::search_by_category::<S>),
        )
        .route(
            "/products/price-range",
            get(products::search_by_price_range::<S>),
        )
        .route(
            "/products/{id}",
            get(products::get::<S>)
                .put(products::update::<S>)
                .delete(products::delete::<S>),
        )
        .route(
            "/products/{id}/availability",
            get(products::availability::<S>),
        )
        .route("/products/{id}/price", patch(products::update_price::<S>))
        .route(
            "/products/{id}/available",
            patch(products::make_available::<S>),
        )
        // Orders
        .route("/orders", post(orders::create::<S>).get(orders::list::<S>))
        .route("/orders/calculate", post(orders::calculate::<S>))
        .route("/orders/date-range", get(orders::search_by_date_range::<S>))
        .route("/orders/status/{status}", get(orders::search_by_status::<S>))
        .route(
            "/orders/customer/{id}",
            get(orders::search_by_customer::<S>),
        )
        .route(
            "/orders/customer/{id}/status/{status}",
            get(orders::search_by_customer_and_status::<S>),
        )
        .route(
            "/orders/customer/{id}/date-range",
            get(orders::search_by_customer_and_date_range::<S>),
        )
        .route(
            "/orders/{id}",
            get(orders::get::<S>)
                .put(orders::update::<S>)
                .delete(orders::delete::<S>),
        )
        .route("/orders/{id}/confirm", patch(orders::confirm::<S>))
        .route("/orders/{id}/deliver", patch(orders::deliver::<S>))
        .route("/orders/{id}/cancel", patch(orders::cancel::<S>))
        .route("/orders/{id}/status", patch(orders::update_status::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state with every domain service over `store`.
pub fn create_default_state<S: RecordStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}
