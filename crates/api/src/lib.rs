//! HTTP surface of the order-processing services.
//!
//! Each business service is exposed as its own endpoint router. The endpoint
//! routers are what remote delegates bind in the naming registry; the server
//! binary merges them with health and metrics routes.

pub mod config;
pub mod error;
pub mod routes;
pub mod wire;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::{CatalogService, CustomerService, OrderService, Services};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use wire::ErrorBody;

/// Routes for order operations.
pub fn order_endpoint(service: Arc<OrderService>) -> Router {
    use routes::orders;

    Router::new()
        .route("/orders", get(orders::list).post(orders::create))
        .route(
            "/orders/{id}",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
        .route("/customers/{id}/orders", get(orders::for_customer))
        .with_state(service)
}

/// Routes for categories, products and items.
pub fn catalog_endpoint(service: Arc<CatalogService>) -> Router {
    use routes::catalog;

    Router::new()
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/categories/{id}",
            get(catalog::get_category)
                .put(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .route(
            "/categories/{id}/products",
            get(catalog::products_in_category),
        )
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route("/products/{id}/items", get(catalog::items_in_product))
        .route("/items", get(catalog::list_items).post(catalog::create_item))
        .route(
            "/items/{id}",
            get(catalog::get_item)
                .put(catalog::update_item)
                .delete(catalog::delete_item),
        )
        .with_state(service)
}

/// Routes for customer operations.
pub fn customer_endpoint(service: Arc<CustomerService>) -> Router {
    use routes::customers;

    Router::new()
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/{id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .with_state(service)
}

/// All three endpoints on one router.
pub fn service_router(services: &Services) -> Router {
    order_endpoint(services.orders.clone())
        .merge(catalog_endpoint(services.catalog.clone()))
        .merge(customer_endpoint(services.customers.clone()))
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(services: &Services, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    service_router(services)
        .route("/health", get(routes::health::check))
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
