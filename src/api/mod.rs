//! API routes for noctura-store

pub mod cart;
pub mod health;
pub mod orders;
pub mod products;

use axum::routing::get;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Cart and orders require a resolved caller identity.
    let authenticated = Router::new()
        .route(
            "/api/cart",
            get(cart::get_cart)
                .post(cart::add_item)
                .patch(cart::update_item)
                .delete(cart::remove_item),
        )
        .route(
            "/api/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Catalog reads are public.
    let catalog = Router::new()
        .route("/api/products", get(products::list_products))
        .route("/api/products/search", get(products::search_products))
        .route("/api/products/{slug}", get(products::get_product));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(catalog)
        .merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
