pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod store;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use database::Database;

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/health", get(handlers::health))

        // Products
        .route("/products", get(handlers::products::products_list))
        .route("/products", post(handlers::products::create_product))
        .route("/products/:id", get(handlers::products::product_detail))
        .route("/products/:id/movements", get(handlers::products::product_movements))

        // Movements
        .route("/movements/inbound", post(handlers::movements::record_inbound))
        .route("/movements/outbound", post(handlers::movements::record_outbound))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(64 * 1024)) // 64KB
        )
        .with_state(db)
}
