use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // API Documentation
        .route("/docs", get(handlers::get_api_docs::<S>))
        .route("/docs/openapi.json", get(handlers::get_openapi_spec::<S>))
        // Process management
        .route("/processes", get(handlers::list_processes::<S>))
        .route("/processes", post(handlers::create_process::<S>))
        .route("/processes/:process_id", get(handlers::get_process::<S>))
        .route("/processes/:process_id", put(handlers::replace_process::<S>))
        .route(
            "/processes/:process_id",
            delete(handlers::delete_process::<S>),
        )
        // Operations nested under their process
        .route(
            "/processes/:process_id/operations",
            get(handlers::list_operations::<S>),
        )
        .route(
            "/processes/:process_id/operations",
            post(handlers::create_operation::<S>),
        )
        .route(
            "/processes/:process_id/operations/:op_number",
            get(handlers::get_operation::<S>),
        )
        .route(
            "/processes/:process_id/operations/:op_number",
            put(handlers::replace_operation::<S>),
        )
        .route(
            "/processes/:process_id/operations/:op_number",
            delete(handlers::delete_operation::<S>),
        )
        .layer(CorsLayer::permissive())
}
