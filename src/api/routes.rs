use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the widget router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recently viewed books
        .route("/sessions/:session_id/recent", get(handlers::get_recent))
        .route("/sessions/:session_id/recent", post(handlers::record_recent))
        // Recommendations widget
        .route(
            "/sessions/:session_id/recommendations",
            get(handlers::recommendations_widget),
        )
        .route("/sessions/:session_id/actions", post(handlers::perform_action))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
