mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::extract::Extractor;
use crate::insights::InsightsClient;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
    pub insights: Arc<InsightsClient>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route(
            "/",
            get(handlers::index_page).post(handlers::analyze_files),
        )
        .route("/health", get(handlers::health_handler))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
