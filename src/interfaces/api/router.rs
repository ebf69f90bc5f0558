use super::handlers;
use crate::application::pricing::PricingService;
use axum::Router;
use axum::routing::{get, patch, post};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PricingService>,
    /// `/stats` window when `days` is omitted
    pub stats_default_days: i64,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/model/info", get(handlers::model_info))
        .route("/stats", get(handlers::stats))
        .route("/predictions/:id/feedback", patch(handlers::record_feedback))
        .with_state(state)
}
