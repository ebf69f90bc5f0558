use super::error::ApiError;
use super::router::AppState;
use crate::application::pricing::{ModelInfo, PredictionResponse};
use crate::domain::pricing::types::{
    PredictionFeedback, PredictionRecord, PredictionStats, RequestMetadata,
};
use crate::domain::pricing::validation::PredictionRequest;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::net::SocketAddr;
use uuid::Uuid;

pub const SERVICE_NAME: &str = "Dynamic Pricing API";

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "predict": "POST /predict",
            "health": "GET /health",
            "model_info": "GET /model/info",
            "stats": "GET /stats?days=N",
            "feedback": "PATCH /predictions/{id}/feedback",
        }
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub model_loaded: bool,
    pub encoder_loaded: bool,
    pub model_version: String,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let info = state.service.model_info();
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        model_loaded: true,
        encoder_loaded: !info.feature_names.is_empty(),
        model_version: info.model_version.clone(),
    })
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(request) = body?;
    let metadata = RequestMetadata {
        request_id: Uuid::new_v4().to_string(),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ip_address: connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()),
    };
    let response = state.service.predict(&request, metadata).await?;
    Ok(Json(response))
}

/// GET /model/info
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.service.model_info().clone())
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub statistics: PredictionStats,
    pub generated_at: DateTime<Utc>,
}

/// GET /stats?days=N
pub async fn stats(
    State(state): State<AppState>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<StatsResponse>, ApiError> {
    let Query(query) = query?;
    let days = query.days.unwrap_or(state.stats_default_days);
    let statistics = state.service.stats(days).await?;
    Ok(Json(StatsResponse {
        statistics,
        generated_at: Utc::now(),
    }))
}

/// PATCH /predictions/:id/feedback
pub async fn record_feedback(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<PredictionFeedback>, JsonRejection>,
) -> Result<Json<PredictionRecord>, ApiError> {
    let Json(feedback) = body?;
    let record = state.service.record_feedback(id, &feedback).await?;
    Ok(Json(record))
}
