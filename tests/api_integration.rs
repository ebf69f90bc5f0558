mod common;

use reqwest::StatusCode;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use surge_pricing::application::pricing::{PricingEngine, PricingService};
use surge_pricing::domain::pricing::policy::PricingPolicy;
use surge_pricing::domain::repositories::PredictionRepository;
use surge_pricing::infrastructure::observability::Metrics;
use surge_pricing::infrastructure::{Database, SqlitePredictionRepository};
use surge_pricing::interfaces::api::{AppState, create_router};
use tempfile::TempDir;
use tokio::net::TcpListener;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_url = format!("sqlite://{}", dir.path().join("predictions.db").display());
        let database = Database::new(&db_url).await.unwrap();
        let repository: Arc<dyn PredictionRepository> =
            Arc::new(SqlitePredictionRepository::new(database.pool.clone()));

        let outcome = common::train_small_model(7);
        let engine = PricingEngine::from_artifacts(outcome.artifacts, PricingPolicy::default()).unwrap();
        let service = Arc::new(PricingService::new(engine, repository, Metrics::new().unwrap()));
        let app = create_router(AppState {
            service,
            stats_default_days: 30,
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn predict(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/predict"))
            .header("User-Agent", "integration-test")
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn stats(&self, days: i64) -> Value {
        self.client
            .get(self.url(&format!("/stats?days={}", days)))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

fn rainy_dinner() -> Value {
    json!({
        "distance_km": 5.2,
        "traffic_duration_seconds": 1200,
        "weather_condition": "Rain",
        "time_of_day": "DinnerRush"
    })
}

#[tokio::test]
async fn test_predict_returns_priced_quote_and_logs_it() {
    let server = TestServer::start().await;

    let response = server.predict(rainy_dinner()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();

    let multiplier = body["price_multiplier"].as_f64().unwrap();
    assert!((1.0..=3.5).contains(&multiplier));
    // Rain at dinner rush always carries a surcharge in the training data
    assert!(multiplier > 1.2, "multiplier = {}", multiplier);
    assert_eq!(body["base_price"].as_f64().unwrap(), 100.0);
    let expected_final = (100.0 * multiplier * 100.0).round() / 100.0;
    assert!((body["final_price"].as_f64().unwrap() - expected_final).abs() < 1e-9);
    assert_eq!(body["status"], "HIGH_SURGE");
    assert!(body["prediction_id"].as_i64().is_some());
    assert!(!body["request_id"].as_str().unwrap().is_empty());

    let stats = server.stats(1).await;
    assert_eq!(stats["statistics"]["total_predictions"], 1);
    assert_eq!(stats["statistics"]["status_distribution"]["HIGH_SURGE"], 1);
    assert!(stats["generated_at"].is_string());
}

#[tokio::test]
async fn test_invalid_request_is_rejected_without_logging() {
    let server = TestServer::start().await;

    let mut body = rainy_dinner();
    body["weather_condition"] = json!("Snow");
    body["distance_km"] = json!(120.0);
    let response = server.predict(body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: Value = response.json().await.unwrap();
    let detail = error["detail"].as_str().unwrap();
    assert!(detail.contains("Weather condition must be one of"), "{}", detail);
    assert!(detail.contains("distance_km"), "{}", detail);

    let stats = server.stats(30).await;
    assert_eq!(stats["statistics"]["total_predictions"], 0);
    assert_eq!(stats["statistics"]["average_multiplier"], 0.0);
}

#[tokio::test]
async fn test_malformed_body_is_a_client_error() {
    let server = TestServer::start().await;

    let response = server
        .client
        .post(server.url("/predict"))
        .header("Content-Type", "application/json")
        .body("{\"distance_km\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert!(error["detail"].is_string());
}

#[tokio::test]
async fn test_stats_window_must_be_positive() {
    let server = TestServer::start().await;

    let response = server
        .client
        .get(server.url("/stats?days=0"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_with_huge_window_counts_every_row() {
    let server = TestServer::start().await;
    assert_eq!(server.predict(rainy_dinner()).await.status(), StatusCode::OK);

    let response = server
        .client
        .get(server.url("/stats?days=200000000"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statistics"]["total_predictions"], 1);
    assert_eq!(body["statistics"]["period_days"], 200_000_000);

    let stats = server.stats(i64::MAX).await;
    assert_eq!(stats["statistics"]["total_predictions"], 1);
}

#[tokio::test]
async fn test_feedback_patch() {
    let server = TestServer::start().await;

    let missing = server
        .client
        .patch(server.url("/predictions/999/feedback"))
        .json(&json!({ "customer_rating": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let error: Value = missing.json().await.unwrap();
    assert_eq!(error["detail"], "Prediction with ID 999 not found");

    let created: Value = server.predict(rainy_dinner()).await.json().await.unwrap();
    let id = created["prediction_id"].as_i64().unwrap();

    let bad_rating = server
        .client
        .patch(server.url(&format!("/predictions/{}/feedback", id)))
        .json(&json!({ "customer_rating": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_rating.status(), StatusCode::BAD_REQUEST);

    let updated = server
        .client
        .patch(server.url(&format!("/predictions/{}/feedback", id)))
        .json(&json!({ "customer_rating": 5, "order_completed": true, "actual_multiplier": 1.4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    let record: Value = updated.json().await.unwrap();
    assert_eq!(record["feedback"]["customer_rating"], 5);
    assert_eq!(record["feedback"]["order_completed"], true);
    assert!(record["feedback_timestamp"].is_string());
    assert_eq!(record["metadata"]["user_agent"], "integration-test");
    assert_eq!(record["metadata"]["ip_address"], "127.0.0.1");
}

#[tokio::test]
async fn test_health_and_model_info() {
    let server = TestServer::start().await;

    let health: Value = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["model_loaded"], true);
    assert_eq!(health["model_version"], "test-7");

    let info: Value = server
        .client
        .get(server.url("/model/info"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(info["model_type"], "GradientBoostingRegressor");
    assert_eq!(info["n_features"], 10);
    assert_eq!(info["feature_names"][0], "distance_km");
    assert_eq!(info["feature_importance"].as_array().unwrap().len(), 10);
    assert_eq!(info["hyperparameters"]["n_estimators"], 30);

    let root: Value = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(root["status"], "running");
}
