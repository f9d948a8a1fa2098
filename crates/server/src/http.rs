//! HTTP endpoints
//!
//! REST API for the classification service.

use std::collections::HashMap;
use std::time::Instant;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use newsflow_config::load_rule_file;
use newsflow_core::{ClassificationResult, RawDocument};
use newsflow_pipeline::PipelineError;

use crate::metrics::metrics_handler;
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_enabled = state.config.read().server.cors_enabled;
    let router = Router::new()
        // Classification endpoints
        .route("/api/classify", post(classify))
        .route("/api/classify/batch", post(classify_batch))
        // Admin endpoints
        .route("/admin/reload-rules", post(reload_rules))
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler));

    let router = if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> impl IntoResponse {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
        PipelineError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        PipelineError::Stage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /api/classify
async fn classify(
    State(state): State<AppState>,
    Json(doc): Json<RawDocument>,
) -> axum::response::Response {
    let deadline = Instant::now() + state.request_deadline();
    match state
        .orchestrator
        .classify_with_deadline(&doc, Some(deadline))
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(error) => {
            tracing::warn!(content_id = %doc.id, error = %error, "Classification request failed");
            error_response(status_for(&error), error.to_string()).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchResponse {
    results: Vec<Option<ClassificationResult>>,
    classified: usize,
    failed: usize,
}

/// POST /api/classify/batch
async fn classify_batch(
    State(state): State<AppState>,
    Json(docs): Json<Vec<RawDocument>>,
) -> axum::response::Response {
    let deadline = Instant::now() + state.request_deadline();
    let results = state.orchestrator.classify_batch(&docs, Some(deadline)).await;
    let classified = results.iter().filter(|r| r.is_some()).count();
    let failed = results.len() - classified;
    Json(BatchResponse {
        results,
        classified,
        failed,
    })
    .into_response()
}

#[derive(Debug, Serialize)]
struct ReloadResponse {
    rules_loaded: usize,
    version: String,
}

/// POST /admin/reload-rules
async fn reload_rules(State(state): State<AppState>) -> axum::response::Response {
    let path = state.rules_path();
    match load_rule_file(&path) {
        Ok(file) => {
            let rules_loaded = file.rules.len();
            let version = file.version.clone();
            state.rule_engine.update_rules(file.rules);
            tracing::info!(path = %path, rules = rules_loaded, "Rules reloaded");
            Json(ReloadResponse {
                rules_loaded,
                version,
            })
            .into_response()
        }
        Err(error) => {
            tracing::error!(path = %path, error = %error, "Rule reload failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
                .into_response()
        }
    }
}

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /ready
///
/// Ready when every configured ML sidecar answers its health endpoint.
/// Sidecars are advisory, so readiness reports but does not gate on them
/// individually; the service itself is ready once constructed.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut sidecars = HashMap::new();
    for client in state.ml_clients.iter() {
        sidecars.insert(client.name().to_string(), client.health().await);
    }
    Json(serde_json::json!({
        "status": "ready",
        "sidecars": sidecars,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use parking_lot::RwLock;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    use newsflow_config::Settings;
    use newsflow_pipeline::{
        ClassificationOrchestrator, OrchestratorConfig, RoutingTable, SidecarSet,
    };
    use newsflow_reputation::{InMemoryReputationStore, ReputationConfig, ReputationScorer};
    use newsflow_rules::RuleEngine;

    fn test_state() -> AppState {
        let settings = Settings::default();
        let rule_engine = Arc::new(RuleEngine::new(Vec::new()));
        let reputation = Arc::new(ReputationScorer::new(
            Arc::new(InMemoryReputationStore::new()),
            ReputationConfig::default(),
        ));
        let orchestrator = Arc::new(ClassificationOrchestrator::new(
            Arc::clone(&rule_engine),
            reputation,
            SidecarSet::default(),
            RoutingTable::new(settings.routing.clone()),
            OrchestratorConfig::default(),
        ));
        AppState {
            config: Arc::new(RwLock::new(settings)),
            orchestrator,
            rule_engine,
            ml_clients: Arc::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = create_router(test_state());
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_classify_endpoint() {
        let router = create_router(test_state());
        let doc = RawDocument::new(
            "doc-1",
            "example",
            "https://example.com/news/story",
            "A headline",
            "Body text for the classifier.",
        );
        let request = Request::post("/api/classify")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&doc).unwrap()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_classify_rejects_empty_id() {
        let router = create_router(test_state());
        let doc = RawDocument::new(
            "",
            "example",
            "https://example.com/news/story",
            "A headline",
            "Body text.",
        );
        let request = Request::post("/api/classify")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&doc).unwrap()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
