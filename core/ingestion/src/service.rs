use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use rootline_schemas::generate_upload_id;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cache::ExtractionCache;
use crate::extractor::RecordExtractor;
use crate::upload::decode_upload;

/// Shared service state: the stateless extractor, the single-slot cache
/// behind a lock, and a process-lifetime upload counter.
#[derive(Clone)]
pub struct AppState {
    extractor: Arc<RecordExtractor>,
    cache: Arc<Mutex<ExtractionCache>>,
    uploads: Arc<AtomicU64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            extractor: Arc::new(RecordExtractor::new()),
            cache: Arc::new(Mutex::new(ExtractionCache::new())),
            uploads: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Build the ingestion router. Bodies above `max_upload_bytes` are
/// rejected at the transport layer with 413 before any handler runs.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    // CORS layer for browser upload forms
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/ingest/upload", post(ingest_upload))
        .route("/ingest/text", post(ingest_text))
        .route("/stats", get(get_stats))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "ingestion",
        "status": "healthy",
        "version": "0.1.0"
    }))
}

/// Raw request body treated as an uploaded file.
async fn ingest_upload(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let text = decode_upload(&body);
    ingest(&state, &text).await
}

#[derive(Debug, Deserialize)]
struct IngestTextRequest {
    text: String,
}

/// Inline text field, the browser "test mode" path.
async fn ingest_text(
    State(state): State<AppState>,
    Json(request): Json<IngestTextRequest>,
) -> impl IntoResponse {
    ingest(&state, &request.text).await
}

// Extraction never fails, so the ingest path has no error branch of its
// own; the only rejections happen in the extractors above.
async fn ingest(state: &AppState, text: &str) -> Json<serde_json::Value> {
    let result = {
        let mut cache = state.cache.lock().await;
        state.extractor.extract_cached(&mut cache, text)
    };

    let upload_id = generate_upload_id();
    state.uploads.fetch_add(1, Ordering::Relaxed);

    info!(
        "Ingested upload {}: {} individuals found",
        upload_id,
        result.len()
    );

    Json(serde_json::json!({
        "upload_id": upload_id.0,
        "individuals_found": result.len(),
        "names": result.sorted_names(),
        "received_at": Utc::now().to_rfc3339(),
    }))
}

async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let cache_primed = state.cache.lock().await.is_primed();

    Json(serde_json::json!({
        "uploads": state.uploads.load(Ordering::Relaxed),
        "cache_primed": cache_primed,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const MARTA_FIXTURE: &str = "0 @I1@ INDI\n1 NAME Marta /Majdan/\n0 TRLR";

    fn test_router() -> Router {
        router(AppState::new(), 1024)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "ingestion");
    }

    #[tokio::test]
    async fn test_ingest_upload() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ingest/upload")
                    .body(Body::from(MARTA_FIXTURE))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["individuals_found"], 1);
        assert_eq!(body["names"][0], "Marta Majdan");
        assert!(body["upload_id"].as_str().unwrap().starts_with("upl_"));
        assert!(!body["received_at"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_upload_without_names() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ingest/upload")
                    .body(Body::from("0 HEAD\n0 TRLR"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["individuals_found"], 0);
        assert_eq!(body["names"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_ingest_text() {
        let request_body = serde_json::json!({ "text": MARTA_FIXTURE });

        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ingest/text")
                    .header("Content-Type", "application/json")
                    .body(Body::from(request_body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["individuals_found"], 1);
        assert_eq!(body["names"][0], "Marta Majdan");
    }

    #[tokio::test]
    async fn test_ingest_text_rejects_malformed_json() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ingest/text")
                    .header("Content-Type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let app = router(AppState::new(), 64);
        let oversized = "x".repeat(1024);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ingest/upload")
                    .body(Body::from(oversized))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_stats_track_uploads_and_cache() {
        let state = AppState::new();
        let app = router(state.clone(), 1024);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["uploads"], 0);
        assert_eq!(body["cache_primed"], false);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/ingest/upload")
                        .body(Body::from(MARTA_FIXTURE))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["uploads"], 2);
        assert_eq!(body["cache_primed"], true);
    }
}
