use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::api::types::*;
use crate::providers::OpenAiGenerator;
use crate::telemetry::Telemetry;

pub struct AppState {
    pub generator: OpenAiGenerator,
    pub telemetry: Telemetry,
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, StatusCode> {
    if request.prompt.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    tracing::info!(prompt_len = request.prompt.len(), "generate request");

    let response = api::generate(request, &state.generator, &state.telemetry).await;
    Ok(Json(response))
}

pub async fn detect_handler(
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, StatusCode> {
    Ok(Json(api::detect(request)))
}

pub async fn correct_handler(
    Json(request): Json<CorrectRequest>,
) -> Result<Json<CorrectResponse>, StatusCode> {
    Ok(Json(api::correct(request)))
}

pub async fn fallback_handler(
    Json(request): Json<FallbackRequest>,
) -> Result<Json<FallbackResponse>, StatusCode> {
    Ok(Json(api::fallback(request)))
}

pub async fn refine_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<GenerateResponse>, StatusCode> {
    if request.code.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let response = api::refine(request, &state.generator, &state.telemetry).await;
    Ok(Json(response))
}

pub async fn explain_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, StatusCode> {
    let response = api::explain(request, &state.generator, &state.telemetry).await;
    Ok(Json(response))
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/generate", post(generate_handler))
        .route("/api/v1/detect", post(detect_handler))
        .route("/api/v1/correct", post(correct_handler))
        .route("/api/v1/fallback", post(fallback_handler))
        .route("/api/v1/refine", post(refine_handler))
        .route("/api/v1/explain", post(explain_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(port: u16, openai_api_key: String, model: &str) {
    let state = Arc::new(AppState {
        generator: OpenAiGenerator::new(openai_api_key, model),
        telemetry: Telemetry::new(),
    });

    let app = app(state);

    // Bind to 0.0.0.0 so the service is reachable from outside the host.
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!(%addr, "server listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", addr, e));

    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {}", e));
}
