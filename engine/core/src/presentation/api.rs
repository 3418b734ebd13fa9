// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP surface for service mode: `POST /chat`, `POST /train`, `GET /health`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::application::{ChatService, TrainingError, TrainingRequest};
use crate::domain::ResponseSource;

pub struct AppState {
    pub service: Arc<ChatService>,
    pub started_at: Instant,
}

/// Build the service router. `cors_origins` lists the browser origins
/// allowed to call the API; `"*"` allows any origin and an empty list sends
/// no CORS headers.
pub fn app(service: Arc<ChatService>, cors_origins: &[String]) -> Router {
    let state = Arc::new(AppState {
        service,
        started_at: Instant::now(),
    });

    let router = Router::new()
        .route("/chat", post(chat))
        .route("/train", post(train))
        .route("/health", get(health));

    let router = match cors_layer(cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let allow_origin = if origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<TrainingError> for ApiError {
    fn from(e: TrainingError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub source: ResponseSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResponse {
    pub message: String,
    pub persisted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub training_data_size: usize,
    pub uptime_seconds: u64,
}

async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected chat body");
        ApiError::BadRequest("Invalid request body".to_string())
    })?;

    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query is required".to_string()));
    }

    let reply = state.service.reply_for_service(query).await;
    Ok(Json(ChatResponse {
        response: reply.text,
        source: reply.source,
        confidence: reply.confidence,
    }))
}

async fn train(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TrainingRequest>, JsonRejection>,
) -> Result<Json<TrainResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected training body");
        ApiError::from(TrainingError::InvalidFormat)
    })?;

    let outcome = state.service.train(request).await?;
    Ok(Json(TrainResponse {
        message: "Training data updated successfully".to_string(),
        persisted: outcome.persisted,
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        training_data_size: state.service.knowledge().len(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
