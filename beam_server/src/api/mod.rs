//! API routes

pub mod design;
pub mod health;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use beam_core::errors::DesignError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(design::home))
        .route("/srrs_beam", post(design::design_beam))
        .route("/health", get(health::health_check))
        .with_state(state)
}

/// Error body: `{"status": "error", "message": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
}

/// Request failure. Every variant is reported as 400 with a message.
#[derive(Debug)]
pub enum ApiError {
    /// Body was not valid JSON
    MalformedJson(String),
    /// Core rejected the request
    Design(DesignError),
}

impl From<DesignError> for ApiError {
    fn from(e: DesignError) -> Self {
        ApiError::Design(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::MalformedJson(msg) => {
                warn!(error = %msg, "rejected malformed request body");
                format!("Invalid JSON: {}", msg)
            }
            ApiError::Design(e) if e.is_input_error() => {
                warn!(code = e.error_code(), error = %e, "rejected design request");
                e.to_string()
            }
            ApiError::Design(e) => {
                error!(code = e.error_code(), error = %e, "design request failed");
                e.to_string()
            }
        };

        let body = ErrorBody {
            status: "error".to_string(),
            message,
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use beam_core::errors::ModelError;
    use beam_core::models::{ModelRegistry, Predictor};
    use beam_core::section::Section;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::ServerConfig;

    fn fixed(b: f64, d: f64, ast: f64) -> Arc<dyn Predictor> {
        Arc::new(move |_fck: f64, _fy: f64, _mu: f64| Ok::<_, ModelError>(Section::new(b, d, ast)))
    }

    fn app() -> Router {
        let mut models = ModelRegistry::new();
        models.insert("already_valid", fixed(300.0, 450.0, 1500.0));
        models.insert("undersized", fixed(180.0, 280.0, 900.0));
        models.insert(
            "broken",
            Arc::new(|_fck: f64, _fy: f64, _mu: f64| -> Result<Section, ModelError> {
                Err(ModelError::UnsupportedInput("model not fitted".to_string()))
            }),
        );
        create_router(AppState::new(ServerConfig::default(), models))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_design(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/srrs_beam")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_home() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "RCC Beam Design Optimization API is active.");
    }

    #[tokio::test]
    async fn test_design_success() {
        let (status, body) = send(post_design(r#"{"fck": 30, "fy": 415, "Mu": 120}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["result"]["input"], json!({ "fck": 30.0, "fy": 415.0, "Mu": 120.0 }));

        let predictions = &body["result"]["predictions"];
        assert_eq!(
            predictions["already_valid"],
            json!({ "b": 300, "d": 450, "Ast": 1500, "valid": true })
        );
        assert_eq!(
            predictions["undersized"],
            json!({ "b": 200, "d": 280, "Ast": 900, "valid": false })
        );
        assert_eq!(predictions["broken"], json!({ "error": "unsupported input: model not fitted" }));
    }

    #[tokio::test]
    async fn test_design_without_content_type() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/srrs_beam")
            .body(Body::from(r#"{"fck": 30, "fy": 415, "Mu": 120}"#))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn test_missing_field() {
        let (status, body) = send(post_design(r#"{"fck": 30, "Mu": 120}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Missing required input: fy");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (status, body) = send(post_design("{ fck: 30")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_non_numeric_field() {
        let (status, body) = send(post_design(r#"{"fck": "C30", "fy": 415, "Mu": 120}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("fck"));
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["models"], json!(["already_valid", "broken", "undersized"]));
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

        let started_at = body["started_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(started_at).is_ok());
    }
}
