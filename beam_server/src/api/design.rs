//! Beam design endpoints

use axum::{body::Bytes, extract::State, Json};
use beam_core::orchestrator::{predict_beam_design, DesignResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::api::ApiError;
use crate::state::AppState;

/// GET /
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "RCC Beam Design Optimization API is active.".to_string(),
        status: "ok".to_string(),
    })
}

/// POST /srrs_beam
///
/// The body is parsed as JSON whatever its content type.
///
/// ```json
/// { "fck": 30, "fy": 415, "Mu": 120 }
/// ```
pub async fn design_beam(State(state): State<AppState>, body: Bytes) -> Result<Json<DesignEnvelope>, ApiError> {
    let request: Value = serde_json::from_slice(&body).map_err(|e| ApiError::MalformedJson(e.to_string()))?;

    let result = predict_beam_design(&request, &state.models, &state.config.search)?;

    info!(
        fck = result.input.fck_mpa,
        fy = result.input.fy_mpa,
        mu = result.input.mu_knm,
        models = result.predictions.len(),
        "beam design completed"
    );

    Ok(Json(DesignEnvelope {
        status: "success".to_string(),
        result,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DesignEnvelope {
    pub status: String,
    pub result: DesignResponse,
}
