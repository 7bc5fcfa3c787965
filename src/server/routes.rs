//! HTTP API for crop recommendation and disease detection.
//!
//! - POST /recommend-crop/ — soil features in, crop + advisory out
//! - POST /detect-disease/ — leaf image in, disease + advisory out
//! - GET  /                — health check

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::advisory::client::{AdvisoryError, AdvisoryProvider};
use crate::advisory::format::clean_advisory;
use crate::advisory::prompt::{crop_prompt, disease_prompt, CropPromptParams, Language};
use crate::inference::crop::{CropClassifier, CropFeatures};
use crate::inference::disease::DiseaseClassifier;
use crate::inference::InferenceError;

/// Fixed advisory for a healthy crop prediction.
const HEALTHY_CROP_ADVISORY: &str = "Crop is healthy. No additional recommendations needed.";

/// Fixed advisory for a healthy plant image.
const HEALTHY_PLANT_ADVISORY: &str = "Plant is healthy. No issues detected.";

/// Application state shared across handlers. The models are read-only, so
/// concurrent requests can run inference without coordination.
pub struct AppState {
    pub crop_model: CropClassifier,
    pub disease_model: DiseaseClassifier,
    pub advisor: Arc<dyn AdvisoryProvider>,
    pub start_time: Instant,
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Permissive CORS for now; tighten to known frontend origins when
    // deploying.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/recommend-crop/", post(recommend_crop))
        .route("/detect-disease/", post(detect_disease))
        .route("/", get(root))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─── Request/Response Types ────────────────────────────────────────────────

/// Crop recommendation request body.
#[derive(Debug, Deserialize)]
pub struct CropRequest {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
    pub location: String,
    pub area: f64,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CropResponse {
    pub crop: String,
    pub gemini_insights: String,
}

#[derive(Debug, Serialize)]
pub struct DiseaseResponse {
    pub disease: String,
    pub gemini_insights: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

// ─── Errors ────────────────────────────────────────────────────────────────

/// Per-request failure. Handlers return this explicitly; the transport
/// layer maps each variant to a status code and an `{"error": ...}` body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("Advisory generation failed: {0}")]
    Advisory(#[from] AdvisoryError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Advisory(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self, "Request failed");
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn recommend_crop(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CropRequest>, JsonRejection>,
) -> Result<Json<CropResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let request_id = Uuid::new_v4().to_string();

    let features = CropFeatures {
        n: req.n,
        p: req.p,
        k: req.k,
        temperature: req.temperature,
        humidity: req.humidity,
        ph: req.ph,
        rainfall: req.rainfall,
    };
    let prediction = state.crop_model.predict(&features)?;

    info!(
        request_id = %request_id,
        crop = %prediction.label,
        confidence = f64::from(prediction.confidence),
        location = %req.location,
        "Crop recommendation"
    );

    if prediction.label.eq_ignore_ascii_case("healthy") {
        return Ok(Json(CropResponse {
            crop: "Healthy".to_string(),
            gemini_insights: HEALTHY_CROP_ADVISORY.to_string(),
        }));
    }

    let prompt = crop_prompt(&CropPromptParams {
        crop: &prediction.label,
        n: req.n,
        p: req.p,
        k: req.k,
        temperature: req.temperature,
        humidity: req.humidity,
        ph: req.ph,
        rainfall: req.rainfall,
        location: &req.location,
        area: req.area,
        language: Language::from_code(req.language.as_deref()),
    });
    let advisory = state.advisor.generate(&prompt).await?;

    Ok(Json(CropResponse {
        crop: prediction.label,
        gemini_insights: clean_advisory(&advisory),
    }))
}

async fn detect_disease(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<DiseaseResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();

    let mut image_bytes = None;
    let mut language_code = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                image_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                );
            }
            Some("language") => {
                language_code = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let bytes =
        image_bytes.ok_or_else(|| ApiError::BadRequest("missing image field".to_string()))?;
    // An undecodable upload is the caller's problem, not an inference bug.
    let image =
        DiseaseClassifier::decode(&bytes).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let prediction = state.disease_model.predict(&image)?;

    info!(
        request_id = %request_id,
        disease = %prediction.label,
        confidence = f64::from(prediction.confidence),
        "Disease detection"
    );

    // Every per-crop healthy label short-circuits the same way; the full
    // label is returned so the caller still sees which crop was recognized.
    if prediction.label.to_lowercase().contains("healthy") {
        return Ok(Json(DiseaseResponse {
            disease: prediction.label,
            gemini_insights: HEALTHY_PLANT_ADVISORY.to_string(),
        }));
    }

    let prompt = disease_prompt(
        &prediction.label,
        Language::from_code(language_code.as_deref()),
    );
    let advisory = state.advisor.generate(&prompt).await?;

    Ok(Json(DiseaseResponse {
        disease: prediction.label,
        gemini_insights: clean_advisory(&advisory),
    }))
}

async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    info!(
        uptime_secs = state.start_time.elapsed().as_secs(),
        "Health check"
    );
    Json(RootResponse {
        message: "agro-advisor backend is running!".to_string(),
    })
}
