// ============================================================
// API Layer — Handlers
// ============================================================
// One handler per route, plus the single place where service
// errors become HTTP responses. Every error body has the same
// shape: {"error": "<human-readable message>"} — no stack
// traces, no internal paths.

use anyhow::anyhow;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::api::state::AppState;
use crate::application::predict_use_case::PredictUseCase;
use crate::domain::report::RetrainReport;
use crate::domain::traits::ImageClassifier;
use crate::error::ServiceError;

// ─── Response bodies ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: String,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct RetrainResponse {
    pub status:  String,
    pub samples: usize,
    pub skipped: usize,
    pub epochs:  usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ─── Error mapping ────────────────────────────────────────────────────────────

/// Newtype so ServiceError can implement axum's IntoResponse.
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

/// Which status code each service error surfaces as.
pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::InvalidArchive(_)
        | ServiceError::NoValidData
        | ServiceError::DecodeFailure(_)
        | ServiceError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
        ServiceError::RetrainInProgress => StatusCode::CONFLICT,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The full cause chain goes to the logs; the client only
        // sees the variant's Display string.
        if let ServiceError::Internal(ref cause) = self.0 {
            tracing::error!("Internal error serving a request: {cause:#}");
        }

        let status = status_for(&self.0);
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "service is running".to_string(),
    })
}

/// POST /predict — multipart image upload → label + confidence.
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let bytes = read_upload(&mut multipart).await?;

    // Read lock: many predictions in parallel, blocked only for
    // the instant a finished retrain swaps the classifier in
    let classifier = state.classifier.read().await;
    let prediction = classifier.classify(&bytes)?;

    Ok(Json(PredictResponse {
        prediction: prediction.label,
        confidence: prediction.confidence,
    }))
}

/// POST /retrain — multipart zip upload → retrain summary.
///
/// The gate is held for the entire run. Training happens on the
/// blocking pool, so predictions keep being served against the
/// previous model; the swap happens only after the new artifact
/// is fully persisted.
pub async fn retrain(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RetrainResponse>, ApiError> {
    let _gate = state
        .retrain_gate
        .try_lock()
        .map_err(|_| ServiceError::RetrainInProgress)?;

    let bytes = read_upload(&mut multipart).await?;

    let retrainer = state.retrainer.clone();
    let store = state.store.clone();
    let labels = state.labels.clone();

    let (report, refreshed) = tokio::task::spawn_blocking(
        move || -> Result<(RetrainReport, PredictUseCase), ServiceError> {
            let report = retrainer.execute_archive(&bytes)?;
            // Rebuild the serving classifier from the artifact that
            // was just persisted
            let refreshed = PredictUseCase::from_store(&store, labels)?;
            Ok((report, refreshed))
        },
    )
    .await
    .map_err(|e| ServiceError::Internal(anyhow!("retrain task failed: {e}")))??;

    // Swap: new requests see the new model from here on
    *state.classifier.write().await = refreshed;

    Ok(Json(RetrainResponse {
        status: "model retrained and updated".to_string(),
        samples: report.samples,
        skipped: report.skipped.len(),
        epochs: report.epochs,
    }))
}

/// Pull the first uploaded file out of a multipart body.
async fn read_upload(multipart: &mut Multipart) -> Result<Vec<u8>, ServiceError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::InvalidUpload(e.to_string()))?
        .ok_or_else(|| ServiceError::InvalidUpload("expected a multipart file field".into()))?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ServiceError::InvalidUpload(e.to_string()))?;

    if bytes.is_empty() {
        return Err(ServiceError::InvalidUpload("uploaded file is empty".into()));
    }
    Ok(bytes.to_vec())
}
