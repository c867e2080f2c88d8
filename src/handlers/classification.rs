use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::classification::{ClassificationDetail, ClassificationSummary},
    models::prediction::PredictionForm,
    models::session::SessionClaims,
    repositories::classification as classification_repo,
    services::relay,
    state::AppState,
};

/// The classification payload as submitted by the dashboard.
///
/// The three axis results are kept as opaque JSON here; whatever shape the
/// upstream service produced is what gets serialized into the row.
#[derive(Deserialize, Debug)]
pub struct ClassificationPayload {
    pub drug: sonic_rs::Value,
    pub radio: sonic_rs::Value,
    pub laborat: sonic_rs::Value,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// The request payload for saving a classification result set.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SaveClassificationRequest {
    pub form_data: PredictionForm,
    pub results: ClassificationPayload,
}

/// The response payload after a successful save.
#[derive(Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: &'static str,
    pub id: i64,
}

/// The response payload for the history list.
#[derive(Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub classifications: Vec<ClassificationSummary>,
}

/// The response payload for one record, blobs decoded.
#[derive(Serialize)]
pub struct DetailResponse {
    pub success: bool,
    pub classification: ClassificationDetail,
}

/// Parses the upstream timestamp, falling back to "now" when it is absent
/// or malformed.
pub(crate) fn parse_api_timestamp(timestamp: Option<&str>) -> DateTime<Utc> {
    timestamp
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

/// Persists one classification submission with its three result blobs.
#[axum::debug_handler]
pub async fn save(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<SaveClassificationRequest>,
) -> Result<Response> {
    let lama_rawat = relay::parse_lama_rawat(&req.form_data)?;

    let drug = sonic_rs::to_string(&req.results.drug)
        .map_err(|e| AppError::Internal(format!("drug blob serialization: {}", e)))?;
    let radio = sonic_rs::to_string(&req.results.radio)
        .map_err(|e| AppError::Internal(format!("radio blob serialization: {}", e)))?;
    let laborat = sonic_rs::to_string(&req.results.laborat)
        .map_err(|e| AppError::Internal(format!("laborat blob serialization: {}", e)))?;

    let api_timestamp = parse_api_timestamp(req.results.timestamp.as_deref());

    let id = classification_repo::insert(
        &state.db,
        claims.user_id,
        &req.form_data,
        lama_rawat,
        &drug,
        &radio,
        &laborat,
        api_timestamp,
    )
    .await?;

    tracing::info!("✅ Classification {} saved for user {}", id, claims.user_id);

    Ok(Json(SaveResponse {
        success: true,
        message: "Classification saved successfully",
        id,
    })
    .into_response())
}

/// Lists the caller's classification history, newest first.
#[axum::debug_handler]
pub async fn history(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Response> {
    let classifications = classification_repo::list_for_user(&state.db, claims.user_id).await?;

    Ok(Json(HistoryResponse {
        success: true,
        classifications,
    })
    .into_response())
}

/// Fetches one classification record with its blobs decoded per field.
///
/// Each of the three stored blobs is parsed on its own; one malformed blob
/// comes back as raw text while the others decode normally.
#[axum::debug_handler]
pub async fn detail(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let record = classification_repo::find_by_id(&state.db, id, claims.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(DetailResponse {
        success: true,
        classification: ClassificationDetail::from(record),
    })
    .into_response())
}
