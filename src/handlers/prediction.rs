use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::prediction::{PredictResults, PredictionForm, PredictionRecord, PredictionSummary},
    models::session::SessionClaims,
    repositories::prediction as prediction_repo,
    services::relay,
    state::AppState,
};

/// The request payload for saving a cost prediction from the dashboard.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SavePredictionRequest {
    pub form_data: PredictionForm,
    pub results: PredictResults,
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
    pub predictions: Vec<PredictionSummary>,
}

/// The response payload for one record.
#[derive(Serialize)]
pub struct DetailResponse {
    pub success: bool,
    pub prediction: PredictionRecord,
}

/// Persists one cost-prediction submission.
#[axum::debug_handler]
pub async fn save(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<SavePredictionRequest>,
) -> Result<Response> {
    let lama_rawat = relay::parse_lama_rawat(&req.form_data)?;

    let id = prediction_repo::insert(
        &state.db,
        claims.user_id,
        &req.form_data,
        lama_rawat,
        &req.results,
    )
    .await?;

    tracing::info!("✅ Prediction {} saved for user {}", id, claims.user_id);

    Ok(Json(SaveResponse {
        success: true,
        message: "Prediction saved successfully",
        id,
    })
    .into_response())
}

/// Lists the caller's prediction history, newest first.
#[axum::debug_handler]
pub async fn history(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Response> {
    let predictions = prediction_repo::list_for_user(&state.db, claims.user_id).await?;

    Ok(Json(HistoryResponse {
        success: true,
        predictions,
    })
    .into_response())
}

/// Fetches one prediction record.
///
/// A record owned by a different user is a plain 404; existence is never
/// leaked across owners.
#[axum::debug_handler]
pub async fn detail(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let prediction = prediction_repo::find_by_id(&state.db, id, claims.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(DetailResponse {
        success: true,
        prediction,
    })
    .into_response())
}
