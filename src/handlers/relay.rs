use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    models::classification::ClassificationResults,
    models::prediction::{PredictResults, PredictionForm},
    models::session::SessionClaims,
    repositories::{classification as classification_repo, prediction as prediction_repo},
    services::relay,
    state::AppState,
};

use super::classification::parse_api_timestamp;

/// Both upstream result sets plus the ids of their persisted rows.
///
/// An id is null when that result set could not be saved; the results
/// themselves are still returned.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub success: bool,
    pub prediction: PredictResults,
    pub classification: ClassificationResults,
    pub prediction_id: Option<i64>,
    pub classification_id: Option<i64>,
}

/// Runs the full relay: cost prediction first, then procedure
/// classification, persisting each result set independently.
///
/// Classification is only attempted once cost prediction has succeeded.
/// A failed insert is logged and reported as a null id in the response; it
/// never blocks the other result set or the display of either.
#[axum::debug_handler]
pub async fn predict(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(form): Json<PredictionForm>,
) -> Result<Response> {
    if form.icd_primer.trim().is_empty() {
        return Err(AppError::Validation("icdPrimer is required".to_string()));
    }
    if form.tipe_pasien.trim().is_empty() {
        return Err(AppError::Validation("tipePasien is required".to_string()));
    }
    let lama_rawat = relay::parse_lama_rawat(&form)?;

    tracing::info!(
        "🔮 Relay for user {}: {} / {} days / {}",
        claims.user_id,
        form.icd_primer,
        lama_rawat,
        form.tipe_pasien
    );

    let cost = relay::predict_cost(&state, &form).await?;

    let prediction_id =
        match prediction_repo::insert(&state.db, claims.user_id, &form, lama_rawat, &cost).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!("❌ Failed to persist cost prediction: {}", e);
                None
            }
        };

    let classif = relay::classify_procedures(&state, &form, lama_rawat).await?;

    let classification_id = {
        let blobs = (
            sonic_rs::to_string(&classif.drug),
            sonic_rs::to_string(&classif.radio),
            sonic_rs::to_string(&classif.laborat),
        );
        match blobs {
            (Ok(drug), Ok(radio), Ok(laborat)) => {
                let api_timestamp = parse_api_timestamp(Some(&classif.timestamp));
                match classification_repo::insert(
                    &state.db,
                    claims.user_id,
                    &form,
                    lama_rawat,
                    &drug,
                    &radio,
                    &laborat,
                    api_timestamp,
                )
                .await
                {
                    Ok(id) => Some(id),
                    Err(e) => {
                        tracing::error!("❌ Failed to persist classification: {}", e);
                        None
                    }
                }
            }
            _ => {
                tracing::error!("❌ Failed to serialize classification blobs");
                None
            }
        }
    };

    Ok(Json(RelayResponse {
        success: true,
        prediction: cost,
        classification: classif,
        prediction_id,
        classification_id,
    })
    .into_response())
}
