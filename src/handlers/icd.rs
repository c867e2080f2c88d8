use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::icd::Icd,
    models::session::SessionClaims,
    repositories::icd as icd_repo,
    state::AppState,
};

/// The request payload for creating or updating a diagnosis code.
#[derive(Deserialize, Debug)]
pub struct IcdRequest {
    pub code: String,
    pub description: String,
}

/// The response payload for the ICD list.
#[derive(Serialize)]
pub struct IcdListResponse {
    pub success: bool,
    pub data: Vec<Icd>,
}

/// The response payload for a single ICD record.
#[derive(Serialize)]
pub struct IcdResponse {
    pub success: bool,
    pub icd: Icd,
}

/// The response payload for mutating operations.
#[derive(Serialize)]
pub struct IcdMutationResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

fn validate_icd_request(req: &IcdRequest) -> Result<()> {
    if req.code.trim().is_empty() || req.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Code and description are required".to_string(),
        ));
    }
    Ok(())
}

/// Lists every diagnosis code, ordered by code.
#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Extension(_claims): Extension<SessionClaims>,
) -> Result<Response> {
    let data = icd_repo::list(&state.db).await?;

    Ok(Json(IcdListResponse { success: true, data }).into_response())
}

/// Fetches one diagnosis code by id.
#[axum::debug_handler]
pub async fn get(
    State(state): State<AppState>,
    Extension(_claims): Extension<SessionClaims>,
    Path(id): Path<i32>,
) -> Result<Response> {
    let icd = icd_repo::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(IcdResponse { success: true, icd }).into_response())
}

/// Creates a new diagnosis code.
#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<IcdRequest>,
) -> Result<Response> {
    validate_icd_request(&req)?;

    let code = req.code.trim();
    let description = req.description.trim();

    if icd_repo::code_exists(&state.db, code, None).await? {
        return Err(AppError::Conflict("ICD code already exists".to_string()));
    }

    let id = icd_repo::insert(&state.db, code, description).await?;
    tracing::info!("✅ ICD {} added by {}", code, claims.user_id);

    Ok((
        StatusCode::CREATED,
        Json(IcdMutationResponse {
            success: true,
            message: "ICD added successfully",
            id: Some(id),
        }),
    )
        .into_response())
}

/// Updates an existing diagnosis code.
///
/// The duplicate check ignores the row being updated, so re-saving a
/// record under its own code is not a conflict.
#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<i32>,
    Json(req): Json<IcdRequest>,
) -> Result<Response> {
    validate_icd_request(&req)?;

    icd_repo::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let code = req.code.trim();
    let description = req.description.trim();

    if icd_repo::code_exists(&state.db, code, Some(id)).await? {
        return Err(AppError::Conflict("ICD code already exists".to_string()));
    }

    icd_repo::update(&state.db, id, code, description).await?;
    tracing::info!("✅ ICD {} updated by {}", id, claims.user_id);

    Ok(Json(IcdMutationResponse {
        success: true,
        message: "ICD updated successfully",
        id: None,
    })
    .into_response())
}

/// Deletes a diagnosis code.
#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<i32>,
) -> Result<Response> {
    let affected = icd_repo::delete(&state.db, id).await?;
    if affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!("✅ ICD {} deleted by {}", id, claims.user_id);

    Ok(Json(IcdMutationResponse {
        success: true,
        message: "ICD deleted successfully",
        id: None,
    })
    .into_response())
}
