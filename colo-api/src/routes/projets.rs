//! Project endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use colo_core::types::AuditAction;

use crate::dto::{DeleteProjectRequest, DeleteProjectResponse, GenerateProjectRequest};
use crate::error::{ApiError, ApiResult};
use crate::middleware::SessionClaims;
use crate::state::AppState;

/// Create a project owned by the session's principal.
pub async fn generate(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<GenerateProjectRequest>,
) -> ApiResult<Json<colo_core::types::Projet>> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Le titre est requis".to_string()));
    }

    let principal = claims.principal();
    let owner_id = state
        .resolver
        .resolve(&principal)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let projet = state
        .projets
        .create(
            owner_id,
            req.title.trim().to_string(),
            req.description,
            req.assets,
            req.metadata,
        )
        .await?;

    if let Some(id) = projet.id {
        state
            .edit_logger
            .log(
                Some(&principal),
                AuditAction::Create,
                "projets",
                &id.to_string(),
                None,
                serde_json::to_value(&projet).ok(),
            )
            .await;
    }

    Ok(Json(projet))
}

/// Delete a project and best-effort remove its stored assets.
///
/// Returns 207 when the row deletion succeeded but at least one asset
/// removal failed.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<DeleteProjectRequest>,
) -> ApiResult<Response> {
    let before = state
        .projets
        .get(req.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Projet {} introuvable", req.project_id)))?;

    state.projets.delete(req.project_id).await?;

    let assets = state
        .platform
        .remove_objects(&state.config.assets_bucket, &req.assets)
        .await;

    let principal = claims.principal();
    state
        .edit_logger
        .log(
            Some(&principal),
            AuditAction::Delete,
            "projets",
            &req.project_id.to_string(),
            serde_json::to_value(&before).ok(),
            None,
        )
        .await;

    let status = if assets.iter().any(|a| !a.removed) {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::OK
    };
    let body = DeleteProjectResponse {
        deleted: true,
        assets,
    };
    Ok((status, Json(body)).into_response())
}
