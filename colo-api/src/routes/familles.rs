//! Family endpoints
//!
//! Creation takes the household and its nested records in one payload; the
//! writes behind it are sequential and a mid-sequence failure surfaces as
//! an error while keeping the rows already written.

use axum::extract::{Path, State};
use axum::{Extension, Json};

use colo_backend::FamilleComplete;
use colo_core::types::{AuditAction, Famille};

use crate::dto::CreateFamilleRequest;
use crate::error::{ApiError, ApiResult};
use crate::middleware::SessionClaims;
use crate::state::AppState;

pub async fn create_famille(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<CreateFamilleRequest>,
) -> ApiResult<Json<FamilleComplete>> {
    if req.famille.nom.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Le nom de la famille est requis".to_string(),
        ));
    }

    let enfants: Vec<_> = req
        .enfants
        .into_iter()
        .map(|e| (e.enfant, e.fiche_sanitaire))
        .collect();
    let created = state
        .familles
        .create_with_nested(&req.famille, &req.adultes, &enfants)
        .await?;

    if let Some(id) = created.famille.id {
        let principal = claims.principal();
        state
            .edit_logger
            .log(
                Some(&principal),
                AuditAction::Create,
                "familles",
                &id.to_string(),
                None,
                serde_json::to_value(&created.famille).ok(),
            )
            .await;
    }

    Ok(Json(created))
}

pub async fn list_familles(State(state): State<AppState>) -> ApiResult<Json<Vec<Famille>>> {
    Ok(Json(state.familles.list().await?))
}

pub async fn get_famille(
    State(state): State<AppState>,
    Path(famille_id): Path<i64>,
) -> ApiResult<Json<FamilleComplete>> {
    let famille = state
        .familles
        .get_complete(famille_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Famille {} introuvable", famille_id)))?;
    Ok(Json(famille))
}

pub async fn update_famille(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(famille_id): Path<i64>,
    Json(patch): Json<Famille>,
) -> ApiResult<Json<Famille>> {
    let before = state
        .familles
        .get(famille_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Famille {} introuvable", famille_id)))?;

    let updated = state.familles.update(famille_id, &patch).await?;

    let principal = claims.principal();
    state
        .edit_logger
        .log(
            Some(&principal),
            AuditAction::Update,
            "familles",
            &famille_id.to_string(),
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&updated).ok(),
        )
        .await;

    Ok(Json(updated))
}

pub async fn delete_famille(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(famille_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let before = state
        .familles
        .get(famille_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Famille {} introuvable", famille_id)))?;

    state.familles.delete(famille_id).await?;

    let principal = claims.principal();
    state
        .edit_logger
        .log(
            Some(&principal),
            AuditAction::Delete,
            "familles",
            &famille_id.to_string(),
            serde_json::to_value(&before).ok(),
            None,
        )
        .await;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
