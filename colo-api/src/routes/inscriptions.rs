//! Inscription, transport and staff endpoints

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use colo_core::types::{
    Animateur, AuditAction, Inscription, StatutInscription, Transport,
};

use crate::dto::{
    AssignAnimateurRequest, CreateInscriptionRequest, SejourFilter, UpdateStatutRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::SessionClaims;
use crate::state::AppState;

pub async fn create_inscription(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(req): Json<CreateInscriptionRequest>,
) -> ApiResult<Json<Inscription>> {
    let inscription = Inscription {
        id: None,
        enfant_id: req.enfant_id,
        sejour_id: req.sejour_id,
        statut: StatutInscription::EnAttente,
        transport_aller_id: req.transport_aller_id,
        transport_retour_id: req.transport_retour_id,
        created_at: None,
        updated_at: None,
    };
    let created = state.inscriptions.create(&inscription).await?;

    if let Some(id) = created.id {
        let principal = claims.principal();
        state
            .edit_logger
            .log(
                Some(&principal),
                AuditAction::Create,
                "inscriptions",
                &id.to_string(),
                None,
                serde_json::to_value(&created).ok(),
            )
            .await;
    }

    Ok(Json(created))
}

pub async fn list_inscriptions(
    State(state): State<AppState>,
    Query(filter): Query<SejourFilter>,
) -> ApiResult<Json<Vec<Inscription>>> {
    let sejour_id = filter
        .sejour_id
        .ok_or_else(|| ApiError::BadRequest("Le paramètre sejour_id est requis".to_string()))?;
    Ok(Json(state.inscriptions.list_by_sejour(sejour_id).await?))
}

pub async fn update_statut(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(inscription_id): Path<i64>,
    Json(req): Json<UpdateStatutRequest>,
) -> ApiResult<Json<Inscription>> {
    let statut = StatutInscription::parse(&req.statut)
        .ok_or_else(|| ApiError::BadRequest(format!("Statut inconnu : {}", req.statut)))?;

    let before = state
        .inscriptions
        .get(inscription_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Inscription {} introuvable", inscription_id))
        })?;

    let updated = state.inscriptions.set_statut(inscription_id, statut).await?;

    let principal = claims.principal();
    state
        .edit_logger
        .log(
            Some(&principal),
            AuditAction::Update,
            "inscriptions",
            &inscription_id.to_string(),
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&updated).ok(),
        )
        .await;

    Ok(Json(updated))
}

pub async fn list_transports(
    State(state): State<AppState>,
    Query(filter): Query<SejourFilter>,
) -> ApiResult<Json<Vec<Transport>>> {
    let sejour_id = filter
        .sejour_id
        .ok_or_else(|| ApiError::BadRequest("Le paramètre sejour_id est requis".to_string()))?;
    Ok(Json(state.transports.list_by_sejour(sejour_id).await?))
}

pub async fn create_transport(
    State(state): State<AppState>,
    Json(transport): Json<Transport>,
) -> ApiResult<Json<Transport>> {
    Ok(Json(state.transports.create(&transport).await?))
}

pub async fn list_animateurs(
    State(state): State<AppState>,
    Query(filter): Query<SejourFilter>,
) -> ApiResult<Json<Vec<Animateur>>> {
    Ok(Json(state.animateurs.list(filter.sejour_id).await?))
}

pub async fn create_animateur(
    State(state): State<AppState>,
    Json(animateur): Json<Animateur>,
) -> ApiResult<Json<Animateur>> {
    Ok(Json(state.animateurs.create(&animateur).await?))
}

pub async fn assign_animateur(
    State(state): State<AppState>,
    Path(animateur_id): Path<i64>,
    Json(req): Json<AssignAnimateurRequest>,
) -> ApiResult<Json<Animateur>> {
    Ok(Json(
        state.animateurs.assign(animateur_id, req.sejour_id).await?,
    ))
}
