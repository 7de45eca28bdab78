//! Centre and séjour endpoints

use axum::extract::{Path, Query, State};
use axum::Json;

use colo_core::types::{Centre, Sejour};

use crate::dto::SejourQuery;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn list_centres(State(state): State<AppState>) -> ApiResult<Json<Vec<Centre>>> {
    Ok(Json(state.centres.list().await?))
}

pub async fn get_centre(
    State(state): State<AppState>,
    Path(centre_id): Path<i64>,
) -> ApiResult<Json<Centre>> {
    let centre = state
        .centres
        .get(centre_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Centre {} introuvable", centre_id)))?;
    Ok(Json(centre))
}

pub async fn create_centre(
    State(state): State<AppState>,
    Json(centre): Json<Centre>,
) -> ApiResult<Json<Centre>> {
    if centre.nom.trim().is_empty() {
        return Err(ApiError::BadRequest("Le nom du centre est requis".to_string()));
    }
    Ok(Json(state.centres.create(&centre).await?))
}

pub async fn list_sejours(
    State(state): State<AppState>,
    Query(query): Query<SejourQuery>,
) -> ApiResult<Json<Vec<Sejour>>> {
    Ok(Json(state.sejours.list(query.centre_id).await?))
}

pub async fn get_sejour(
    State(state): State<AppState>,
    Path(sejour_id): Path<i64>,
) -> ApiResult<Json<Sejour>> {
    let sejour = state
        .sejours
        .get(sejour_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Séjour {} introuvable", sejour_id)))?;
    Ok(Json(sejour))
}

pub async fn create_sejour(
    State(state): State<AppState>,
    Json(sejour): Json<Sejour>,
) -> ApiResult<Json<Sejour>> {
    if sejour.date_fin < sejour.date_debut {
        return Err(ApiError::BadRequest(
            "La date de fin précède la date de début".to_string(),
        ));
    }
    if sejour.age_min > sejour.age_max {
        return Err(ApiError::BadRequest(
            "La tranche d'âge est incohérente".to_string(),
        ));
    }
    Ok(Json(state.sejours.create(&sejour).await?))
}
