//! City lookup endpoint

use axum::extract::{Query, State};
use axum::Json;

use colo_backend::services::Commune;

use crate::dto::VilleQuery;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn lookup_villes(
    State(state): State<AppState>,
    Query(query): Query<VilleQuery>,
) -> ApiResult<Json<Vec<Commune>>> {
    let code = query.code_postal.trim();
    if code.len() != 5 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::BadRequest("Code postal invalide".to_string()));
    }
    Ok(Json(state.villes.by_code_postal(code).await?))
}
