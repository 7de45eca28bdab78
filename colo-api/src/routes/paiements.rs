//! Payment endpoints

use axum::extract::{Path, State};
use axum::Json;

use colo_core::types::Paiement;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_paiements(
    State(state): State<AppState>,
    Path(famille_id): Path<i64>,
) -> ApiResult<Json<Vec<Paiement>>> {
    Ok(Json(state.paiements.list_by_famille(famille_id).await?))
}
