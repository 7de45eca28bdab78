//! Request/response DTOs
//!
//! The admin proxy endpoints keep the camelCase field names their callers
//! already send; the camp CRUD endpoints speak the row vocabulary of
//! `colo-core` directly.

use serde::{Deserialize, Serialize};

use colo_backend::{AssetRemoval, PlatformUser};
use colo_core::types::{Adulte, Enfant, Famille, FicheSanitaire};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub user: PlatformUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectRequest {
    pub project_id: i64,
    #[serde(default)]
    pub assets: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteProjectResponse {
    pub deleted: bool,
    pub assets: Vec<AssetRemoval>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateProjectRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub assets: Vec<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Family creation: the household plus its nested records in one payload.
#[derive(Debug, Deserialize)]
pub struct CreateFamilleRequest {
    #[serde(flatten)]
    pub famille: Famille,
    #[serde(default)]
    pub adultes: Vec<Adulte>,
    #[serde(default)]
    pub enfants: Vec<EnfantRequest>,
}

#[derive(Debug, Deserialize)]
pub struct EnfantRequest {
    #[serde(flatten)]
    pub enfant: Enfant,
    pub fiche_sanitaire: Option<FicheSanitaire>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInscriptionRequest {
    pub enfant_id: i64,
    pub sejour_id: i64,
    pub transport_aller_id: Option<i64>,
    pub transport_retour_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatutRequest {
    pub statut: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignAnimateurRequest {
    pub sejour_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SejourQuery {
    pub centre_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SejourFilter {
    pub sejour_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct VilleQuery {
    pub code_postal: String,
}
