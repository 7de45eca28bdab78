//! Account management endpoints
//!
//! These proxy the platform's auth admin API. Signup repairs half-created
//! accounts: when the email is already registered, aligning the password on
//! the existing account counts as success.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::dto::{AccountResponse, ResetPasswordRequest, SignupRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

fn check_email(email: &str) -> ApiResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("Adresse e-mail invalide".to_string()));
    }
    Ok(email)
}

fn check_password(password: &str) -> ApiResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(
            "Le mot de passe doit contenir au moins 6 caractères".to_string(),
        ));
    }
    Ok(())
}

/// Create an identity account, or repair an existing one.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    let email = check_email(&req.email)?;
    check_password(&req.password)?;

    match state.platform.admin_create_user(&email, &req.password).await {
        Ok(user) => {
            info!(user_id = %user.id, "account created");
            Ok((StatusCode::OK, Json(AccountResponse { user })))
        }
        Err(err) if err.is_conflict() => {
            let existing = state
                .platform
                .admin_find_user_by_email(&email)
                .await?
                .ok_or_else(|| {
                    ApiError::Conflict("Un compte existe déjà pour cette adresse".to_string())
                })?;
            match state
                .platform
                .admin_update_password(&existing.id, &req.password)
                .await
            {
                Ok(user) => {
                    info!(user_id = %user.id, "existing account repaired");
                    Ok((StatusCode::OK, Json(AccountResponse { user })))
                }
                Err(_) => Err(ApiError::Conflict(
                    "Un compte existe déjà pour cette adresse".to_string(),
                )),
            }
        }
        Err(err) => Err(err.into()),
    }
}

/// Update an account's password, locating the account by email.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<Value>> {
    let email = check_email(&req.email)?;
    check_password(&req.new_password)?;

    let user = state
        .platform
        .admin_find_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Aucun compte pour cette adresse".to_string()))?;

    state
        .platform
        .admin_update_password(&user.id, &req.new_password)
        .await?;

    info!(user_id = %user.id, "password reset");
    Ok(Json(json!({ "ok": true })))
}
