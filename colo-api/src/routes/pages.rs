//! Page stubs
//!
//! The real pages are rendered elsewhere; these handlers only exist so the
//! session gate has page paths to protect and to redirect to.

use axum::Extension;
use axum::Json;
use serde_json::{json, Value};

use crate::middleware::SessionClaims;

pub async fn accueil(Extension(claims): Extension<SessionClaims>) -> Json<Value> {
    Json(json!({
        "page": "accueil",
        "principal": claims.sub,
    }))
}

pub async fn login() -> Json<Value> {
    Json(json!({ "page": "login" }))
}

pub async fn signup() -> Json<Value> {
    Json(json!({ "page": "signup" }))
}
