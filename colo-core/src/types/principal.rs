//! Authenticated principal and session types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated end user as reported by the hosted identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque external identity id (the provider's user id)
    pub id: String,
    /// Email, when the provider knows one
    pub email: Option<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

/// A live session against the hosted identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub principal: Principal,
}

/// Auth-state change notification from the identity provider.
#[derive(Debug, Clone)]
pub enum AuthChange {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}
