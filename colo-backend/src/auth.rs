//! Identity provider session access
//!
//! `PlatformAuth` holds the service's own session material (a refresh
//! token) and broadcasts auth-state changes to interested components; the
//! session bootstrapper consumes both through the `SessionSource` seam so
//! it can be driven by a fake in tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use colo_core::types::{AuthChange, Principal, Session};

use crate::client::PlatformClient;
use crate::error::{BackendError, BackendResult};

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Source of the current session and of auth-state change events.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Fetch the current session, if any material is available.
    async fn current_session(&self) -> BackendResult<Option<Session>>;

    /// Drop the local session material.
    async fn sign_out(&self) -> BackendResult<()>;

    /// Subscribe to auth-state change events.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    email: Option<String>,
}

/// Session access backed by the hosted identity provider.
pub struct PlatformAuth {
    client: Arc<PlatformClient>,
    refresh_token: Mutex<Option<String>>,
    events: broadcast::Sender<AuthChange>,
}

impl PlatformAuth {
    pub fn new(client: Arc<PlatformClient>, refresh_token: Option<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            client,
            refresh_token: Mutex::new(refresh_token),
            events,
        }
    }

    /// Exchange a refresh token for a fresh session.
    async fn exchange(&self, refresh_token: &str) -> BackendResult<Session> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let request = self
            .client
            .http()
            .post(self.client.auth_url("/token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&body);
        let response = self.client.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        let token: TokenResponse = response.json().await?;

        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token.clone(),
            expires_at: token.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
            principal: Principal::new(token.user.id, token.user.email),
        };

        if let Some(next) = token.refresh_token {
            *self.refresh_token.lock().await = Some(next);
        }
        let _ = self.events.send(AuthChange::TokenRefreshed(session.clone()));
        Ok(session)
    }

    /// Look up the principal behind a user access token.
    pub async fn user_from_token(&self, access_token: &str) -> BackendResult<Principal> {
        let request = self
            .client
            .http()
            .get(self.client.auth_url("/user"))
            .header("apikey", self.client.service_key())
            .bearer_auth(access_token);
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        let user: TokenUser = response.json().await?;
        Ok(Principal::new(user.id, user.email))
    }
}

#[async_trait]
impl SessionSource for PlatformAuth {
    async fn current_session(&self) -> BackendResult<Option<Session>> {
        let stored = self.refresh_token.lock().await.clone();
        match stored {
            None => Ok(None),
            Some(token) => {
                let session = self.exchange(&token).await?;
                debug!(principal = %session.principal.id, "session established");
                Ok(Some(session))
            }
        }
    }

    async fn sign_out(&self) -> BackendResult<()> {
        *self.refresh_token.lock().await = None;
        // receivers may be gone; a sign-out with nobody listening is fine
        let _ = self.events.send(AuthChange::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}
