//! Auth admin operations
//!
//! The platform's admin API manages identity accounts. Account lookup by
//! email is not indexed upstream; it walks the paginated listing until the
//! address is found or the listing runs out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::PlatformClient;
use crate::error::{BackendError, BackendResult};

/// Page size used when walking the admin listing.
const LIST_PAGE_SIZE: u32 = 50;

/// An identity account as reported by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ListUsersResponse {
    users: Vec<PlatformUser>,
}

impl PlatformClient {
    /// Create an identity account with a confirmed email.
    pub async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
    ) -> BackendResult<PlatformUser> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "email_confirm": true,
        });
        let request = self.http().post(self.auth_url("/admin/users")).json(&body);
        let response = self.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// One page of the admin account listing.
    pub async fn admin_list_users(
        &self,
        page: u32,
        per_page: u32,
    ) -> BackendResult<Vec<PlatformUser>> {
        let request = self
            .http()
            .get(self.auth_url("/admin/users"))
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())]);
        let response = self.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        let listing: ListUsersResponse = response.json().await?;
        Ok(listing.users)
    }

    /// Find an account by email, walking the listing page by page.
    pub async fn admin_find_user_by_email(
        &self,
        email: &str,
    ) -> BackendResult<Option<PlatformUser>> {
        let mut page = 1;
        loop {
            let users = self.admin_list_users(page, LIST_PAGE_SIZE).await?;
            if let Some(user) = users.iter().find(|u| {
                u.email
                    .as_deref()
                    .map(|e| e.eq_ignore_ascii_case(email))
                    .unwrap_or(false)
            }) {
                return Ok(Some(user.clone()));
            }
            if users.len() < LIST_PAGE_SIZE as usize {
                return Ok(None);
            }
            page += 1;
        }
    }

    /// Update an account's password.
    pub async fn admin_update_password(
        &self,
        user_id: &str,
        new_password: &str,
    ) -> BackendResult<PlatformUser> {
        let body = serde_json::json!({ "password": new_password });
        let request = self
            .http()
            .put(self.auth_url(&format!("/admin/users/{}", user_id)))
            .json(&body);
        let response = self.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(response.json().await?)
    }
}
