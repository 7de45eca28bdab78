//! Platform HTTP client
//!
//! One client per process, constructed explicitly and passed down; the
//! repositories and services all hold an `Arc<PlatformClient>`.

use reqwest::RequestBuilder;
use std::time::Duration;

use crate::error::{BackendError, BackendResult};

/// Connection settings for the hosted platform.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Base URL of the platform (no trailing slash)
    pub base_url: String,
    /// Privileged service key used for admin and row operations
    pub service_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PlatformConfig {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            timeout_secs: 30,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// HTTP client for the hosted platform.
pub struct PlatformClient {
    http: reqwest::Client,
    config: PlatformConfig,
}

impl PlatformClient {
    pub fn new(config: PlatformConfig) -> BackendResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn service_key(&self) -> &str {
        &self.config.service_key
    }

    /// Row API endpoint for a table.
    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, table)
    }

    /// Auth API endpoint.
    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.config.base_url, path)
    }

    /// File storage endpoint.
    pub(crate) fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1{}", self.config.base_url, path)
    }

    /// Attach the service credentials to a request.
    pub(crate) fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = PlatformConfig::new("https://exemple.supa.co/", "clef");
        let client = PlatformClient::new(config).unwrap();
        assert_eq!(
            client.rest_url("familles"),
            "https://exemple.supa.co/rest/v1/familles"
        );
        assert_eq!(client.auth_url("/admin/users"), "https://exemple.supa.co/auth/v1/admin/users");
    }
}
