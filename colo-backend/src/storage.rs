//! File storage operations
//!
//! Asset removal is best-effort: each path is attempted independently and
//! failures are reported back per path so the caller can answer with a
//! partial-success status.

use serde::Serialize;
use tracing::warn;

use crate::client::PlatformClient;
use crate::error::BackendError;

/// Outcome of one asset removal attempt.
#[derive(Debug, Clone, Serialize)]
pub struct AssetRemoval {
    pub path: String,
    pub removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlatformClient {
    /// Remove stored objects from a bucket, one at a time.
    ///
    /// Never fails as a whole; each entry in the result says whether that
    /// path was removed.
    pub async fn remove_objects(&self, bucket: &str, paths: &[String]) -> Vec<AssetRemoval> {
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            let url = self.storage_url(&format!("/object/{}/{}", bucket, path));
            let outcome = match self.authed(self.http().delete(url)).send().await {
                Ok(response) if response.status().is_success() => AssetRemoval {
                    path: path.clone(),
                    removed: true,
                    error: None,
                },
                Ok(response) => {
                    let err = BackendError::from_response(response).await;
                    warn!(path = %path, error = %err, "asset removal failed");
                    AssetRemoval {
                        path: path.clone(),
                        removed: false,
                        error: Some(err.to_string()),
                    }
                }
                Err(err) => {
                    warn!(path = %path, error = %err, "asset removal failed");
                    AssetRemoval {
                        path: path.clone(),
                        removed: false,
                        error: Some(err.to_string()),
                    }
                }
            };
            results.push(outcome);
        }
        results
    }
}
