//! City lookup by postal code
//!
//! Queries the public communes API. Typing in a postal-code field fires a
//! lookup per change, so a new query aborts the previous in-flight request:
//! only the newest caller gets data, superseded callers get
//! `BackendError::Superseded`.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::AbortHandle;

use crate::error::{BackendError, BackendResult};

const DEFAULT_GEO_API: &str = "https://geo.api.gouv.fr";
const LOOKUP_TIMEOUT_SECS: u64 = 10;

/// A commune as returned by the geo API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commune {
    pub nom: String,
    pub code: String,
    #[serde(rename = "codesPostaux", default)]
    pub codes_postaux: Vec<String>,
}

pub struct VilleLookup {
    http: reqwest::Client,
    base_url: String,
    inflight: Mutex<Option<AbortHandle>>,
}

impl VilleLookup {
    pub fn new() -> BackendResult<Self> {
        Self::with_base_url(DEFAULT_GEO_API)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> BackendResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            inflight: Mutex::new(None),
        })
    }

    /// Look up the communes matching a postal code.
    pub async fn by_code_postal(&self, code_postal: &str) -> BackendResult<Vec<Commune>> {
        let url = format!(
            "{}/communes?codePostal={}&fields=nom,code,codesPostaux",
            self.base_url, code_postal
        );
        let http = self.http.clone();
        let task = tokio::spawn(async move {
            let response = http.get(&url).send().await?;
            if !response.status().is_success() {
                return Err(BackendError::from_response(response).await);
            }
            response
                .json::<Vec<Commune>>()
                .await
                .map_err(BackendError::from)
        });

        // the newest query wins; abort whatever was still running
        let superseded = {
            let mut guard = self
                .inflight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.replace(task.abort_handle())
        };
        if let Some(previous) = superseded {
            previous.abort();
        }

        match task.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => Err(BackendError::Superseded),
            Err(join_err) => Err(BackendError::Connection(join_err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn spawn_geo_stub(delay_first: bool) -> String {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new().route(
            "/communes",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let hits = Arc::clone(&hits);
                async move {
                    let hit = hits.fetch_add(1, Ordering::SeqCst);
                    if delay_first && hit == 0 {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                    let code = params.get("codePostal").cloned().unwrap_or_default();
                    Json(vec![Commune {
                        nom: format!("Ville-{}", code),
                        code: "75056".to_string(),
                        codes_postaux: vec![code],
                    }])
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_lookup_returns_communes() {
        let base = spawn_geo_stub(false).await;
        let lookup = VilleLookup::with_base_url(base).unwrap();

        let communes = lookup.by_code_postal("75011").await.unwrap();
        assert_eq!(communes.len(), 1);
        assert_eq!(communes[0].nom, "Ville-75011");
    }

    #[tokio::test]
    async fn test_new_query_supersedes_inflight_one() {
        let base = spawn_geo_stub(true).await;
        let lookup = Arc::new(VilleLookup::with_base_url(base).unwrap());

        let slow = {
            let lookup = Arc::clone(&lookup);
            tokio::spawn(async move { lookup.by_code_postal("13001").await })
        };
        // let the first request reach the stub before firing the second
        tokio::time::sleep(Duration::from_millis(100)).await;

        let fresh = lookup.by_code_postal("69001").await.unwrap();
        assert_eq!(fresh[0].nom, "Ville-69001");

        let stale = slow.await.unwrap();
        assert!(matches!(stale, Err(BackendError::Superseded)));
    }
}
