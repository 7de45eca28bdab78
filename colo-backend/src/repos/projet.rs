//! Project repository

use std::sync::Arc;

use colo_core::types::{MnemosId, Projet};

use crate::client::PlatformClient;
use crate::error::BackendResult;

pub const PROJETS_TABLE: &str = "projets";

pub struct ProjetRepo {
    client: Arc<PlatformClient>,
}

impl ProjetRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        owner_id: MnemosId,
        titre: String,
        description: Option<String>,
        assets: Vec<String>,
        metadata: Option<serde_json::Value>,
    ) -> BackendResult<Projet> {
        let projet = Projet {
            id: None,
            owner_id,
            titre,
            description,
            assets,
            metadata,
            created_at: None,
            updated_at: None,
        };
        self.client.insert(PROJETS_TABLE, &projet).await
    }

    pub async fn get(&self, id: i64) -> BackendResult<Option<Projet>> {
        self.client
            .select_one(PROJETS_TABLE, &[("id", id.to_string())])
            .await
    }

    pub async fn delete(&self, id: i64) -> BackendResult<()> {
        self.client.delete_by_id(PROJETS_TABLE, id).await
    }
}
