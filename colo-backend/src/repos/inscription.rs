//! Inscription, transport and staff repositories

use std::sync::Arc;

use colo_core::types::{Animateur, Inscription, StatutInscription, Transport};

use crate::client::PlatformClient;
use crate::error::BackendResult;

pub const INSCRIPTIONS_TABLE: &str = "inscriptions";
pub const TRANSPORTS_TABLE: &str = "transports";
pub const ANIMATEURS_TABLE: &str = "animateurs";

pub struct InscriptionRepo {
    client: Arc<PlatformClient>,
}

impl InscriptionRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }

    pub async fn create(&self, inscription: &Inscription) -> BackendResult<Inscription> {
        self.client.insert(INSCRIPTIONS_TABLE, inscription).await
    }

    pub async fn get(&self, id: i64) -> BackendResult<Option<Inscription>> {
        self.client
            .select_one(INSCRIPTIONS_TABLE, &[("id", id.to_string())])
            .await
    }

    pub async fn list_by_sejour(&self, sejour_id: i64) -> BackendResult<Vec<Inscription>> {
        self.client
            .select(INSCRIPTIONS_TABLE, &[("sejour_id", sejour_id.to_string())])
            .await
    }

    pub async fn set_statut(
        &self,
        id: i64,
        statut: StatutInscription,
    ) -> BackendResult<Inscription> {
        let patch = serde_json::json!({ "statut": statut.as_str() });
        self.client.update(INSCRIPTIONS_TABLE, id, &patch).await
    }
}

pub struct TransportRepo {
    client: Arc<PlatformClient>,
}

impl TransportRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }

    pub async fn list_by_sejour(&self, sejour_id: i64) -> BackendResult<Vec<Transport>> {
        self.client
            .select(TRANSPORTS_TABLE, &[("sejour_id", sejour_id.to_string())])
            .await
    }

    pub async fn create(&self, transport: &Transport) -> BackendResult<Transport> {
        self.client.insert(TRANSPORTS_TABLE, transport).await
    }
}

pub struct AnimateurRepo {
    client: Arc<PlatformClient>,
}

impl AnimateurRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, sejour_id: Option<i64>) -> BackendResult<Vec<Animateur>> {
        match sejour_id {
            Some(id) => {
                self.client
                    .select(ANIMATEURS_TABLE, &[("sejour_id", id.to_string())])
                    .await
            }
            None => self.client.select(ANIMATEURS_TABLE, &[]).await,
        }
    }

    pub async fn create(&self, animateur: &Animateur) -> BackendResult<Animateur> {
        self.client.insert(ANIMATEURS_TABLE, animateur).await
    }

    /// Assign (or unassign) a staff member to a stay.
    pub async fn assign(&self, id: i64, sejour_id: Option<i64>) -> BackendResult<Animateur> {
        let patch = serde_json::json!({ "sejour_id": sejour_id });
        self.client.update(ANIMATEURS_TABLE, id, &patch).await
    }
}
