//! Payment repository

use std::sync::Arc;

use colo_core::types::Paiement;

use crate::client::PlatformClient;
use crate::error::BackendResult;

pub const PAIEMENTS_TABLE: &str = "paiements";

pub struct PaiementRepo {
    client: Arc<PlatformClient>,
}

impl PaiementRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }

    pub async fn record(&self, paiement: &Paiement) -> BackendResult<Paiement> {
        self.client.insert(PAIEMENTS_TABLE, paiement).await
    }

    pub async fn list_by_famille(&self, famille_id: i64) -> BackendResult<Vec<Paiement>> {
        self.client
            .select(PAIEMENTS_TABLE, &[("famille_id", famille_id.to_string())])
            .await
    }
}
