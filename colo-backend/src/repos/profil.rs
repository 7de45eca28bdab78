//! Profile-mapping repository
//!
//! Implements the `ProfileMappings` seam over the `profils_auth` table,
//! translating upstream error codes into the resolver's error vocabulary.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use colo_core::error::MappingError;
use colo_core::identity::ProfileMappings;
use colo_core::types::MnemosId;

use crate::client::PlatformClient;
use crate::error::BackendError;

pub const PROFILS_AUTH_TABLE: &str = "profils_auth";

#[derive(Deserialize)]
struct ProfilRow {
    mnemos_id: i64,
}

pub struct ProfilAuthRepo {
    client: Arc<PlatformClient>,
}

impl ProfilAuthRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }
}

fn to_mapping_error(err: BackendError) -> MappingError {
    if err.is_missing_relation() {
        MappingError::MissingRelation(PROFILS_AUTH_TABLE.to_string())
    } else {
        MappingError::Store(err.to_string())
    }
}

#[async_trait]
impl ProfileMappings for ProfilAuthRepo {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<MnemosId>, MappingError> {
        match self
            .client
            .select_one::<ProfilRow>(
                PROFILS_AUTH_TABLE,
                &[("auth_id", external_id.to_string())],
            )
            .await
        {
            Ok(row) => Ok(row.map(|r| MnemosId(r.mnemos_id))),
            Err(err) if err.is_no_rows() => Ok(None),
            Err(err) => Err(to_mapping_error(err)),
        }
    }

    async fn upsert(&self, external_id: &str, id: MnemosId) -> Result<(), MappingError> {
        let row = serde_json::json!({
            "auth_id": external_id,
            "mnemos_id": id.value(),
        });
        self.client
            .upsert_row(PROFILS_AUTH_TABLE, "auth_id", &row)
            .await
            .map_err(to_mapping_error)
    }
}
