//! Legacy directory repository
//!
//! The `mnemos_utilisateurs` table predates the hosted identity provider;
//! it is keyed by email and its generated ids are the mnemos ids the rest
//! of the schema references.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use colo_core::error::MappingError;
use colo_core::identity::LegacyDirectory;
use colo_core::types::MnemosId;

use crate::client::PlatformClient;
use crate::error::BackendError;

pub const MNEMOS_TABLE: &str = "mnemos_utilisateurs";

#[derive(Deserialize)]
struct MnemosRow {
    id: i64,
}

pub struct MnemosRepo {
    client: Arc<PlatformClient>,
}

impl MnemosRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }
}

fn to_mapping_error(err: BackendError) -> MappingError {
    if err.is_missing_relation() {
        MappingError::MissingRelation(MNEMOS_TABLE.to_string())
    } else {
        MappingError::Store(err.to_string())
    }
}

#[async_trait]
impl LegacyDirectory for MnemosRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<MnemosId>, MappingError> {
        match self
            .client
            .select_one::<MnemosRow>(MNEMOS_TABLE, &[("email", email.to_string())])
            .await
        {
            Ok(row) => Ok(row.map(|r| MnemosId(r.id))),
            Err(err) if err.is_no_rows() => Ok(None),
            Err(err) => Err(to_mapping_error(err)),
        }
    }

    async fn create(&self, email: &str) -> Result<MnemosId, MappingError> {
        let row = serde_json::json!({ "email": email });
        let created: MnemosRow = self
            .client
            .insert(MNEMOS_TABLE, &row)
            .await
            .map_err(to_mapping_error)?;
        Ok(MnemosId(created.id))
    }
}
