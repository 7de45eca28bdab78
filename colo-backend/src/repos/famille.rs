//! Family repository
//!
//! Nested saves (famille → adultes → enfants → fiches) are independent
//! sequential writes with no compensating rollback: a failure partway
//! through leaves the earlier rows in place and surfaces the error to the
//! caller.

use serde::Serialize;
use std::sync::Arc;

use colo_core::types::{Adulte, Enfant, Famille, FicheSanitaire};

use crate::client::PlatformClient;
use crate::error::{BackendError, BackendResult};

pub const FAMILLES_TABLE: &str = "familles";
pub const ADULTES_TABLE: &str = "adultes";
pub const ENFANTS_TABLE: &str = "enfants";
pub const FICHES_TABLE: &str = "fiches_sanitaires";

/// A child together with its health profile.
#[derive(Debug, Clone, Serialize)]
pub struct EnfantComplet {
    #[serde(flatten)]
    pub enfant: Enfant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiche_sanitaire: Option<FicheSanitaire>,
}

/// A family with its nested records.
#[derive(Debug, Clone, Serialize)]
pub struct FamilleComplete {
    #[serde(flatten)]
    pub famille: Famille,
    pub adultes: Vec<Adulte>,
    pub enfants: Vec<EnfantComplet>,
}

pub struct FamilleRepo {
    client: Arc<PlatformClient>,
}

impl FamilleRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }

    fn id_of(famille: &Famille) -> BackendResult<i64> {
        famille.id.ok_or_else(|| {
            BackendError::Malformed("stored famille row has no id".to_string())
        })
    }

    /// Create a family and its nested records, sequentially.
    pub async fn create_with_nested(
        &self,
        famille: &Famille,
        adultes: &[Adulte],
        enfants: &[(Enfant, Option<FicheSanitaire>)],
    ) -> BackendResult<FamilleComplete> {
        let created: Famille = self.client.insert(FAMILLES_TABLE, famille).await?;
        let famille_id = Self::id_of(&created)?;

        let mut stored_adultes = Vec::with_capacity(adultes.len());
        for adulte in adultes {
            let mut row = adulte.clone();
            row.famille_id = Some(famille_id);
            let stored: Adulte = self.client.insert(ADULTES_TABLE, &row).await?;
            stored_adultes.push(stored);
        }

        let mut stored_enfants = Vec::with_capacity(enfants.len());
        for (enfant, fiche) in enfants {
            let mut row = enfant.clone();
            row.famille_id = Some(famille_id);
            let stored: Enfant = self.client.insert(ENFANTS_TABLE, &row).await?;

            let stored_fiche = match (fiche, stored.id) {
                (Some(fiche), Some(enfant_id)) => {
                    let mut fiche_row = fiche.clone();
                    fiche_row.enfant_id = Some(enfant_id);
                    Some(self.client.insert(FICHES_TABLE, &fiche_row).await?)
                }
                _ => None,
            };
            stored_enfants.push(EnfantComplet {
                enfant: stored,
                fiche_sanitaire: stored_fiche,
            });
        }

        Ok(FamilleComplete {
            famille: created,
            adultes: stored_adultes,
            enfants: stored_enfants,
        })
    }

    pub async fn list(&self) -> BackendResult<Vec<Famille>> {
        self.client.select(FAMILLES_TABLE, &[]).await
    }

    pub async fn get(&self, id: i64) -> BackendResult<Option<Famille>> {
        self.client
            .select_one(FAMILLES_TABLE, &[("id", id.to_string())])
            .await
    }

    /// Fetch a family with its nested records.
    pub async fn get_complete(&self, id: i64) -> BackendResult<Option<FamilleComplete>> {
        let Some(famille) = self.get(id).await? else {
            return Ok(None);
        };

        let adultes: Vec<Adulte> = self
            .client
            .select(ADULTES_TABLE, &[("famille_id", id.to_string())])
            .await?;
        let enfants: Vec<Enfant> = self
            .client
            .select(ENFANTS_TABLE, &[("famille_id", id.to_string())])
            .await?;

        let mut complets = Vec::with_capacity(enfants.len());
        for enfant in enfants {
            let fiche = match enfant.id {
                Some(enfant_id) => {
                    self.client
                        .select_one(FICHES_TABLE, &[("enfant_id", enfant_id.to_string())])
                        .await?
                }
                None => None,
            };
            complets.push(EnfantComplet {
                enfant,
                fiche_sanitaire: fiche,
            });
        }

        Ok(Some(FamilleComplete {
            famille,
            adultes,
            enfants: complets,
        }))
    }

    pub async fn update(&self, id: i64, patch: &Famille) -> BackendResult<Famille> {
        self.client.update(FAMILLES_TABLE, id, patch).await
    }

    pub async fn delete(&self, id: i64) -> BackendResult<()> {
        self.client.delete_by_id(FAMILLES_TABLE, id).await
    }
}
