//! Project records (pedagogical projects with stored assets)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::MnemosId;

/// A project owned by a principal, with files in the asset bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Mnemos id of the owner
    pub owner_id: MnemosId,
    pub titre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Paths of stored files belonging to this project
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
