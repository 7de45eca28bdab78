//! Inscriptions, transports and staff

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inscription lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatutInscription {
    EnAttente,
    Confirmee,
    Annulee,
}

impl StatutInscription {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnAttente => "en_attente",
            Self::Confirmee => "confirmee",
            Self::Annulee => "annulee",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "en_attente" => Some(Self::EnAttente),
            "confirmee" => Some(Self::Confirmee),
            "annulee" => Some(Self::Annulee),
            _ => None,
        }
    }
}

/// A child enrolled on a stay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inscription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub enfant_id: i64,
    pub sejour_id: i64,
    pub statut: StatutInscription,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_aller_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_retour_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTransport {
    Car,
    Train,
    SurPlace,
}

/// A convoy attached to a stay (outbound or return leg).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub sejour_id: i64,
    pub libelle: String,
    pub type_transport: TypeTransport,
    /// Departure point (free text, e.g. "Gare de Lyon")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depart: Option<String>,
    pub places: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleAnimateur {
    Directeur,
    Animateur,
    AssistantSanitaire,
}

/// Staff member, optionally assigned to a stay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animateur {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nom: String,
    pub prenom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: RoleAnimateur,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sejour_id: Option<i64>,
}
