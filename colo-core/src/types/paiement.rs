//! Payment records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoyenPaiement {
    Carte,
    Cheque,
    Virement,
    Ancv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatutPaiement {
    EnAttente,
    Recu,
    Rembourse,
}

/// A payment received from a family, optionally tied to one inscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paiement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub famille_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inscription_id: Option<i64>,
    pub montant: Decimal,
    pub moyen: MoyenPaiement,
    pub statut: StatutPaiement,
    /// Reference from the payment provider (checkout session, intent, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_externe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Paiement {
    /// Build a payment from a provider amount expressed in cents.
    pub fn from_cents(famille_id: i64, cents: i64, moyen: MoyenPaiement) -> Self {
        Self {
            id: None,
            famille_id,
            inscription_id: None,
            montant: Decimal::new(cents, 2),
            moyen,
            statut: StatutPaiement::Recu,
            reference_externe: None,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let p = Paiement::from_cents(12, 48500, MoyenPaiement::Carte);
        assert_eq!(p.montant.to_string(), "485.00");
        assert_eq!(p.statut, StatutPaiement::Recu);
    }
}
