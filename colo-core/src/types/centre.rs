//! Centres and séjours (camp sites and stays)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A camp site operated by the organisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Centre {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_postal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    pub capacite: i32,
}

/// A dated stay at a centre, open to an age bracket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sejour {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub centre_id: i64,
    pub libelle: String,
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    pub age_min: i32,
    pub age_max: i32,
    pub prix: Decimal,
    pub places: i32,
}

impl Sejour {
    /// Whether a child of the given age fits the stay's bracket.
    pub fn accepts_age(&self, age: i32) -> bool {
        age >= self.age_min && age <= self.age_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_age() {
        let sejour = Sejour {
            id: Some(1),
            centre_id: 1,
            libelle: "Été 2026 - 1ère quinzaine".to_string(),
            date_debut: NaiveDate::from_ymd_opt(2026, 7, 6).unwrap(),
            date_fin: NaiveDate::from_ymd_opt(2026, 7, 18).unwrap(),
            age_min: 6,
            age_max: 11,
            prix: Decimal::new(48500, 2),
            places: 48,
        };
        assert!(sejour.accepts_age(6));
        assert!(sejour.accepts_age(11));
        assert!(!sejour.accepts_age(5));
        assert!(!sejour.accepts_age(12));
    }
}
