//! Family records: the household, its adults, children and health profiles

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A household enrolled with the organisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Famille {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_postal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Quotient familial (CAF), used for pricing tiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotient_familial: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Role of an adult within the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleAdulte {
    ResponsableLegal,
    Parent,
    ContactUrgence,
}

impl RoleAdulte {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResponsableLegal => "responsable_legal",
            Self::Parent => "parent",
            Self::ContactUrgence => "contact_urgence",
        }
    }
}

/// An adult attached to a family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adulte {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub famille_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub civilite: Option<String>,
    pub nom: String,
    pub prenom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: RoleAdulte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sexe {
    Fille,
    Garcon,
}

/// A child attached to a family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enfant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub famille_id: Option<i64>,
    pub nom: String,
    pub prenom: String,
    pub date_naissance: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexe: Option<Sexe>,
}

impl Enfant {
    /// Age in whole years at the given date.
    pub fn age_at(&self, date: NaiveDate) -> i32 {
        let mut age = date.years_since(self.date_naissance).unwrap_or(0) as i32;
        if self.date_naissance > date {
            age = 0;
        }
        age
    }
}

/// Health profile, one per child.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FicheSanitaire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enfant_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traitements: Option<String>,
    pub vaccinations_a_jour: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medecin_traitant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarques: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enfant(date_naissance: NaiveDate) -> Enfant {
        Enfant {
            id: None,
            famille_id: None,
            nom: "Durand".to_string(),
            prenom: "Léa".to_string(),
            date_naissance,
            sexe: Some(Sexe::Fille),
        }
    }

    #[test]
    fn test_age_at() {
        let e = enfant(NaiveDate::from_ymd_opt(2015, 7, 10).unwrap());
        let day = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        assert_eq!(e.age_at(day), 9);
        let before_birthday = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        assert_eq!(e.age_at(before_birthday), 8);
    }

    #[test]
    fn test_unset_id_is_not_serialized() {
        let e = enfant(NaiveDate::from_ymd_opt(2016, 1, 2).unwrap());
        let value = serde_json::to_value(&e).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["sexe"], "fille");
    }
}
