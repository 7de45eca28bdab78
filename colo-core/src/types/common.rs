//! Common identifier types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Legacy numeric identifier attributing records and audit rows to a person.
///
/// The value comes from the mnemos directory when the deployment has one,
/// from the profile-mapping table when that exists, or from the
/// deterministic fallback otherwise. It is stored as `i64` because the
/// legacy directory uses 64-bit keys, but resolved values are always
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MnemosId(pub i64);

impl MnemosId {
    /// Get the raw value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MnemosId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MnemosId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Parse a record identifier received as a string.
///
/// Audit logging only accepts numeric record ids; anything else makes the
/// logger a no-op.
pub fn parse_record_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id("42"), Some(42));
        assert_eq!(parse_record_id(" 7 "), Some(7));
        assert_eq!(parse_record_id("abc"), None);
        assert_eq!(parse_record_id(""), None);
        assert_eq!(parse_record_id("12.5"), None);
    }

    #[test]
    fn test_mnemos_id_serde_is_transparent() {
        let id = MnemosId(65451);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "65451");
        let back: MnemosId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
