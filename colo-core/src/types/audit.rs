//! Audit journal types
//!
//! Every data-changing action is traced to a `journal_modifications` row.
//! The journal is append-only and strictly best-effort: a failed append is
//! logged and forgotten, never surfaced to the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::MnemosId;

/// Kind of data-changing action being journaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit journal row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Mnemos id of the actor
    pub user_id: MnemosId,
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: i64,
    /// Snapshot before the change, when the action had a previous state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,
    /// Snapshot after the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        user_id: MnemosId,
        action: AuditAction,
        table_name: impl Into<String>,
        record_id: i64,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> Self {
        Self {
            user_id,
            action,
            table_name: table_name.into(),
            record_id,
            before,
            after,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serde() {
        let json = serde_json::to_string(&AuditAction::Update).unwrap();
        assert_eq!(json, "\"update\"");
    }

    #[test]
    fn test_snapshots_are_omitted_when_absent() {
        let entry = AuditEntry::new(MnemosId(1), AuditAction::Delete, "familles", 3, None, None);
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("before").is_none());
        assert!(value.get("after").is_none());
        assert_eq!(value["table_name"], "familles");
    }
}
