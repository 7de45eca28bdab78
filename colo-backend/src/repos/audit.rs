//! Audit journal repository

use std::sync::Arc;

use colo_core::types::AuditEntry;

use crate::client::PlatformClient;
use crate::error::BackendResult;

pub const JOURNAL_TABLE: &str = "journal_modifications";

pub struct AuditRepo {
    client: Arc<PlatformClient>,
}

impl AuditRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }

    /// Append one journal row.
    ///
    /// Older deployments lack the snapshot columns; an undefined-column
    /// error triggers exactly one retry with `before`/`after` dropped.
    pub async fn append(&self, entry: &AuditEntry) -> BackendResult<()> {
        let full = serde_json::to_value(entry)?;
        match self.client.insert_row(JOURNAL_TABLE, &full).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_undefined_column() => {
                let mut reduced = full;
                if let Some(map) = reduced.as_object_mut() {
                    map.remove("before");
                    map.remove("after");
                }
                self.client.insert_row(JOURNAL_TABLE, &reduced).await
            }
            Err(err) => Err(err),
        }
    }
}
