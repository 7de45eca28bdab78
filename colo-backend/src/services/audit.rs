//! Edit logger
//!
//! Best-effort audit journaling. The logger silently does nothing when no
//! principal is authenticated, when no mnemos id can be resolved, or when
//! the record id is not numeric. Append failures are kept as a local error
//! string and logged; they never reach the caller.

use std::sync::{Arc, Mutex};
use tracing::warn;

use colo_core::types::{parse_record_id, AuditAction, AuditEntry, Principal};

use crate::repos::AuditRepo;
use crate::Resolver;

pub struct EditLogger {
    repo: Arc<AuditRepo>,
    resolver: Arc<Resolver>,
    last_error: Mutex<Option<String>>,
}

impl EditLogger {
    pub fn new(repo: Arc<AuditRepo>, resolver: Arc<Resolver>) -> Self {
        Self {
            repo,
            resolver,
            last_error: Mutex::new(None),
        }
    }

    /// Append one audit row for a data-changing action. Never fails.
    pub async fn log(
        &self,
        principal: Option<&Principal>,
        action: AuditAction,
        table_name: &str,
        record_id: &str,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) {
        let Some(principal) = principal else {
            return;
        };
        let Some(record_id) = parse_record_id(record_id) else {
            return;
        };

        let user_id = match self.resolver.resolve(principal).await {
            Ok(id) => id,
            Err(err) => {
                self.remember("resolution", &err.to_string());
                return;
            }
        };

        let entry = AuditEntry::new(user_id, action, table_name, record_id, before, after);
        if let Err(err) = self.repo.append(&entry).await {
            self.remember("append", &err.to_string());
        }
    }

    /// The last journaling failure, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|g| g.clone())
    }

    fn remember(&self, stage: &str, message: &str) {
        warn!(stage, error = %message, "audit journaling failed");
        if let Ok(mut guard) = self.last_error.lock() {
            *guard = Some(message.to_string());
        }
    }
}
