//! Backend error types
//!
//! Upstream failures keep the platform's error code when one is present so
//! callers can react to the handful of codes that matter: `42P01` (relation
//! does not exist) drives the capability backstop, `42703` (undefined
//! column) drives the audit retry, `PGRST116` means no rows matched.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream error ({status}): {message}")]
    Upstream {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Malformed upstream payload: {0}")]
    Malformed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A newer request replaced this one (city lookup only).
    #[error("Request superseded by a newer one")]
    Superseded,
}

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    fn code(&self) -> Option<&str> {
        match self {
            BackendError::Upstream { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            BackendError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `42P01 undefined_table` - the deployment lacks this relation.
    pub fn is_missing_relation(&self) -> bool {
        self.code() == Some("42P01")
    }

    /// `42703 undefined_column` - the schema lacks a column we tried to write.
    pub fn is_undefined_column(&self) -> bool {
        self.code() == Some("42703")
    }

    /// No rows matched a single-row lookup.
    pub fn is_no_rows(&self) -> bool {
        self.code() == Some("PGRST116")
    }

    /// The account (or row) already exists.
    pub fn is_conflict(&self) -> bool {
        if self.status() == Some(409) {
            return true;
        }
        matches!(
            self.code(),
            Some("23505") | Some("email_exists") | Some("user_already_exists")
        )
    }

    /// The identity provider rejected the stored refresh token.
    pub fn is_invalid_refresh(&self) -> bool {
        match self {
            BackendError::Upstream { code, message, .. } => {
                code.as_deref() == Some("invalid_grant")
                    || message.to_lowercase().contains("refresh token")
            }
            _ => false,
        }
    }

    /// Build an error from a non-success platform response.
    ///
    /// The platform speaks two error dialects: the row API sends
    /// `{code, message}`, the auth API sends `{error_code, msg}` or
    /// `{error, error_description}`. Both are folded into `Upstream`.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let parsed: Option<serde_json::Value> = serde_json::from_str(&body).ok();

        let code = parsed.as_ref().and_then(|v| {
            v.get("code")
                .and_then(code_to_string)
                .or_else(|| v.get("error_code").and_then(code_to_string))
        });
        let message = parsed
            .as_ref()
            .and_then(|v| {
                ["message", "msg", "error_description", "error"]
                    .iter()
                    .find_map(|key| v.get(*key).and_then(|m| m.as_str()))
            })
            .map(|s| s.to_string())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.clone()
                }
            });

        BackendError::Upstream {
            status,
            code,
            message,
        }
    }
}

fn code_to_string(value: &serde_json::Value) -> Option<String> {
    value
        .as_str()
        .map(|s| s.to_string())
        .or_else(|| value.as_i64().map(|n| n.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: u16, code: Option<&str>, message: &str) -> BackendError {
        BackendError::Upstream {
            status,
            code: code.map(|c| c.to_string()),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_code_classification() {
        assert!(upstream(404, Some("42P01"), "relation does not exist").is_missing_relation());
        assert!(upstream(400, Some("42703"), "column does not exist").is_undefined_column());
        assert!(upstream(406, Some("PGRST116"), "no rows").is_no_rows());
        assert!(!upstream(500, None, "boom").is_missing_relation());
    }

    #[test]
    fn test_conflict_detection() {
        assert!(upstream(409, None, "duplicate").is_conflict());
        assert!(upstream(422, Some("email_exists"), "User already registered").is_conflict());
        assert!(upstream(400, Some("23505"), "duplicate key").is_conflict());
        assert!(!upstream(422, None, "too short").is_conflict());
    }

    #[test]
    fn test_invalid_refresh_detection() {
        assert!(upstream(400, Some("invalid_grant"), "grant rejected").is_invalid_refresh());
        assert!(upstream(401, None, "Invalid Refresh Token: already used").is_invalid_refresh());
        assert!(!upstream(401, None, "expired access token").is_invalid_refresh());
    }
}
