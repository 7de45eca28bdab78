//! Payment webhook
//!
//! Verifies the provider's signature header (`t=...,v1=...`, HMAC-SHA256
//! over `"{t}.{body}"` with the shared secret) before dispatching on the
//! event type. Once the signature checks out the endpoint always
//! acknowledges receipt; event handling itself is best-effort.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use tracing::{debug, warn};

use colo_core::types::{MoyenPaiement, Paiement};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Parsed signature header: timestamp plus the v1 signature candidates.
pub struct ParsedSignature {
    pub timestamp: i64,
    pub signatures: Vec<String>,
}

/// Parse a `t=...,v1=...` signature header.
pub fn parse_signature_header(header: &str) -> Option<ParsedSignature> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(value)) => timestamp = value.parse().ok(),
            (Some("v1"), Some(value)) => signatures.push(value.to_string()),
            _ => {}
        }
    }
    Some(ParsedSignature {
        timestamp: timestamp?,
        signatures,
    })
}

/// Verify a webhook payload against its signature header.
pub fn verify_signature(
    secret: &str,
    payload: &[u8],
    header: &str,
    tolerance_secs: i64,
    now: i64,
) -> bool {
    let Some(parsed) = parse_signature_header(header) else {
        return false;
    };
    if parsed.signatures.is_empty() {
        return false;
    }
    if tolerance_secs > 0 && (now - parsed.timestamp).abs() > tolerance_secs {
        return false;
    }

    for candidate in &parsed.signatures {
        let Ok(candidate_bytes) = hex::decode(candidate) else {
            continue;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(parsed.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        if mac.verify_slice(&candidate_bytes).is_ok() {
            return true;
        }
    }
    false
}

/// Compute the signature header for a payload (tests, local tooling).
pub fn sign_payload(secret: &str, payload: &[u8], timestamp: i64) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

/// Receive a payment provider event.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("En-tête de signature manquant".to_string()))?;

    let verified = verify_signature(
        &state.config.webhook_secret,
        &body,
        header,
        state.config.webhook_tolerance_secs,
        Utc::now().timestamp(),
    );
    if !verified {
        return Err(ApiError::BadRequest("Signature invalide".to_string()));
    }

    let event: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Charge utile illisible".to_string()))?;
    let event_type = event["type"].as_str().unwrap_or("");

    match event_type {
        "checkout.session.completed" => record_checkout(&state, &event).await,
        other => {
            debug!(event_type = other, "unhandled webhook event");
        }
    }

    Ok(Json(json!({ "received": true })))
}

fn metadata_id(object: &Value, key: &str) -> Option<i64> {
    let value = &object["metadata"][key];
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// Record a completed checkout as a received payment. Best-effort: a
/// failure is logged and the acknowledgement still goes out.
async fn record_checkout(state: &AppState, event: &Value) {
    let object = &event["data"]["object"];
    let Some(famille_id) = metadata_id(object, "famille_id") else {
        warn!("checkout event without famille_id metadata");
        return;
    };

    let cents = object["amount_total"].as_i64().unwrap_or(0);
    let mut paiement = Paiement::from_cents(famille_id, cents, MoyenPaiement::Carte);
    paiement.inscription_id = metadata_id(object, "inscription_id");
    paiement.reference_externe = object["payment_intent"]
        .as_str()
        .or_else(|| object["id"].as_str())
        .map(|s| s.to_string());

    if let Err(err) = state.paiements.record(&paiement).await {
        warn!(error = %err, famille_id, "payment recording failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    #[test]
    fn test_signature_roundtrip() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = 1_700_000_000;
        let header = sign_payload(SECRET, payload, now);
        assert!(verify_signature(SECRET, payload, &header, 300, now + 10));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = 1_700_000_000;
        let header = sign_payload(SECRET, payload, now);
        assert!(!verify_signature(SECRET, b"autre chose", &header, 300, now));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let payload = b"{}";
        let now = 1_700_000_000;
        let header = sign_payload("autre_secret", payload, now);
        assert!(!verify_signature(SECRET, payload, &header, 300, now));
    }

    #[test]
    fn test_stale_timestamp_is_rejected() {
        let payload = b"{}";
        let then = 1_700_000_000;
        let header = sign_payload(SECRET, payload, then);
        assert!(!verify_signature(SECRET, payload, &header, 300, then + 301));
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        assert!(!verify_signature(SECRET, b"{}", "n-importe-quoi", 300, 0));
        assert!(!verify_signature(SECRET, b"{}", "t=12,v2=abcd", 300, 12));
    }
}
