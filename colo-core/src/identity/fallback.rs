//! Deterministic fallback identifier
//!
//! When neither the profile mapping nor the legacy directory can produce a
//! mnemos id, one is derived from the external identity id itself: the last
//! eight hex characters, read as a base-16 integer. The result is a pure
//! function of the id, so a principal keeps the same fallback value across
//! the whole process (and across processes).

use crate::types::MnemosId;

/// Number of trailing characters of the external id that feed the fallback.
const TAIL_LEN: usize = 8;

/// Compute the fallback mnemos id for an external identity id.
///
/// A tail that does not parse as hex (or an id shorter than eight
/// characters that does not parse either) yields zero rather than an error.
pub fn fallback_id(external_id: &str) -> MnemosId {
    let chars: Vec<char> = external_id.chars().collect();
    let start = chars.len().saturating_sub(TAIL_LEN);
    let tail: String = chars[start..].iter().collect();
    let value = u32::from_str_radix(&tail, 16).unwrap_or(0);
    MnemosId(i64::from(value))
}
