//! Deployment capabilities
//!
//! Not every deployment carries the full schema: the profile-mapping table
//! and the legacy directory appeared at different points in the product's
//! life. Capabilities are established once at startup by a schema probe
//! (see `colo-backend::probe`) and may only be narrowed afterwards: a
//! missing-relation error observed at runtime switches the corresponding
//! capability off for the remainder of the process.

use std::sync::atomic::{AtomicBool, Ordering};

/// Typed capability set for the current deployment.
pub struct Capabilities {
    profile_mapping: AtomicBool,
    legacy_sync: AtomicBool,
}

impl Capabilities {
    /// Create a capability set from probe results.
    pub fn new(profile_mapping: bool, legacy_sync: bool) -> Self {
        Self {
            profile_mapping: AtomicBool::new(profile_mapping),
            legacy_sync: AtomicBool::new(legacy_sync),
        }
    }

    /// Capability set with everything enabled (tests, local development).
    pub fn all() -> Self {
        Self::new(true, true)
    }

    /// Whether the profile-mapping table can be queried.
    pub fn profile_mapping(&self) -> bool {
        self.profile_mapping.load(Ordering::SeqCst)
    }

    /// Whether missing legacy-directory rows may be created on demand.
    pub fn legacy_sync(&self) -> bool {
        self.legacy_sync.load(Ordering::SeqCst)
    }

    /// Switch the profile-mapping capability off for the rest of the process.
    pub fn disable_profile_mapping(&self) {
        self.profile_mapping.store(false, Ordering::SeqCst);
    }

    /// Switch the legacy-sync capability off for the rest of the process.
    pub fn disable_legacy_sync(&self) {
        self.legacy_sync.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("profile_mapping", &self.profile_mapping())
            .field("legacy_sync", &self.legacy_sync())
            .finish()
    }
}
