//! Identity resolution
//!
//! Maps an authenticated principal to its mnemos id through an explicit,
//! ordered strategy list:
//!
//! 1. `ProfileMapping` - the `profils_auth` table, keyed by external id
//! 2. `LegacyDirectory` - the `mnemos_utilisateurs` table, keyed by email,
//!    with on-demand row creation when the legacy-sync capability is on
//! 3. `HashFallback` - a pure function of the external id
//!
//! The three branches are not guaranteed to agree with each other across
//! environments; the order above decides which one wins. A missing-relation
//! error on the profile mapping disables that strategy for the remainder of
//! the process (the startup probe normally catches this first).
//!
//! The resolver caches one mapping, scoped to the current principal: a
//! sign-out/sign-in to a different account misses the cache and re-resolves.

mod fallback;

pub use fallback::fallback_id;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::capabilities::Capabilities;
use crate::error::{MappingError, ResolveError, ResolveResult};
use crate::types::{MnemosId, Principal};

/// Resolution strategies, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ProfileMapping,
    LegacyDirectory,
    HashFallback,
}

/// The fixed evaluation order.
pub const STRATEGY_ORDER: [Strategy; 3] = [
    Strategy::ProfileMapping,
    Strategy::LegacyDirectory,
    Strategy::HashFallback,
];

/// Store of external-id → mnemos-id mappings (the `profils_auth` table).
#[async_trait]
pub trait ProfileMappings: Send + Sync {
    async fn find_by_external_id(&self, external_id: &str)
        -> Result<Option<MnemosId>, MappingError>;

    async fn upsert(&self, external_id: &str, id: MnemosId) -> Result<(), MappingError>;
}

/// The legacy person directory (the `mnemos_utilisateurs` table).
#[async_trait]
pub trait LegacyDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<MnemosId>, MappingError>;

    /// Create a directory row for the email and return its generated id.
    async fn create(&self, email: &str) -> Result<MnemosId, MappingError>;
}

struct CacheSlot {
    external_id: String,
    id: MnemosId,
}

/// Resolves principals to mnemos ids.
pub struct IdentityResolver<P, L> {
    profiles: Arc<P>,
    legacy: Arc<L>,
    capabilities: Arc<Capabilities>,
    cache: Mutex<Option<CacheSlot>>,
}

impl<P, L> IdentityResolver<P, L>
where
    P: ProfileMappings,
    L: LegacyDirectory,
{
    pub fn new(profiles: Arc<P>, legacy: Arc<L>, capabilities: Arc<Capabilities>) -> Self {
        Self {
            profiles,
            legacy,
            capabilities,
            cache: Mutex::new(None),
        }
    }

    /// Resolve the mnemos id for a principal.
    pub async fn resolve(&self, principal: &Principal) -> ResolveResult<MnemosId> {
        let mut cache = self.cache.lock().await;
        if let Some(slot) = cache.as_ref() {
            if slot.external_id == principal.id {
                return Ok(slot.id);
            }
        }

        let mut resolved: Option<(Strategy, MnemosId)> = None;
        for strategy in STRATEGY_ORDER {
            if let Some(id) = self.evaluate(strategy, principal).await? {
                resolved = Some((strategy, id));
                break;
            }
        }
        // the fallback strategy always produces a value
        let (source, id) =
            resolved.unwrap_or((Strategy::HashFallback, fallback_id(&principal.id)));

        debug!(
            external_id = %principal.id,
            mnemos_id = %id,
            source = ?source,
            "principal resolved"
        );

        if source != Strategy::ProfileMapping && self.capabilities.profile_mapping() {
            self.record_mapping(&principal.id, id).await?;
        }

        *cache = Some(CacheSlot {
            external_id: principal.id.clone(),
            id,
        });
        Ok(id)
    }

    /// Drop the cached mapping (sign-out).
    pub async fn reset(&self) {
        *self.cache.lock().await = None;
    }

    async fn evaluate(
        &self,
        strategy: Strategy,
        principal: &Principal,
    ) -> ResolveResult<Option<MnemosId>> {
        match strategy {
            Strategy::ProfileMapping => {
                if !self.capabilities.profile_mapping() {
                    return Ok(None);
                }
                match self.profiles.find_by_external_id(&principal.id).await {
                    Ok(found) => Ok(found),
                    Err(MappingError::MissingRelation(table)) => {
                        warn!(table = %table, "profile mapping relation missing, disabling");
                        self.capabilities.disable_profile_mapping();
                        Ok(None)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Strategy::LegacyDirectory => {
                let Some(email) = principal.email.as_deref() else {
                    return Ok(None);
                };
                match self.legacy.find_by_email(email).await {
                    Ok(Some(id)) => Ok(Some(id)),
                    Ok(None) => {
                        if !self.capabilities.legacy_sync() {
                            return Ok(None);
                        }
                        let id = self.legacy.create(email).await.map_err(ResolveError::from)?;
                        Ok(Some(id))
                    }
                    Err(MappingError::MissingRelation(table)) => {
                        warn!(table = %table, "legacy directory relation missing, skipping");
                        self.capabilities.disable_legacy_sync();
                        Ok(None)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Strategy::HashFallback => Ok(Some(fallback_id(&principal.id))),
        }
    }

    /// Best-effort write-back of a mapping discovered outside the profile
    /// table. A missing relation disables the capability; anything else is
    /// a real store failure and raises.
    async fn record_mapping(&self, external_id: &str, id: MnemosId) -> ResolveResult<()> {
        match self.profiles.upsert(external_id, id).await {
            Ok(()) => Ok(()),
            Err(MappingError::MissingRelation(table)) => {
                warn!(table = %table, "profile mapping relation missing on upsert, disabling");
                self.capabilities.disable_profile_mapping();
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex as AsyncMutex;

    #[derive(Default)]
    struct FakeProfiles {
        mapping: AsyncMutex<Option<(String, MnemosId)>>,
        lookups: AtomicUsize,
        upserts: AtomicUsize,
        missing: bool,
        fail_lookup: bool,
        fail_upsert: bool,
    }

    #[async_trait]
    impl ProfileMappings for FakeProfiles {
        async fn find_by_external_id(
            &self,
            external_id: &str,
        ) -> Result<Option<MnemosId>, MappingError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.missing {
                return Err(MappingError::MissingRelation("profils_auth".to_string()));
            }
            if self.fail_lookup {
                return Err(MappingError::Store("boom".to_string()));
            }
            let guard = self.mapping.lock().await;
            Ok(guard
                .as_ref()
                .filter(|(ext, _)| ext == external_id)
                .map(|(_, id)| *id))
        }

        async fn upsert(&self, external_id: &str, id: MnemosId) -> Result<(), MappingError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            if self.missing {
                return Err(MappingError::MissingRelation("profils_auth".to_string()));
            }
            if self.fail_upsert {
                return Err(MappingError::Store("boom".to_string()));
            }
            *self.mapping.lock().await = Some((external_id.to_string(), id));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeDirectory {
        by_email: AsyncMutex<Vec<(String, MnemosId)>>,
        creations: AtomicUsize,
    }

    #[async_trait]
    impl LegacyDirectory for FakeDirectory {
        async fn find_by_email(&self, email: &str) -> Result<Option<MnemosId>, MappingError> {
            let guard = self.by_email.lock().await;
            Ok(guard
                .iter()
                .find(|(e, _)| e == email)
                .map(|(_, id)| *id))
        }

        async fn create(&self, email: &str) -> Result<MnemosId, MappingError> {
            self.creations.fetch_add(1, Ordering::SeqCst);
            let mut guard = self.by_email.lock().await;
            let id = MnemosId(1000 + guard.len() as i64);
            guard.push((email.to_string(), id));
            Ok(id)
        }
    }

    fn resolver(
        profiles: FakeProfiles,
        legacy: FakeDirectory,
        caps: Capabilities,
    ) -> IdentityResolver<FakeProfiles, FakeDirectory> {
        IdentityResolver::new(Arc::new(profiles), Arc::new(legacy), Arc::new(caps))
    }

    fn principal(id: &str, email: Option<&str>) -> Principal {
        Principal::new(id, email.map(|e| e.to_string()))
    }

    #[tokio::test]
    async fn test_profile_mapping_wins() {
        let profiles = FakeProfiles::default();
        *profiles.mapping.lock().await = Some(("ext-1".to_string(), MnemosId(7)));
        let r = resolver(profiles, FakeDirectory::default(), Capabilities::all());

        let id = r.resolve(&principal("ext-1", Some("a@b.fr"))).await.unwrap();
        assert_eq!(id, MnemosId(7));
    }

    #[tokio::test]
    async fn test_missing_relation_disables_lookup_for_good() {
        let profiles = FakeProfiles {
            missing: true,
            ..Default::default()
        };
        let r = resolver(profiles, FakeDirectory::default(), Capabilities::all());

        let p = principal("a1b2c3d4-0000-0000-0000-00000000ffab", None);
        let id = r.resolve(&p).await.unwrap();
        assert_eq!(id, MnemosId(65451));
        assert_eq!(r.profiles.lookups.load(Ordering::SeqCst), 1);

        // second resolve for a different principal: the profile table is
        // never touched again
        r.reset().await;
        let _ = r.resolve(&principal("other", None)).await.unwrap();
        assert_eq!(r.profiles.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(r.profiles.upserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_other_lookup_error_raises() {
        let profiles = FakeProfiles {
            fail_lookup: true,
            ..Default::default()
        };
        let r = resolver(profiles, FakeDirectory::default(), Capabilities::all());

        let result = r.resolve(&principal("ext-9", None)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_legacy_directory_by_email() {
        let legacy = FakeDirectory::default();
        legacy
            .by_email
            .lock()
            .await
            .push(("famille@exemple.fr".to_string(), MnemosId(321)));
        let r = resolver(FakeProfiles::default(), legacy, Capabilities::all());

        let id = r
            .resolve(&principal("ext-2", Some("famille@exemple.fr")))
            .await
            .unwrap();
        assert_eq!(id, MnemosId(321));
        // discovered mapping is written back to the profile table
        assert_eq!(r.profiles.upserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_legacy_creation_when_sync_enabled() {
        let r = resolver(
            FakeProfiles::default(),
            FakeDirectory::default(),
            Capabilities::all(),
        );

        let id = r
            .resolve(&principal("ext-3", Some("nouveau@exemple.fr")))
            .await
            .unwrap();
        assert_eq!(id, MnemosId(1000));
        assert_eq!(r.legacy.creations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_legacy_creation_when_sync_disabled() {
        let r = resolver(
            FakeProfiles::default(),
            FakeDirectory::default(),
            Capabilities::new(true, false),
        );

        let p = principal("a1b2c3d4-0000-0000-0000-00000000ffab", Some("x@y.fr"));
        let id = r.resolve(&p).await.unwrap();
        assert_eq!(id, MnemosId(65451));
        assert_eq!(r.legacy.creations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_is_scoped_to_principal() {
        let r = resolver(
            FakeProfiles::default(),
            FakeDirectory::default(),
            Capabilities::new(false, false),
        );

        let first = r.resolve(&principal("0000ffab", None)).await.unwrap();
        assert_eq!(first, MnemosId(65451));

        // a different principal must not see the cached value
        let second = r.resolve(&principal("000000ff", None)).await.unwrap();
        assert_eq!(second, MnemosId(255));
    }

    #[tokio::test]
    async fn test_cached_value_skips_stores() {
        let profiles = FakeProfiles::default();
        *profiles.mapping.lock().await = Some(("ext-1".to_string(), MnemosId(7)));
        let r = resolver(profiles, FakeDirectory::default(), Capabilities::all());

        let p = principal("ext-1", None);
        let _ = r.resolve(&p).await.unwrap();
        let _ = r.resolve(&p).await.unwrap();
        assert_eq!(r.profiles.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upsert_failure_raises() {
        let profiles = FakeProfiles {
            fail_upsert: true,
            ..Default::default()
        };
        let r = resolver(profiles, FakeDirectory::default(), Capabilities::all());

        let result = r.resolve(&principal("ext-4", None)).await;
        assert!(result.is_err());
    }
}
