//! Application state for the API server
//!
//! Everything the handlers need is constructed here once and passed down:
//! client, repositories, resolver, edit logger, capability set. No
//! module-level singletons.

use std::sync::Arc;

use colo_backend::{
    probe_capabilities, AnimateurRepo, AuditRepo, CentreRepo, EditLogger, FamilleRepo,
    InscriptionRepo, MnemosRepo, PaiementRepo, PlatformAuth, PlatformClient, ProfilAuthRepo,
    ProjetRepo, Resolver, SejourRepo, SessionBootstrapper, TransportRepo, VilleLookup,
};
use colo_core::Capabilities;

/// API server state
#[derive(Clone)]
pub struct AppState {
    pub platform: Arc<PlatformClient>,
    pub capabilities: Arc<Capabilities>,
    pub resolver: Arc<Resolver>,
    pub edit_logger: Arc<EditLogger>,
    pub familles: Arc<FamilleRepo>,
    pub centres: Arc<CentreRepo>,
    pub sejours: Arc<SejourRepo>,
    pub inscriptions: Arc<InscriptionRepo>,
    pub transports: Arc<TransportRepo>,
    pub animateurs: Arc<AnimateurRepo>,
    pub paiements: Arc<PaiementRepo>,
    pub projets: Arc<ProjetRepo>,
    pub villes: Arc<VilleLookup>,
    pub session: Arc<SessionBootstrapper<PlatformAuth>>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Build the full state, probing the deployment's schema first.
    pub async fn new(
        platform: Arc<PlatformClient>,
        config: ApiConfig,
    ) -> Result<Self, colo_backend::BackendError> {
        let capabilities = Arc::new(probe_capabilities(&platform).await?);

        let profils = Arc::new(ProfilAuthRepo::new(Arc::clone(&platform)));
        let mnemos = Arc::new(MnemosRepo::new(Arc::clone(&platform)));
        let resolver = Arc::new(Resolver::new(profils, mnemos, Arc::clone(&capabilities)));

        let audit = Arc::new(AuditRepo::new(Arc::clone(&platform)));
        let edit_logger = Arc::new(EditLogger::new(audit, Arc::clone(&resolver)));

        let villes = match &config.geo_api_url {
            Some(url) => Arc::new(VilleLookup::with_base_url(url)?),
            None => Arc::new(VilleLookup::new()?),
        };

        let auth = Arc::new(PlatformAuth::new(
            Arc::clone(&platform),
            config.refresh_token.clone(),
        ));
        let session = Arc::new(SessionBootstrapper::new(auth));
        session.start().await;

        // a sign-out means a different principal may come next; drop the
        // cached identity mapping
        let mut session_watch = session.watch();
        let resolver_for_watch = Arc::clone(&resolver);
        tokio::spawn(async move {
            while session_watch.changed().await.is_ok() {
                let signed_out = session_watch.borrow().is_none();
                if signed_out {
                    resolver_for_watch.reset().await;
                }
            }
        });

        Ok(Self {
            capabilities,
            resolver,
            edit_logger,
            familles: Arc::new(FamilleRepo::new(Arc::clone(&platform))),
            centres: Arc::new(CentreRepo::new(Arc::clone(&platform))),
            sejours: Arc::new(SejourRepo::new(Arc::clone(&platform))),
            inscriptions: Arc::new(InscriptionRepo::new(Arc::clone(&platform))),
            transports: Arc::new(TransportRepo::new(Arc::clone(&platform))),
            animateurs: Arc::new(AnimateurRepo::new(Arc::clone(&platform))),
            paiements: Arc::new(PaiementRepo::new(Arc::clone(&platform))),
            projets: Arc::new(ProjetRepo::new(Arc::clone(&platform))),
            villes,
            session,
            config: Arc::new(config),
            platform,
        })
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    /// Shared secret used to validate user access tokens (HS256)
    pub jwt_secret: String,
    /// Shared secret for payment webhook signatures
    pub webhook_secret: String,
    /// Webhook timestamp tolerance in seconds
    pub webhook_tolerance_secs: i64,
    /// Bucket holding project assets
    pub assets_bucket: String,
    /// Refresh token for the service's own platform session, when one is
    /// provisioned
    pub refresh_token: Option<String>,
    /// Override for the communes API (tests)
    pub geo_api_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            jwt_secret: String::new(),
            webhook_secret: String::new(),
            webhook_tolerance_secs: 300,
            assets_bucket: "projets".to_string(),
            refresh_token: None,
            geo_api_url: None,
        }
    }
}
