//! Colo Backend - hosted platform integration
//!
//! Everything that talks to the hosted backend-as-a-service lives here:
//! - `PlatformClient` - HTTP client for the platform's row API, auth admin
//!   API and file storage API
//! - `repos` - one repository per table, mapping rows to `colo-core` types
//! - `services` - session bootstrap, the edit logger and the city lookup
//! - `probe` - the startup schema probe that produces the capability set
//!
//! The datastore is reached over HTTP; nothing in this crate opens a local
//! database.

pub mod admin;
pub mod auth;
pub mod client;
pub mod error;
pub mod probe;
pub mod repos;
pub mod rows;
pub mod services;
pub mod storage;

pub use admin::PlatformUser;
pub use auth::{PlatformAuth, SessionSource};
pub use client::{PlatformClient, PlatformConfig};
pub use error::{BackendError, BackendResult};
pub use probe::probe_capabilities;
pub use repos::*;
pub use services::{EditLogger, SessionBootstrapper, VilleLookup};
pub use storage::AssetRemoval;

/// The concrete identity resolver used by this deployment: profile mappings
/// and the legacy directory both live in the hosted platform.
pub type Resolver =
    colo_core::identity::IdentityResolver<repos::ProfilAuthRepo, repos::MnemosRepo>;
