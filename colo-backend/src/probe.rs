//! Startup capability probe
//!
//! Rather than discovering missing tables through failed requests at
//! runtime, the schema is probed once at startup and the result becomes the
//! typed capability set. The runtime missing-relation backstop in the
//! resolver stays in place for schemas that change after start.

use tracing::info;

use colo_core::Capabilities;

use crate::client::PlatformClient;
use crate::error::BackendResult;
use crate::repos::{MNEMOS_TABLE, PROFILS_AUTH_TABLE};

/// Probe the deployment's schema and build the capability set.
pub async fn probe_capabilities(client: &PlatformClient) -> BackendResult<Capabilities> {
    let profile_mapping = client.probe_table(PROFILS_AUTH_TABLE).await?;
    let legacy_sync = client.probe_table(MNEMOS_TABLE).await?;

    info!(profile_mapping, legacy_sync, "capability probe complete");
    Ok(Capabilities::new(profile_mapping, legacy_sync))
}
