//! Colo Core - types and identity resolution for camp operations
//!
//! This crate provides the domain types and the identity-resolution logic
//! shared by the backend and API layers:
//! - Camp domain records (familles, enfants, centres, séjours, inscriptions,
//!   transports, animateurs, paiements, projets)
//! - Principal / session types for the hosted identity provider
//! - The mnemos-id resolver with its ordered strategy list
//! - The capability set produced by the startup schema probe
//!
//! Storage and HTTP concerns live in `colo-backend` and `colo-api`; this
//! crate only defines the seams they implement.

pub mod capabilities;
pub mod error;
pub mod identity;
pub mod types;

pub use capabilities::Capabilities;
pub use error::*;
pub use types::*;
