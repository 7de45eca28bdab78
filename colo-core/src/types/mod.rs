//! Domain types for camp operations
//!
//! Row-shaped structs mirror the hosted backend's tables one-to-one; the
//! serde representation of each struct is the row JSON that goes over the
//! wire. Identifiers are optional on the way in (the backend assigns them)
//! and present on the way out.

mod audit;
mod centre;
mod common;
mod famille;
mod inscription;
mod paiement;
mod principal;
mod projet;

pub use audit::*;
pub use centre::*;
pub use common::*;
pub use famille::*;
pub use inscription::*;
pub use paiement::*;
pub use principal::*;
pub use projet::*;
