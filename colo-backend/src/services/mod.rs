//! Backend services

mod audit;
mod session;
mod villes;

pub use audit::EditLogger;
pub use session::SessionBootstrapper;
pub use villes::{Commune, VilleLookup};
