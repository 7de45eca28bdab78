//! Repositories, one per table

mod audit;
mod famille;
mod inscription;
mod mnemos;
mod paiement;
mod profil;
mod projet;
mod sejour;

pub use audit::AuditRepo;
pub use famille::{EnfantComplet, FamilleComplete, FamilleRepo};
pub use inscription::{AnimateurRepo, InscriptionRepo, TransportRepo};
pub use mnemos::{MnemosRepo, MNEMOS_TABLE};
pub use paiement::PaiementRepo;
pub use profil::{ProfilAuthRepo, PROFILS_AUTH_TABLE};
pub use projet::ProjetRepo;
pub use sejour::{CentreRepo, SejourRepo};
