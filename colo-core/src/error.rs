//! Error types for Colo core

use thiserror::Error;

/// Errors surfaced by the mapping stores behind the identity resolver.
///
/// The resolver needs to distinguish a missing relation (the deployment
/// simply does not have the table) from every other store failure, because
/// the former disables the strategy for the rest of the process while the
/// latter aborts the resolution.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("relation does not exist: {0}")]
    MissingRelation(String),

    #[error("mapping store error: {0}")]
    Store(String),
}

/// Identity resolution errors
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("identity store error: {0}")]
    Store(String),
}

impl From<MappingError> for ResolveError {
    fn from(err: MappingError) -> Self {
        ResolveError::Store(err.to_string())
    }
}

/// Result type alias for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;
