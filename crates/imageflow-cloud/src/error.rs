//! Cloud location error types

use thiserror::Error;

/// Errors raised while resolving where an import runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloudError {
    #[error("zone is empty. Can't determine region")]
    EmptyZone,

    #[error("{0} is not a valid zone")]
    InvalidZone(String),

    #[error("metadata lookup failed: {0}")]
    Metadata(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
