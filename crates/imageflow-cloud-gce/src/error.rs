//! Compute Engine metadata error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GceError {
    #[error("metadata request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata server returned status {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("unexpected metadata value for {path}: {value:?}")]
    UnexpectedValue { path: String, value: String },
}

impl From<GceError> for imageflow_cloud::CloudError {
    fn from(err: GceError) -> Self {
        imageflow_cloud::CloudError::Metadata(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GceError>;
