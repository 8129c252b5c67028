use imageflow_cloud::CloudError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("invalid label entry {entry:?}: expected key=value with a non-empty key and value")]
    LabelParse { entry: String },

    #[error("The flag -{0} must be provided")]
    MissingFlag(String),

    #[error("{0}")]
    ConflictingFlags(String),

    #[error("invalid source file {0:?}: expected a gs://bucket/object path")]
    InvalidSourceFile(String),

    #[error("unsupported os {os:?}\nsupported values: {supported}")]
    UnsupportedOs { os: String, supported: String },

    #[error("region is not resolved; it is required to reference subnet {0:?}")]
    RegionUnresolved(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("undefined variable ${{{name}}} in {path}")]
    UnknownVariable { name: String, path: PathBuf },

    #[error("include cycle detected: {0}")]
    IncludeCycle(PathBuf),

    #[error("IO error: {path}\nreason: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("workflow parse error: {path}\nreason: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Cloud(#[from] CloudError),
}

pub type Result<T> = std::result::Result<T, FlowError>;
