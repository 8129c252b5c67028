use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config directory not found")]
    ConfigDirNotFound,

    #[error(
        "workflow directory not found. Checked:\n\
        - IMAGEFLOW_WORKFLOW_DIR environment variable\n\
        - workflow_dir in ~/.config/imageflow/config.yaml\n\
        - daisy_workflows/image_import next to the executable\n\
        - ./daisy_workflows/image_import\n\
        Use --workflow-dir to set it explicitly"
    )]
    WorkflowDirNotFound,

    #[error("invalid settings file: {path}\nreason: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
