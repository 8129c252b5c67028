//! Import flag set
//!
//! The typed, validated inputs of one import run. Built once by the CLI layer
//! and passed by reference to every resolver.

use crate::error::{FlowError, Result};
use crate::labels::{Labels, parse_user_labels};
use crate::paths::{supported_os, translate_workflow_path};
use imageflow_cloud::Location;
use regex::Regex;
use std::sync::OnceLock;

const GCS_PATH_PATTERN: &str = r"^gs://([a-z0-9][-_.a-z0-9]*)/(.+)$";

/// Flags describing one image import
///
/// Optional values holding an empty string count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportFlags {
    /// Name of the image to create
    pub image_name: Option<String>,

    /// Identifies the client calling the importer
    pub client_id: Option<String>,

    /// Disk file to import (`gs://bucket/object`)
    pub source_file: Option<String>,

    /// Existing image to import from
    pub source_image: Option<String>,

    /// OS of the imported disk (e.g. `ubuntu-1604`)
    pub os: Option<String>,

    /// Import a data disk; no OS translation
    pub data_disk: bool,

    /// Skip installing the guest environment
    pub no_guest_environment: bool,

    pub family: Option<String>,
    pub description: Option<String>,
    pub network: Option<String>,
    pub subnet: Option<String>,
    pub zone: Option<String>,
    pub region: Option<String>,

    /// Strip external IPs from the instances the workflow creates
    pub no_external_ip: bool,

    /// Raw `key=value,...` label string
    pub labels: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl ImportFlags {
    pub fn image_name(&self) -> Option<&str> {
        non_empty(&self.image_name)
    }

    pub fn client_id(&self) -> Option<&str> {
        non_empty(&self.client_id)
    }

    pub fn source_file(&self) -> Option<&str> {
        non_empty(&self.source_file)
    }

    pub fn source_image(&self) -> Option<&str> {
        non_empty(&self.source_image)
    }

    pub fn os(&self) -> Option<&str> {
        non_empty(&self.os)
    }

    pub fn family(&self) -> Option<&str> {
        non_empty(&self.family)
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    pub fn network(&self) -> Option<&str> {
        non_empty(&self.network)
    }

    pub fn subnet(&self) -> Option<&str> {
        non_empty(&self.subnet)
    }

    /// Check the flag combination before anything is derived from it.
    pub fn validate(&self) -> Result<()> {
        if self.image_name().is_none() {
            return Err(FlowError::MissingFlag("image_name".to_string()));
        }
        if self.client_id().is_none() {
            return Err(FlowError::MissingFlag("client_id".to_string()));
        }

        match (self.data_disk, self.os()) {
            (true, Some(_)) => {
                return Err(FlowError::ConflictingFlags(
                    "when -data_disk is specified, -os should be empty".to_string(),
                ));
            }
            (false, None) => {
                return Err(FlowError::ConflictingFlags(
                    "-data_disk or -os has to be specified".to_string(),
                ));
            }
            _ => {}
        }

        match (self.source_file(), self.source_image()) {
            (Some(_), Some(_)) => {
                return Err(FlowError::ConflictingFlags(
                    "either -source_file or -source_image has to be specified, but not both"
                        .to_string(),
                ));
            }
            (None, None) => {
                return Err(FlowError::ConflictingFlags(
                    "-source_file or -source_image has to be specified".to_string(),
                ));
            }
            (Some(file), None) => validate_gcs_path(file)?,
            (None, Some(_)) => {}
        }

        if let Some(os) = self.os()
            && translate_workflow_path(os).is_none()
        {
            return Err(FlowError::UnsupportedOs {
                os: os.to_string(),
                supported: supported_os().collect::<Vec<_>>().join(", "),
            });
        }

        Ok(())
    }

    /// Labels given through `--labels`
    pub fn user_labels(&self) -> Result<Labels> {
        parse_user_labels(self.labels.as_deref().unwrap_or_default())
    }

    /// Location as given on the command line, before metadata lookup
    pub fn location(&self) -> Location {
        Location::new(
            non_empty(&self.zone).map(str::to_string),
            non_empty(&self.region).map(str::to_string),
        )
    }
}

fn gcs_path_regex() -> Result<&'static Regex> {
    static GCS_PATH: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    GCS_PATH
        .get_or_init(|| Regex::new(GCS_PATH_PATTERN))
        .as_ref()
        .map_err(|e| FlowError::Pattern(e.clone()))
}

fn validate_gcs_path(path: &str) -> Result<()> {
    if gcs_path_regex()?.is_match(path) {
        Ok(())
    } else {
        Err(FlowError::InvalidSourceFile(path.to_string()))
    }
}
