use clap::Args;
use imageflow_config::Settings;
use imageflow_core::ImportFlags;
use std::path::PathBuf;

/// Number of characters in a generated build ID
const BUILD_ID_LEN: usize = 5;

/// Flags shared by `plan` and `vars`
#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    /// Name of the image to create
    #[arg(long, alias = "image_name")]
    pub image_name: Option<String>,

    /// Identifies the client of the importer (e.g. gcloud)
    #[arg(long, alias = "client_id")]
    pub client_id: Option<String>,

    /// Disk file to import (gs://bucket/object)
    #[arg(long, alias = "source_file")]
    pub source_file: Option<String>,

    /// Existing image to import from
    #[arg(long, alias = "source_image")]
    pub source_image: Option<String>,

    /// OS of the imported disk (e.g. ubuntu-1604)
    #[arg(long)]
    pub os: Option<String>,

    /// Import a data disk without OS translation
    #[arg(long, alias = "data_disk")]
    pub data_disk: bool,

    /// Skip installing the guest environment
    #[arg(long, alias = "no_guest_environment")]
    pub no_guest_environment: bool,

    /// Image family
    #[arg(long)]
    pub family: Option<String>,

    /// Image description
    #[arg(long)]
    pub description: Option<String>,

    /// Network for the import instances
    #[arg(long)]
    pub network: Option<String>,

    /// Subnetwork for the import instances
    #[arg(long)]
    pub subnet: Option<String>,

    /// Zone to run in; read from instance metadata when omitted
    #[arg(long)]
    pub zone: Option<String>,

    /// Region to run in; derived from the zone when omitted
    #[arg(long)]
    pub region: Option<String>,

    /// Create the import instances without external IPs
    #[arg(long, alias = "no_external_ip")]
    pub no_external_ip: bool,

    /// Labels for created resources (key1=value1,key2=value2)
    #[arg(long)]
    pub labels: Option<String>,

    /// Build ID attached to every created resource
    #[arg(long, alias = "build_id", env = "BUILD_ID")]
    pub build_id: Option<String>,

    /// Directory holding the import workflow templates
    #[arg(long, alias = "workflow_dir")]
    pub workflow_dir: Option<PathBuf>,
}

impl ImportArgs {
    /// Flag set with settings defaults applied to unset flags
    pub fn to_flags(&self, settings: &Settings) -> ImportFlags {
        ImportFlags {
            image_name: self.image_name.clone(),
            client_id: self.client_id.clone(),
            source_file: self.source_file.clone(),
            source_image: self.source_image.clone(),
            os: self.os.clone(),
            data_disk: self.data_disk,
            no_guest_environment: self.no_guest_environment,
            family: self.family.clone(),
            description: self.description.clone(),
            network: self.network.clone().or_else(|| settings.network.clone()),
            subnet: self.subnet.clone().or_else(|| settings.subnet.clone()),
            zone: self.zone.clone().or_else(|| settings.zone.clone()),
            region: self.region.clone(),
            no_external_ip: self.no_external_ip,
            labels: self.labels.clone().or_else(|| settings.labels.clone()),
        }
    }
}

/// `--build-id` / `BUILD_ID`, or a random ID
pub fn resolve_build_id(build_id: Option<&str>) -> String {
    match build_id.filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            let mut id = uuid::Uuid::new_v4().simple().to_string();
            id.truncate(BUILD_ID_LEN);
            id
        }
    }
}
