//! Metadata server client

use crate::error::{GceError, Result};
use imageflow_cloud::MetadataProvider;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Environment variable overriding the metadata server host
pub const METADATA_HOST_ENV: &str = "GCE_METADATA_HOST";

const DEFAULT_METADATA_HOST: &str = "169.254.169.254";
const METADATA_FLAVOR_HEADER: &str = "Metadata-Flavor";
const METADATA_FLAVOR: &str = "Google";
const ZONE_PATH: &str = "instance/zone";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Compute Engine metadata server client
///
/// Each call issues a single request; there is no retry.
pub struct GceMetadata {
    client: Client,
    host: String,
}

impl GceMetadata {
    pub fn new() -> Result<Self> {
        Self::with_host(metadata_host())
    }

    pub fn with_host(host: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            host: host.into(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Read a value under `computeMetadata/v1/`
    pub fn get(&self, path: &str) -> Result<String> {
        let url = format!("http://{}/computeMetadata/v1/{}", self.host, path);
        debug!(url = %url, "Querying metadata server");

        let response = self
            .client
            .get(&url)
            .header(METADATA_FLAVOR_HEADER, METADATA_FLAVOR)
            .send()?;

        if !response.status().is_success() {
            return Err(GceError::Status {
                path: path.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text()?.trim().to_string())
    }

    /// Zone of the current instance
    pub fn instance_zone(&self) -> Result<String> {
        let value = self.get(ZONE_PATH)?;
        zone_from_path(&value).ok_or(GceError::UnexpectedValue {
            path: ZONE_PATH.to_string(),
            value,
        })
    }

    fn probe(&self) -> bool {
        let url = format!("http://{}", self.host);
        match self
            .client
            .get(&url)
            .header(METADATA_FLAVOR_HEADER, METADATA_FLAVOR)
            .send()
        {
            Ok(response) => response
                .headers()
                .get(METADATA_FLAVOR_HEADER)
                .is_some_and(|v| v == METADATA_FLAVOR),
            Err(e) => {
                debug!(error = %e, "Metadata server not reachable");
                false
            }
        }
    }
}

impl MetadataProvider for GceMetadata {
    fn on_gce(&self) -> bool {
        // An explicit host override means the caller wants the metadata server used
        if std::env::var_os(METADATA_HOST_ENV).is_some() {
            return true;
        }
        self.probe()
    }

    fn zone(&self) -> imageflow_cloud::Result<String> {
        Ok(self.instance_zone()?)
    }
}

/// Metadata host, honoring `GCE_METADATA_HOST`
pub fn metadata_host() -> String {
    std::env::var(METADATA_HOST_ENV)
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string())
}

/// Extract the zone name from `projects/<number>/zones/<zone>`
pub fn zone_from_path(value: &str) -> Option<String> {
    let zone = value.rsplit('/').next()?.trim();
    if zone.is_empty() {
        None
    } else {
        Some(zone.to_string())
    }
}
