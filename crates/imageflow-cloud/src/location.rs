//! Zone and region resolution

use crate::error::{CloudError, Result};
use crate::metadata::MetadataProvider;
use serde::Serialize;
use tracing::{debug, info};

/// Derive the region a zone belongs to.
///
/// The region is the zone with its trailing locality component removed:
/// `us-central1-c` -> `us-central1`.
pub fn get_region(zone: &str) -> Result<String> {
    if zone.is_empty() {
        return Err(CloudError::EmptyZone);
    }

    let (region, locality) = zone
        .rsplit_once('-')
        .ok_or_else(|| CloudError::InvalidZone(zone.to_string()))?;

    if region.is_empty() || locality.is_empty() || region.split('-').any(str::is_empty) {
        return Err(CloudError::InvalidZone(zone.to_string()));
    }

    Ok(region.to_string())
}

/// Zone and region an import will run in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Zone, explicit or read from instance metadata
    pub zone: Option<String>,

    /// Region, explicit or derived from the zone
    pub region: Option<String>,
}

impl Location {
    pub fn new(zone: Option<String>, region: Option<String>) -> Self {
        Self { zone, region }
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Compute the region from the zone unless one is already set.
    ///
    /// On failure the region stays unset.
    pub fn populate_region(&mut self) -> Result<()> {
        if self.region.is_some() {
            return Ok(());
        }

        let region = get_region(self.zone().unwrap_or_default())?;
        debug!(region = %region, "Derived region from zone");
        self.region = Some(region);
        Ok(())
    }

    /// Fill in the zone from instance metadata when it was not given.
    ///
    /// Off Compute Engine the zone is left unset; callers that need a zone
    /// fail later in [`Location::populate_region`].
    pub fn populate_zone_if_missing(&mut self, metadata: &dyn MetadataProvider) -> Result<()> {
        if self.zone.is_some() {
            return Ok(());
        }

        if !metadata.on_gce() {
            debug!("Not running on GCE, zone left unset");
            return Ok(());
        }

        let zone = metadata
            .zone()
            .map_err(|e| CloudError::Metadata(format!("can't infer zone: {}", e)))?;
        if zone.is_empty() {
            return Err(CloudError::Metadata(
                "zone returned by the metadata server is empty".to_string(),
            ));
        }

        info!(zone = %zone, "Using zone from instance metadata");
        self.zone = Some(zone);
        Ok(())
    }
}
