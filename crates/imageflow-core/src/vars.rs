//! Workflow variable bindings
//!
//! Builds the `key -> value` map the orchestration engine substitutes into the
//! selected template.

use crate::error::{FlowError, Result};
use crate::flags::ImportFlags;
use imageflow_cloud::Location;
use std::collections::BTreeMap;
use tracing::debug;

/// Variable bindings, ordered for stable output
pub type WorkflowVars = BTreeMap<String, String>;

pub const IMAGE_NAME_VAR: &str = "image_name";
pub const TRANSLATE_WORKFLOW_VAR: &str = "translate_workflow";
pub const INSTALL_GCE_PACKAGES_VAR: &str = "install_gce_packages";
pub const SOURCE_DISK_FILE_VAR: &str = "source_disk_file";
pub const SOURCE_IMAGE_VAR: &str = "source_image";
pub const FAMILY_VAR: &str = "family";
pub const DESCRIPTION_VAR: &str = "description";
pub const IMPORT_NETWORK_VAR: &str = "import_network";
pub const IMPORT_SUBNET_VAR: &str = "import_subnet";

/// Build the variables for one import.
///
/// Optional variables are omitted, not bound to an empty string, when their
/// flag is unset. A subnet needs the region to be resolved already.
pub fn build_workflow_vars(
    translate_workflow: Option<&str>,
    flags: &ImportFlags,
    location: &Location,
) -> Result<WorkflowVars> {
    let mut vars = WorkflowVars::new();

    vars.insert(
        IMAGE_NAME_VAR.to_string(),
        flags.image_name().unwrap_or_default().to_string(),
    );
    vars.insert(
        TRANSLATE_WORKFLOW_VAR.to_string(),
        translate_workflow.unwrap_or_default().to_string(),
    );
    vars.insert(
        INSTALL_GCE_PACKAGES_VAR.to_string(),
        (!flags.no_guest_environment).to_string(),
    );

    if let Some(image) = flags.source_image() {
        vars.insert(SOURCE_IMAGE_VAR.to_string(), image_reference(image));
    } else if let Some(file) = flags.source_file() {
        vars.insert(SOURCE_DISK_FILE_VAR.to_string(), file.to_string());
    }

    if let Some(family) = flags.family() {
        vars.insert(FAMILY_VAR.to_string(), family.to_string());
    }
    if let Some(description) = flags.description() {
        vars.insert(DESCRIPTION_VAR.to_string(), description.to_string());
    }
    if let Some(network) = flags.network() {
        vars.insert(IMPORT_NETWORK_VAR.to_string(), network_reference(network));
    }
    if let Some(subnet) = flags.subnet() {
        let region = location
            .region()
            .ok_or_else(|| FlowError::RegionUnresolved(subnet.to_string()))?;
        vars.insert(
            IMPORT_SUBNET_VAR.to_string(),
            subnet_reference(region, subnet),
        );
    }

    debug!(count = vars.len(), "Built workflow variables");
    Ok(vars)
}

/// `global/images/<name>`
pub fn image_reference(name: &str) -> String {
    format!("global/images/{}", name)
}

/// `global/networks/<name>`
pub fn network_reference(name: &str) -> String {
    format!("global/networks/{}", name)
}

/// `regions/<region>/subnetworks/<name>`
pub fn subnet_reference(region: &str, name: &str) -> String {
    format!("regions/{}/subnetworks/{}", region, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(source_file: &str, source_image: &str) -> ImportFlags {
        ImportFlags {
            image_name: Some("image-a".to_string()),
            no_guest_environment: true,
            source_file: Some(source_file.to_string()),
            source_image: Some(source_image.to_string()),
            family: Some("a-family".to_string()),
            description: Some("a-description".to_string()),
            network: Some("a-network".to_string()),
            subnet: Some("a-subnet".to_string()),
            ..Default::default()
        }
    }

    fn location() -> Location {
        Location::new(None, Some("a-region".to_string()))
    }

    #[test]
    fn test_vars_from_disk() {
        let vars = build_workflow_vars(
            Some("translate/workflow/path"),
            &flags("source-file-path", ""),
            &location(),
        )
        .unwrap();

        assert_eq!(vars["image_name"], "image-a");
        assert_eq!(vars["translate_workflow"], "translate/workflow/path");
        assert_eq!(vars["install_gce_packages"], "false");
        assert_eq!(vars["source_disk_file"], "source-file-path");
        assert_eq!(vars["family"], "a-family");
        assert_eq!(vars["description"], "a-description");
        assert_eq!(vars["import_network"], "global/networks/a-network");
        assert_eq!(vars["import_subnet"], "regions/a-region/subnetworks/a-subnet");
        assert_eq!(vars.len(), 8);
    }

    #[test]
    fn test_vars_from_image() {
        let vars = build_workflow_vars(
            Some("translate/workflow/path"),
            &flags("", "source-image"),
            &location(),
        )
        .unwrap();

        assert_eq!(vars["source_image"], "global/images/source-image");
        assert!(!vars.contains_key("source_disk_file"));
        assert_eq!(vars["import_subnet"], "regions/a-region/subnetworks/a-subnet");
        assert_eq!(vars.len(), 8);
    }

    #[test]
    fn test_vars_minimal() {
        let flags = ImportFlags {
            image_name: Some("image-a".to_string()),
            source_file: Some("gs://bucket/disk.vmdk".to_string()),
            network: Some(String::new()),
            ..Default::default()
        };

        let vars = build_workflow_vars(None, &flags, &Location::default()).unwrap();

        assert_eq!(vars["translate_workflow"], "");
        assert_eq!(vars["install_gce_packages"], "true");
        assert_eq!(vars.len(), 4);
        for key in ["family", "description", "import_network", "import_subnet"] {
            assert!(!vars.contains_key(key), "{} should be absent", key);
        }
    }

    #[test]
    fn test_subnet_requires_region() {
        let result = build_workflow_vars(None, &flags("file", ""), &Location::default());
        assert!(matches!(result, Err(FlowError::RegionUnresolved(_))));
    }
}
