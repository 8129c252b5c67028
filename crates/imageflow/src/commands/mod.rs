pub mod annotate;
pub mod plan;
pub mod vars;

use crate::args::ImportArgs;
use anyhow::Context;
use imageflow_cloud::Location;
use imageflow_cloud_gce::GceMetadata;
use imageflow_config::Settings;
use imageflow_core::{ImportFlags, WorkflowVars, build_workflow_vars, translate_workflow_for};
use std::path::PathBuf;

/// Everything derived from the import flags; no template is touched
pub struct PreparedImport {
    pub flags: ImportFlags,
    pub location: Location,
    pub vars: WorkflowVars,
}

/// Validate the flags, resolve the location and bind the workflow variables
pub fn prepare(args: &ImportArgs, settings: &Settings) -> anyhow::Result<PreparedImport> {
    let flags = args.to_flags(settings);
    flags.validate()?;

    let location = resolve_location(&flags)?;
    let vars = build_workflow_vars(translate_workflow_for(&flags), &flags, &location)?;

    Ok(PreparedImport {
        flags,
        location,
        vars,
    })
}

fn resolve_location(flags: &ImportFlags) -> anyhow::Result<Location> {
    let mut location = flags.location();
    if location.zone().is_none() {
        let metadata = GceMetadata::new().context("failed to create metadata client")?;
        location.populate_zone_if_missing(&metadata)?;
    }
    location.populate_region()?;
    Ok(location)
}

/// `--workflow-dir`, or the configured / bundled directory
pub fn workflow_dir(args: &ImportArgs, settings: &Settings) -> anyhow::Result<PathBuf> {
    match &args.workflow_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(imageflow_config::find_workflow_dir(settings)?),
    }
}
