use super::{prepare, workflow_dir};
use crate::args::{ImportArgs, resolve_build_id};
use colored::Colorize;
use imageflow_cloud::Location;
use imageflow_config::Settings;
use imageflow_core::{
    Workflow, WorkflowAnnotator, WorkflowKind, WorkflowPaths, WorkflowVars, load_workflow,
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Output of `plan`
#[derive(Serialize)]
struct Plan<'a> {
    kind: WorkflowKind,
    location: &'a Location,
    workflow_path: &'a Path,
    translate_workflow: Option<&'a str>,
    vars: &'a WorkflowVars,
    workflow: &'a Workflow,
}

pub fn handle(args: &ImportArgs, settings: &Settings) -> anyhow::Result<()> {
    let prepared = prepare(args, settings)?;
    let paths = WorkflowPaths::resolve(&prepared.flags, &workflow_dir(args, settings)?);
    debug!(kind = %paths.kind, workflow = %paths.workflow.display(), "Selected workflow");

    let build_id = resolve_build_id(args.build_id.as_deref());
    info!(build_id = %build_id, "Planning import");

    let mut workflow = load_workflow(&paths.workflow, &prepared.vars)?;
    let summary = WorkflowAnnotator::new(build_id.as_str())
        .with_user_labels(prepared.flags.user_labels()?)
        .with_no_external_ip(prepared.flags.no_external_ip)
        .annotate(&mut workflow);

    let plan = Plan {
        kind: paths.kind,
        location: &prepared.location,
        workflow_path: &paths.workflow,
        translate_workflow: paths.translate_workflow.as_deref(),
        vars: &prepared.vars,
        workflow: &workflow,
    };
    println!("{}", serde_json::to_string_pretty(&plan)?);

    eprintln!(
        "{} {} ({}, build {})",
        "✓".green().bold(),
        summary,
        paths.kind.to_string().cyan(),
        build_id.cyan()
    );
    Ok(())
}
