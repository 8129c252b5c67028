use crate::args::resolve_build_id;
use colored::Colorize;
use imageflow_core::{WorkflowAnnotator, WorkflowVars, load_workflow, parse_user_labels};
use std::path::Path;

pub fn handle(
    workflow_path: &Path,
    build_id: Option<&str>,
    labels: Option<&str>,
    no_external_ip: bool,
) -> anyhow::Result<()> {
    let user_labels = parse_user_labels(labels.unwrap_or_default())?;
    let build_id = resolve_build_id(build_id);

    let mut workflow = load_workflow(workflow_path, &WorkflowVars::new())?;
    let summary = WorkflowAnnotator::new(build_id.as_str())
        .with_user_labels(user_labels)
        .with_no_external_ip(no_external_ip)
        .annotate(&mut workflow);

    println!("{}", serde_json::to_string_pretty(&workflow)?);
    eprintln!("{} {} (build {})", "✓".green().bold(), summary, build_id.cyan());
    Ok(())
}
