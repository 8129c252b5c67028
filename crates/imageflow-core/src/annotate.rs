//! Workflow graph annotation
//!
//! Walks every step of a workflow (and of the workflows it includes) and
//! attaches the import labels to each resource the step creates. With
//! `no_external_ip` set, instances also lose their external access configs.

use crate::labels::{Labels, ResourceRole, derived_labels, merge_missing};
use crate::model::{StepAction, Workflow};
use std::fmt;
use tracing::{debug, info};

/// Labels and strips resources in a workflow graph
#[derive(Debug, Clone)]
pub struct WorkflowAnnotator {
    build_id: String,
    user_labels: Labels,
    no_external_ip: bool,
}

/// What one annotation pass touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationSummary {
    pub instances: usize,
    pub disks: usize,
    pub images: usize,
    pub included_workflows: usize,
    pub access_configs_removed: usize,
}

impl fmt::Display for AnnotationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} instance(s), {} disk(s), {} image(s) in {} included workflow(s); {} access config(s) removed",
            self.instances,
            self.disks,
            self.images,
            self.included_workflows,
            self.access_configs_removed
        )
    }
}

impl WorkflowAnnotator {
    pub fn new(build_id: impl Into<String>) -> Self {
        Self {
            build_id: build_id.into(),
            user_labels: Labels::new(),
            no_external_ip: false,
        }
    }

    pub fn with_user_labels(mut self, labels: Labels) -> Self {
        self.user_labels = labels;
        self
    }

    pub fn with_no_external_ip(mut self, no_external_ip: bool) -> Self {
        self.no_external_ip = no_external_ip;
        self
    }

    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    /// Annotate `workflow` in place.
    ///
    /// Existing label keys are kept, so running this twice changes nothing.
    #[tracing::instrument(skip_all, fields(workflow = %workflow.name, build_id = %self.build_id))]
    pub fn annotate(&self, workflow: &mut Workflow) -> AnnotationSummary {
        let mut summary = AnnotationSummary::default();
        self.visit(workflow, &mut summary);
        info!("Annotated {}", summary);
        summary
    }

    fn visit(&self, workflow: &mut Workflow, summary: &mut AnnotationSummary) {
        let temporary = derived_labels(&self.user_labels, &self.build_id, ResourceRole::Temporary);
        let permanent = derived_labels(&self.user_labels, &self.build_id, ResourceRole::Permanent);

        for (step_name, step) in workflow.steps.iter_mut() {
            match &mut step.action {
                StepAction::CreateInstances(instances) => {
                    for instance in instances {
                        merge_missing(&mut instance.labels, &temporary);
                        if self.no_external_ip {
                            summary.access_configs_removed += instance.remove_external_ip();
                        }
                        debug!(step = %step_name, instance = %instance.name, "labeled instance");
                        summary.instances += 1;
                    }
                }
                StepAction::CreateDisks(disks) => {
                    for disk in disks {
                        merge_missing(&mut disk.labels, &temporary);
                        debug!(step = %step_name, disk = %disk.name, "labeled disk");
                        summary.disks += 1;
                    }
                }
                StepAction::CreateImages(images) => {
                    for image in images {
                        let labels = match ResourceRole::for_image(&image.name) {
                            ResourceRole::Temporary => &temporary,
                            ResourceRole::Permanent => &permanent,
                        };
                        merge_missing(&mut image.labels, labels);
                        debug!(step = %step_name, image = %image.name, "labeled image");
                        summary.images += 1;
                    }
                }
                StepAction::IncludeWorkflow(include) => {
                    if let Some(child) = include.workflow.as_deref_mut() {
                        summary.included_workflows += 1;
                        self.visit(child, summary);
                    }
                }
                StepAction::Other => {}
            }
        }
    }
}
