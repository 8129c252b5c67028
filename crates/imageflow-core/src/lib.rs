//! imageflow core
//!
//! Turns an image-import request into an annotated workflow graph:
//!
//! 1. [`ImportFlags::validate`] checks the request
//! 2. [`WorkflowPaths::resolve`] picks the template and translate workflow
//! 3. [`build_workflow_vars`] binds the template variables
//! 4. [`load_workflow`] reads the template and its includes
//! 5. [`WorkflowAnnotator::annotate`] labels every created resource
//!
//! Nothing here talks to the cloud; location lookups go through
//! `imageflow-cloud`.

pub mod annotate;
pub mod error;
pub mod flags;
pub mod labels;
pub mod loader;
pub mod model;
pub mod paths;
pub mod vars;

pub use annotate::{AnnotationSummary, WorkflowAnnotator};
pub use error::{FlowError, Result};
pub use flags::ImportFlags;
pub use labels::{Labels, ResourceRole, parse_user_labels};
pub use loader::{load_workflow, parse_workflow};
pub use model::*;
pub use paths::{
    WorkflowKind, WorkflowPaths, supported_os, translate_workflow_for, translate_workflow_path,
};
pub use vars::{WorkflowVars, build_workflow_vars};
