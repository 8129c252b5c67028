//! Workflow graph model
//!
//! Typed view of a daisy-style workflow document. Only what the annotator
//! touches is typed; every other key is preserved as-is so the document
//! round-trips to the orchestration engine unchanged.

mod resource;
mod workflow;

// Re-exports
pub use resource::*;
pub use workflow::*;
