//! imageflow cloud location
//!
//! Resolves the zone and region an image import runs in.
//!
//! # Resolution order
//!
//! ```text
//! --zone flag ──┐
//!               ├──> Location.zone ──> get_region() ──> Location.region
//! metadata ─────┘                                       (unless --region)
//! ```
//!
//! Metadata access is injected through [`MetadataProvider`], so resolution
//! is testable without a live metadata server. The real client lives in
//! `imageflow-cloud-gce`.

pub mod error;
pub mod location;
pub mod metadata;

// Re-exports
pub use error::{CloudError, Result};
pub use location::{Location, get_region};
pub use metadata::MetadataProvider;
