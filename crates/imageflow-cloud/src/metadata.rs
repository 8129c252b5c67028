//! Metadata capability trait
//!
//! The zone an import runs in can come from the instance metadata server when
//! the tool itself runs on a Compute Engine VM. Access goes through this trait
//! so the resolver never touches ambient runtime state directly.

use crate::error::Result;

/// Instance metadata capability
///
/// Implemented by `imageflow-cloud-gce` for the real metadata server and by
/// test doubles elsewhere.
pub trait MetadataProvider {
    /// Whether the current process runs on a Compute Engine instance
    fn on_gce(&self) -> bool;

    /// Zone of the current instance (e.g. `us-central1-c`)
    fn zone(&self) -> Result<String>;
}
