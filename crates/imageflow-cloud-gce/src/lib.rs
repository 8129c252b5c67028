//! Compute Engine metadata client for imageflow
//!
//! Implements [`imageflow_cloud::MetadataProvider`] on top of the instance
//! metadata server, so `image-import` can pick up its zone when it runs on a
//! Compute Engine VM and `--zone` is omitted.
//!
//! # Example
//!
//! ```ignore
//! use imageflow_cloud::{Location, MetadataProvider};
//! use imageflow_cloud_gce::GceMetadata;
//!
//! let metadata = GceMetadata::new()?;
//! let mut location = Location::default();
//! location.populate_zone_if_missing(&metadata)?;
//! location.populate_region()?;
//! ```

pub mod error;
pub mod metadata;

pub use error::{GceError, Result};
pub use metadata::{GceMetadata, METADATA_HOST_ENV, metadata_host, zone_from_path};
