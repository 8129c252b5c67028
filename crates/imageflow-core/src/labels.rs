//! Resource labels
//!
//! Parses the user's `--labels` string and computes the labels attached to
//! every resource an import creates.

use crate::error::{FlowError, Result};
use std::collections::BTreeMap;

/// Label map (key -> value), ordered for stable output
pub type Labels = BTreeMap<String, String>;

/// Label carrying the build ID of the import run
pub const BUILD_ID_LABEL: &str = "gce-image-import-build-id";

/// Type label on images that survive the import
pub const IMAGE_TYPE_LABEL: &str = "gce-image-import";

/// Type label on intermediate resources (instances, disks, scratch images)
pub const TMP_TYPE_LABEL: &str = "gce-image-import-tmp";

/// Marker in image names of intermediate, not yet translated images
const UNTRANSLATED_MARKER: &str = "untranslated";

/// Role of a created resource, selecting its type label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRole {
    /// Part of the final output
    Permanent,
    /// Deleted once the import finishes
    Temporary,
}

impl ResourceRole {
    /// Role of an image, judged by its name
    pub fn for_image(name: &str) -> Self {
        if name.contains(UNTRANSLATED_MARKER) {
            ResourceRole::Temporary
        } else {
            ResourceRole::Permanent
        }
    }

    pub fn type_label(self) -> &'static str {
        match self {
            ResourceRole::Permanent => IMAGE_TYPE_LABEL,
            ResourceRole::Temporary => TMP_TYPE_LABEL,
        }
    }
}

/// Parse a `key1=value1,key2=value2` label string.
///
/// Whitespace around keys and values is stripped. An entry without `=`, or
/// with an empty key or value, fails the whole string.
pub fn parse_user_labels(raw: &str) -> Result<Labels> {
    let mut labels = Labels::new();
    if raw.is_empty() {
        return Ok(labels);
    }

    for entry in raw.split(',') {
        let (key, value) = entry
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| FlowError::LabelParse {
                entry: entry.to_string(),
            })?;
        labels.insert(key.to_string(), value.to_string());
    }

    Ok(labels)
}

/// Labels derived for one resource: the user's labels plus the build ID and
/// type labels, which take precedence over user keys of the same name.
pub fn derived_labels(user_labels: &Labels, build_id: &str, role: ResourceRole) -> Labels {
    let mut labels = user_labels.clone();
    labels.insert(BUILD_ID_LABEL.to_string(), build_id.to_string());
    labels.insert(role.type_label().to_string(), "true".to_string());
    labels
}

/// Add every key of `extra` missing from `target`, creating `target` if absent.
///
/// Existing keys are never overwritten.
pub fn merge_missing(target: &mut Option<Labels>, extra: &Labels) {
    let labels = target.get_or_insert_with(Labels::new);
    for (key, value) in extra {
        labels
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}
