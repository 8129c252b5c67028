//! Resource specifications created by workflow steps

use crate::labels::Labels;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Instance created by a `CreateInstances` step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "Name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "Labels", default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,

    /// `None` lets the engine apply its default networking
    #[serde(
        rename = "NetworkInterfaces",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub network_interfaces: Option<Vec<NetworkInterface>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instance {
    /// Remove every access config (external IP) from every interface.
    ///
    /// Each interface ends up with an explicit empty list, since an absent
    /// list gets the engine's default `ONE_TO_ONE_NAT`. Returns how many
    /// configs were removed. An absent interface list stays absent.
    pub fn remove_external_ip(&mut self) -> usize {
        self.network_interfaces
            .iter_mut()
            .flatten()
            .map(|nic| {
                nic.access_configs
                    .replace(Vec::new())
                    .map_or(0, |configs| configs.len())
            })
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    #[serde(rename = "Network", default, skip_serializing_if = "String::is_empty")]
    pub network: String,

    #[serde(rename = "Subnetwork", default, skip_serializing_if = "String::is_empty")]
    pub subnetwork: String,

    /// `None` means the engine default (one external NAT); `Some(vec![])`
    /// means no external IP
    #[serde(
        rename = "AccessConfigs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_configs: Option<Vec<AccessConfig>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// External access configuration of an interface (e.g. `ONE_TO_ONE_NAT`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(rename = "Name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "Type", default, skip_serializing_if = "String::is_empty")]
    pub access_type: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Disk created by a `CreateDisks` step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    #[serde(rename = "Name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "Labels", default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Image created by a `CreateImages` step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "Name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "Labels", default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
