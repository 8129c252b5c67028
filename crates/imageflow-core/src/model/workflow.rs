//! Workflow documents and steps

use super::resource::{Disk, Image, Instance};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const CREATE_INSTANCES: &str = "CreateInstances";
const CREATE_DISKS: &str = "CreateDisks";
const CREATE_IMAGES: &str = "CreateImages";
const INCLUDE_WORKFLOW: &str = "IncludeWorkflow";

/// A workflow graph: named steps plus their dependencies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(rename = "Name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "Vars", default, skip_serializing_if = "Map::is_empty")]
    pub vars: Map<String, Value>,

    #[serde(rename = "Steps", default)]
    pub steps: BTreeMap<String, Step>,

    #[serde(
        rename = "Dependencies",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub dependencies: BTreeMap<String, Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_step(mut self, name: impl Into<String>, step: Step) -> Self {
        self.steps.insert(name.into(), step);
        self
    }

    /// Default value a template declares for a variable, either as a plain
    /// string or as `{"Value": "..."}`
    pub fn declared_var(&self, name: &str) -> Option<&str> {
        match self.vars.get(name)? {
            Value::String(value) => Some(value),
            Value::Object(decl) => decl.get("Value").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// One step of a workflow
///
/// `action` holds the kind-specific payload; `extra` keeps the remaining step
/// keys (`Timeout`, ...) untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub action: StepAction,
    pub extra: Map<String, Value>,
}

impl Step {
    pub fn new(action: StepAction) -> Self {
        Self {
            action,
            extra: Map::new(),
        }
    }
}

/// What a step does
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    CreateInstances(Vec<Instance>),
    CreateDisks(Vec<Disk>),
    CreateImages(Vec<Image>),
    IncludeWorkflow(IncludeWorkflow),
    /// Any other step kind; its keys live in [`Step::extra`]
    Other,
}

impl StepAction {
    fn key(&self) -> Option<&'static str> {
        match self {
            StepAction::CreateInstances(_) => Some(CREATE_INSTANCES),
            StepAction::CreateDisks(_) => Some(CREATE_DISKS),
            StepAction::CreateImages(_) => Some(CREATE_IMAGES),
            StepAction::IncludeWorkflow(_) => Some(INCLUDE_WORKFLOW),
            StepAction::Other => None,
        }
    }
}

/// A nested workflow included by a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncludeWorkflow {
    /// Path of the included file, relative to the including one
    #[serde(rename = "Path", default, skip_serializing_if = "String::is_empty")]
    pub path: String,

    #[serde(rename = "Vars", default, skip_serializing_if = "Map::is_empty")]
    pub vars: Map<String, Value>,

    /// The included graph, once resolved
    #[serde(rename = "Workflow", default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Box<Workflow>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IncludeWorkflow {
    pub fn resolved(workflow: Workflow) -> Self {
        Self {
            workflow: Some(Box::new(workflow)),
            ..Default::default()
        }
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        let present: Vec<&'static str> =
            [CREATE_INSTANCES, CREATE_DISKS, CREATE_IMAGES, INCLUDE_WORKFLOW]
                .into_iter()
                .filter(|key| fields.contains_key(*key))
                .collect();
        if present.len() > 1 {
            return Err(D::Error::custom(format!(
                "step has more than one action: {}",
                present.join(", ")
            )));
        }

        fn take<T, E>(fields: &mut Map<String, Value>, key: &str) -> Result<T, E>
        where
            T: serde::de::DeserializeOwned,
            E: serde::de::Error,
        {
            let value = fields.remove(key).unwrap_or(Value::Null);
            serde_json::from_value(value).map_err(|e| E::custom(format!("{}: {}", key, e)))
        }

        let action = match present.first().copied() {
            Some(CREATE_INSTANCES) => {
                StepAction::CreateInstances(take::<_, D::Error>(&mut fields, CREATE_INSTANCES)?)
            }
            Some(CREATE_DISKS) => {
                StepAction::CreateDisks(take::<_, D::Error>(&mut fields, CREATE_DISKS)?)
            }
            Some(CREATE_IMAGES) => {
                StepAction::CreateImages(take::<_, D::Error>(&mut fields, CREATE_IMAGES)?)
            }
            Some(INCLUDE_WORKFLOW) => {
                StepAction::IncludeWorkflow(take::<_, D::Error>(&mut fields, INCLUDE_WORKFLOW)?)
            }
            _ => StepAction::Other,
        };

        Ok(Step {
            action,
            extra: fields,
        })
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.extra.len() + usize::from(self.action.key().is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        match &self.action {
            StepAction::CreateInstances(instances) => {
                map.serialize_entry(CREATE_INSTANCES, instances)?
            }
            StepAction::CreateDisks(disks) => map.serialize_entry(CREATE_DISKS, disks)?,
            StepAction::CreateImages(images) => map.serialize_entry(CREATE_IMAGES, images)?,
            StepAction::IncludeWorkflow(include) => {
                map.serialize_entry(INCLUDE_WORKFLOW, include)?
            }
            StepAction::Other => {}
        }
        map.end()
    }
}
