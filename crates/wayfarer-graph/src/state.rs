//! Attributes of resources created during a deployment run

use crate::types::ResourceId;
use serde_json::Value;
use std::collections::HashMap;

/// Attributes per created resource
///
/// Each entry is the resource's resolved inputs overlaid with whatever the
/// engine reported back (ids, host names, validation tokens).
#[derive(Debug, Clone, Default)]
pub struct DeploymentState {
    resources: HashMap<ResourceId, Value>,
}

impl DeploymentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a created resource
    pub fn insert(&mut self, id: ResourceId, attributes: Value) {
        self.resources.insert(id, attributes);
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.resources.contains_key(&id)
    }

    pub fn attributes(&self, id: ResourceId) -> Option<&Value> {
        self.resources.get(&id)
    }

    /// Look up a dotted attribute path, e.g. `primaryEndpoints.web`
    ///
    /// Numeric segments index into arrays.
    pub fn attribute(&self, id: ResourceId, path: &str) -> Option<&Value> {
        let mut current = self.resources.get(&id)?;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Overlay engine-reported attributes onto resolved inputs
pub(crate) fn merge_attributes(inputs: Value, reported: Value) -> Value {
    match (inputs, reported) {
        (Value::Object(mut base), Value::Object(extra)) => {
            for (key, value) in extra {
                base.insert(key, value);
            }
            Value::Object(base)
        }
        (inputs, Value::Null) => inputs,
        (_, reported) => reported,
    }
}
