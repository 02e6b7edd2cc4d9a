//! Resource specifications and their inputs

use crate::error::ResolveError;
use crate::output::Output;
use crate::state::DeploymentState;
use crate::types::{ResourceId, ResourceKind};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A single resource input
#[derive(Debug, Clone)]
pub enum Input {
    /// Literal value known at definition time
    Value(Value),
    /// Value produced by another resource
    Deferred(Output<Value>),
    /// Nested object
    Object(Properties),
    /// List of inputs
    List(Vec<Input>),
}

impl Input {
    /// Collect producers of every deferred value inside this input
    pub fn collect_dependencies(&self, into: &mut BTreeSet<ResourceId>) {
        match self {
            Input::Value(_) => {}
            Input::Deferred(output) => into.extend(output.dependencies()),
            Input::Object(props) => props.collect_dependencies(into),
            Input::List(items) => items.iter().for_each(|i| i.collect_dependencies(into)),
        }
    }

    /// Resolve into plain JSON against the current state
    pub fn resolve(&self, state: &DeploymentState) -> Result<Value, ResolveError> {
        match self {
            Input::Value(v) => Ok(v.clone()),
            Input::Deferred(output) => output.resolve(state),
            Input::Object(props) => props.resolve(state),
            Input::List(items) => items
                .iter()
                .map(|i| i.resolve(state))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }

    /// JSON rendering with `${label}` placeholders for pending deferred values
    pub fn render(&self) -> Value {
        match self {
            Input::Value(v) => v.clone(),
            Input::Deferred(output) => output
                .is_known()
                .then(|| output.resolve(&DeploymentState::new()).ok())
                .flatten()
                .unwrap_or_else(|| Value::String(format!("${{{}}}", output.label()))),
            Input::Object(props) => props.render(),
            Input::List(items) => Value::Array(items.iter().map(Input::render).collect()),
        }
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::Value(value)
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Input::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Input::Value(Value::String(value))
    }
}

impl From<bool> for Input {
    fn from(value: bool) -> Self {
        Input::Value(Value::Bool(value))
    }
}

impl From<u16> for Input {
    fn from(value: u16) -> Self {
        Input::Value(Value::from(value))
    }
}

impl From<u32> for Input {
    fn from(value: u32) -> Self {
        Input::Value(Value::from(value))
    }
}

impl From<u64> for Input {
    fn from(value: u64) -> Self {
        Input::Value(Value::from(value))
    }
}

impl From<Vec<Input>> for Input {
    fn from(items: Vec<Input>) -> Self {
        Input::List(items)
    }
}

impl From<Properties> for Input {
    fn from(props: Properties) -> Self {
        Input::Object(props)
    }
}

impl<T: Serialize + Send + Sync + 'static> From<Output<T>> for Input {
    fn from(output: Output<T>) -> Self {
        Input::Deferred(output.into_json())
    }
}

/// A list of string literals
pub fn string_list<I, S>(items: I) -> Input
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Input::List(
        items
            .into_iter()
            .map(|s| Input::Value(Value::String(s.into())))
            .collect(),
    )
}

/// Insertion-ordered resource properties
#[derive(Debug, Clone, Default)]
pub struct Properties(IndexMap<String, Input>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Input>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Input>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Input> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Input)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn collect_dependencies(&self, into: &mut BTreeSet<ResourceId>) {
        for input in self.0.values() {
            input.collect_dependencies(into);
        }
    }

    /// Every resource some deferred input waits on
    pub fn dependencies(&self) -> BTreeSet<ResourceId> {
        let mut deps = BTreeSet::new();
        self.collect_dependencies(&mut deps);
        deps
    }

    pub fn resolve(&self, state: &DeploymentState) -> Result<Value, ResolveError> {
        let mut map = Map::with_capacity(self.0.len());
        for (key, input) in &self.0 {
            map.insert(key.clone(), input.resolve(state)?);
        }
        Ok(Value::Object(map))
    }

    pub fn render(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.render()))
                .collect(),
        )
    }
}

/// Declaration of one resource before registration
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub(crate) kind: ResourceKind,
    pub(crate) name: String,
    pub(crate) properties: Properties,
    pub(crate) depends_on: Vec<ResourceRef>,
}

impl ResourceSpec {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            properties: Properties::new(),
            depends_on: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Declare an explicit ordering dependency
    #[must_use]
    pub fn depends_on(mut self, resource: &ResourceRef) -> Self {
        self.depends_on.push(resource.clone());
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// Handle to a registered resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    id: ResourceId,
    kind: ResourceKind,
    name: String,
}

impl ResourceRef {
    pub(crate) fn new(id: ResourceId, kind: ResourceKind, name: String) -> Self {
        Self { id, kind, name }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `kind::name`, unique inside a graph
    pub fn urn(&self) -> String {
        urn(self.kind, &self.name)
    }

    /// Deferred attribute of this resource
    pub fn output<T>(&self, path: &str) -> Output<T>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Output::attribute(self, path)
    }

    /// Provider id, available after creation
    pub fn id_output(&self) -> Output<String> {
        self.output("id")
    }
}

pub(crate) fn urn(kind: ResourceKind, name: &str) -> String {
    format!("{kind}::{name}")
}

/// A resource with all inputs resolved, handed to the engine
#[derive(Debug, Clone)]
pub struct ResolvedResource {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub name: String,
    pub inputs: Value,
}

impl ResolvedResource {
    pub fn urn(&self) -> String {
        urn(self.kind, &self.name)
    }

    /// String input by top-level key
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.inputs.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_keeps_insertion_order_and_placeholders() {
        let props = Properties::new()
            .set("zeta", 1u32)
            .set("alpha", "a")
            .set("list", string_list(["x", "y"]));

        let rendered = props.render();
        let keys: Vec<_> = rendered.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "list"]);
        assert_eq!(rendered["list"], json!(["x", "y"]));
    }

    #[test]
    fn test_known_outputs_render_inline() {
        let host = Output::known("https://a.example/".to_string())
            .map(|u| u.replace("https://", ""));
        let props = Properties::new().set("host", host);

        assert_eq!(props.render(), json!({"host": "a.example/"}));
    }

    #[test]
    fn test_literal_properties_resolve_without_state() {
        let props = Properties::new()
            .set("enabled", true)
            .set("nested", Properties::new().set("port", 443u16));

        assert!(props.dependencies().is_empty());
        assert_eq!(
            props.resolve(&DeploymentState::new()).unwrap(),
            json!({"enabled": true, "nested": {"port": 443}})
        );
    }
}
