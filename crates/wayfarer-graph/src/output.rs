//! Deferred values
//!
//! An [`Output`] is a value that only exists once the resources producing it
//! have been created. It carries the set of producers, so any resource that
//! consumes it is ordered after them, and a resolver that computes the value
//! from a [`DeploymentState`]. Pure transforms are lifted with [`Output::map`].

use crate::error::ResolveError;
use crate::resource::ResourceRef;
use crate::state::DeploymentState;
use crate::types::ResourceId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

type Resolver<T> = Arc<dyn Fn(&DeploymentState) -> Result<T, ResolveError> + Send + Sync>;

/// A value resolved after its producing resources are provisioned
pub struct Output<T> {
    dependencies: BTreeSet<ResourceId>,
    label: String,
    resolver: Resolver<T>,
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self {
            dependencies: self.dependencies.clone(),
            label: self.label.clone(),
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl<T> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("label", &self.label)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

impl<T: Send + Sync + 'static> Output<T> {
    /// A value known at definition time
    pub fn known(value: T) -> Self
    where
        T: Clone + fmt::Debug,
    {
        Self {
            dependencies: BTreeSet::new(),
            label: format!("{value:?}"),
            resolver: Arc::new(move |_| Ok(value.clone())),
        }
    }

    /// An attribute reported for `resource` at a dotted `path`
    pub fn attribute(resource: &ResourceRef, path: &str) -> Self
    where
        T: DeserializeOwned,
    {
        let id = resource.id();
        let label = format!("{}.{}", resource.name(), path);
        let path = path.to_string();
        let resolver_label = label.clone();

        Self {
            dependencies: BTreeSet::from([id]),
            label,
            resolver: Arc::new(move |state| {
                if !state.contains(id) {
                    return Err(ResolveError::Pending {
                        label: resolver_label.clone(),
                    });
                }
                let value = state
                    .attribute(id, &path)
                    .ok_or_else(|| ResolveError::MissingAttribute {
                        label: resolver_label.clone(),
                    })?;
                serde_json::from_value(value.clone()).map_err(|e| ResolveError::TypeMismatch {
                    label: resolver_label.clone(),
                    reason: e.to_string(),
                })
            }),
        }
    }

    /// Human-readable description, used in plan documents
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Resources that must exist before this value resolves
    pub fn dependencies(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.dependencies.iter().copied()
    }

    /// True when no resource has to be created first
    pub fn is_known(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn resolve(&self, state: &DeploymentState) -> Result<T, ResolveError> {
        (self.resolver)(state)
    }

    /// Lift a pure transform over the deferred value
    pub fn map<U, F>(self, f: F) -> Output<U>
    where
        U: Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let resolver = self.resolver;
        Output {
            dependencies: self.dependencies,
            label: self.label,
            resolver: Arc::new(move |state| resolver(state).map(&f)),
        }
    }

    /// Combine two deferred values; resolves once both producers exist
    pub fn zip<U>(self, other: Output<U>) -> Output<(T, U)>
    where
        U: Send + Sync + 'static,
    {
        let left = self.resolver;
        let right = other.resolver;
        let mut dependencies = self.dependencies;
        dependencies.extend(other.dependencies);

        Output {
            dependencies,
            label: format!("({}, {})", self.label, other.label),
            resolver: Arc::new(move |state| Ok((left(state)?, right(state)?))),
        }
    }

    /// Keep the value but also order consumers after `resource`
    #[must_use]
    pub fn after(mut self, resource: &ResourceRef) -> Self {
        self.dependencies.insert(resource.id());
        self
    }

    /// Erase the type into JSON for use as a resource input
    pub fn into_json(self) -> Output<Value>
    where
        T: Serialize,
    {
        let resolver = self.resolver;
        let label = self.label.clone();
        Output {
            dependencies: self.dependencies,
            label: self.label,
            resolver: Arc::new(move |state| {
                let value = resolver(state)?;
                serde_json::to_value(value).map_err(|e| ResolveError::TypeMismatch {
                    label: label.clone(),
                    reason: e.to_string(),
                })
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::resource::ResourceSpec;
    use crate::types::ResourceKind;
    use serde_json::json;

    const BUCKET: ResourceKind = ResourceKind::new("test:storage:Bucket");

    fn bucket(builder: &mut GraphBuilder, name: &str) -> ResourceRef {
        builder
            .register(ResourceSpec::new(BUCKET, name))
            .expect("bucket registers")
    }

    #[test]
    fn test_known_output_resolves_without_state() {
        let out = Output::known("static".to_string());
        assert!(out.is_known());
        assert_eq!(out.resolve(&DeploymentState::new()).unwrap(), "static");
    }

    #[test]
    fn test_attribute_is_pending_until_created() {
        let mut builder = GraphBuilder::new();
        let b = bucket(&mut builder, "assets");
        let url: Output<String> = b.output("url");

        let err = url.resolve(&DeploymentState::new()).unwrap_err();
        assert!(matches!(err, ResolveError::Pending { .. }));

        let mut state = DeploymentState::new();
        state.insert(b.id(), json!({"url": "https://assets/"}));
        assert_eq!(url.resolve(&state).unwrap(), "https://assets/");
    }

    #[test]
    fn test_missing_and_mistyped_attributes() {
        let mut builder = GraphBuilder::new();
        let b = bucket(&mut builder, "assets");
        let mut state = DeploymentState::new();
        state.insert(b.id(), json!({"port": 443}));

        let missing: Output<String> = b.output("url");
        assert!(matches!(
            missing.resolve(&state),
            Err(ResolveError::MissingAttribute { .. })
        ));

        let mistyped: Output<String> = b.output("port");
        assert!(matches!(
            mistyped.resolve(&state),
            Err(ResolveError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_map_keeps_dependencies() {
        let mut builder = GraphBuilder::new();
        let b = bucket(&mut builder, "assets");
        let upper = b.output::<String>("name").map(|s| s.to_uppercase());

        assert_eq!(upper.dependencies().collect::<Vec<_>>(), vec![b.id()]);

        let mut state = DeploymentState::new();
        state.insert(b.id(), json!({"name": "assets"}));
        assert_eq!(upper.resolve(&state).unwrap(), "ASSETS");
    }

    #[test]
    fn test_zip_and_after_union_dependencies() {
        let mut builder = GraphBuilder::new();
        let a = bucket(&mut builder, "a");
        let b = bucket(&mut builder, "b");
        let c = bucket(&mut builder, "c");

        let pair = a.output::<String>("name").zip(b.output::<String>("name")).after(&c);
        let deps: Vec<_> = pair.dependencies().collect();
        assert_eq!(deps, vec![a.id(), b.id(), c.id()]);

        let mut state = DeploymentState::new();
        state.insert(a.id(), json!({"name": "a"}));
        state.insert(b.id(), json!({"name": "b"}));
        assert_eq!(pair.resolve(&state).unwrap(), ("a".to_string(), "b".to_string()));
    }
}
