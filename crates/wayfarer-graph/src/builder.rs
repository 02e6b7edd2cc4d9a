//! Graph Builder
//!
//! The construction-phase interface: resources are registered in dependency
//! order, every edge is checked as it is added, and `validate` freezes the
//! result into an immutable [`DeploymentPlan`].

use crate::dag::Dag;
use crate::error::GraphBuilderError;
use crate::output::Output;
use crate::plan::{DeploymentPlan, PlannedResource};
use crate::resource::{urn, ResourceRef, ResourceSpec};
use crate::types::{GraphId, ResourceId, ResourceKind};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Builder for deployment graphs
///
/// Usage:
/// ```rust
/// use wayfarer_graph::prelude::*;
///
/// const BUCKET: ResourceKind = ResourceKind::new("test:storage:Bucket");
/// const SITE: ResourceKind = ResourceKind::new("test:web:Site");
///
/// let mut builder = GraphBuilder::new();
/// let bucket = builder.register(ResourceSpec::new(BUCKET, "assets"))?;
/// let site = builder.register(
///     ResourceSpec::new(SITE, "site")
///         .with_properties(Properties::new().set("origin", bucket.output::<String>("url"))),
/// )?;
/// builder.export("url", site.output("url"))?;
///
/// let plan = builder.validate()?;
/// assert_eq!(plan.len(), 2);
/// # Ok::<(), GraphBuilderError>(())
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    graph_id: GraphId,
    resources: Vec<PlannedResource>,
    index: HashMap<ResourceId, usize>,
    names: HashSet<(ResourceKind, String)>,
    dag: Dag,
    exports: IndexMap<String, Output<String>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph_id: GraphId::new(),
            resources: Vec::new(),
            index: HashMap::new(),
            names: HashSet::new(),
            dag: Dag::new(),
            exports: IndexMap::new(),
        }
    }

    pub fn graph_id(&self) -> GraphId {
        self.graph_id
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn edge_count(&self) -> usize {
        self.dag.edge_count()
    }

    /// True if `id` was registered in this builder
    pub fn contains(&self, id: ResourceId) -> bool {
        id.graph() == self.graph_id && self.index.contains_key(&id)
    }

    /// Register a resource
    ///
    /// Every explicit dependency and every producer of a deferred input must
    /// already be registered in this graph, which makes registration order a
    /// valid creation order.
    pub fn register(&mut self, spec: ResourceSpec) -> Result<ResourceRef, GraphBuilderError> {
        let ResourceSpec {
            kind,
            name,
            properties,
            depends_on,
        } = spec;

        if self.names.contains(&(kind, name.clone())) {
            return Err(GraphBuilderError::DuplicateResource {
                kind: kind.to_string(),
                name,
            });
        }

        let resource_urn = urn(kind, &name);
        let declared: Vec<ResourceId> = depends_on.iter().map(ResourceRef::id).collect();
        for dep in &depends_on {
            self.check_dependency(&resource_urn, dep.id(), || dep.urn())?;
        }

        let implicit = properties.dependencies();
        for dep in &implicit {
            self.check_dependency(&resource_urn, *dep, || dep.to_string())?;
        }

        let seq = u32::try_from(self.resources.len()).unwrap_or(u32::MAX);
        let id = ResourceId::new(self.graph_id, seq);
        self.dag.add_node(id);

        let producers: BTreeSet<ResourceId> =
            declared.iter().copied().chain(implicit.iter().copied()).collect();
        for producer in &producers {
            self.dag.add_edge(*producer, id)?;
        }

        tracing::debug!(
            urn = %resource_urn,
            declared = declared.len(),
            implicit = implicit.len(),
            "registered resource"
        );

        self.index.insert(id, self.resources.len());
        self.names.insert((kind, name.clone()));
        self.resources.push(PlannedResource {
            id,
            kind,
            name: name.clone(),
            properties,
            declared,
            implicit,
        });

        Ok(ResourceRef::new(id, kind, name))
    }

    fn check_dependency(
        &self,
        resource: &str,
        dependency: ResourceId,
        describe: impl FnOnce() -> String,
    ) -> Result<(), GraphBuilderError> {
        if dependency.graph() != self.graph_id {
            return Err(GraphBuilderError::ForeignResource {
                resource: resource.to_string(),
                dependency: describe(),
            });
        }
        if !self.index.contains_key(&dependency) {
            return Err(GraphBuilderError::UnknownDependency {
                resource: resource.to_string(),
                dependency: describe(),
            });
        }
        Ok(())
    }

    /// Publish a named stack output
    pub fn export(
        &mut self,
        name: impl Into<String>,
        output: Output<String>,
    ) -> Result<(), GraphBuilderError> {
        let name = name.into();
        if self.exports.contains_key(&name) {
            return Err(GraphBuilderError::DuplicateExport(name));
        }
        for dep in output.dependencies() {
            self.check_dependency(&format!("export {name}"), dep, || dep.to_string())?;
        }
        self.exports.insert(name, output);
        Ok(())
    }

    /// Get a registered resource
    pub fn get(&self, id: ResourceId) -> Option<&PlannedResource> {
        self.index.get(&id).map(|&i| &self.resources[i])
    }

    /// Freeze the graph into a deployment plan
    ///
    /// Once validated, the graph cannot be modified.
    pub fn validate(self) -> Result<DeploymentPlan, GraphBuilderError> {
        let order = self.dag.topological_sort()?;
        let waves = self.dag.waves()?;
        let edge_count = self.dag.edge_count();

        let mut slots: Vec<Option<PlannedResource>> =
            self.resources.into_iter().map(Some).collect();
        let mut ordered = Vec::with_capacity(slots.len());
        for id in order {
            if let Some(resource) = self.index.get(&id).and_then(|&i| slots[i].take()) {
                ordered.push(resource);
            }
        }

        tracing::info!(
            graph = %self.graph_id.0,
            resources = ordered.len(),
            edges = edge_count,
            waves = waves.len(),
            "validated deployment graph"
        );

        Ok(DeploymentPlan::new(self.graph_id, ordered, waves, edge_count, self.exports))
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Properties;

    const BUCKET: ResourceKind = ResourceKind::new("test:storage:Bucket");
    const SITE: ResourceKind = ResourceKind::new("test:web:Site");

    #[test]
    fn test_builder_registers_resources() {
        let mut builder = GraphBuilder::new();

        let a = builder.register(ResourceSpec::new(BUCKET, "a")).unwrap();
        let b = builder.register(ResourceSpec::new(BUCKET, "b")).unwrap();

        assert_eq!(builder.resource_count(), 2);
        assert_ne!(a.id(), b.id());
        assert!(builder.contains(a.id()));
    }

    #[test]
    fn test_rejects_duplicate_names_per_kind() {
        let mut builder = GraphBuilder::new();
        builder.register(ResourceSpec::new(BUCKET, "a")).unwrap();

        assert!(matches!(
            builder.register(ResourceSpec::new(BUCKET, "a")),
            Err(GraphBuilderError::DuplicateResource { .. })
        ));
        // same name, different kind is fine
        assert!(builder.register(ResourceSpec::new(SITE, "a")).is_ok());
    }

    #[test]
    fn test_explicit_and_implicit_edges() {
        let mut builder = GraphBuilder::new();
        let a = builder.register(ResourceSpec::new(BUCKET, "a")).unwrap();
        let b = builder.register(ResourceSpec::new(BUCKET, "b")).unwrap();

        let site = builder
            .register(
                ResourceSpec::new(SITE, "site")
                    .with_properties(Properties::new().set("origin", a.output::<String>("url")))
                    .depends_on(&b),
            )
            .unwrap();

        assert_eq!(builder.edge_count(), 2);
        let planned = builder.get(site.id()).unwrap();
        assert_eq!(planned.declared_dependencies(), &[b.id()]);
        assert!(planned.implicit_dependencies().contains(&a.id()));
    }

    #[test]
    fn test_rejects_foreign_dependencies() {
        let mut other = GraphBuilder::new();
        let stranger = other.register(ResourceSpec::new(BUCKET, "stranger")).unwrap();

        let mut builder = GraphBuilder::new();
        let err = builder
            .register(ResourceSpec::new(SITE, "site").depends_on(&stranger))
            .unwrap_err();
        assert!(matches!(err, GraphBuilderError::ForeignResource { .. }));

        let err = builder
            .register(
                ResourceSpec::new(SITE, "site").with_properties(
                    Properties::new().set("origin", stranger.output::<String>("url")),
                ),
            )
            .unwrap_err();
        assert!(matches!(err, GraphBuilderError::ForeignResource { .. }));
        assert_eq!(builder.resource_count(), 0);
    }

    #[test]
    fn test_export_requires_registered_producers() {
        let mut other = GraphBuilder::new();
        let stranger = other.register(ResourceSpec::new(BUCKET, "stranger")).unwrap();

        let mut builder = GraphBuilder::new();
        assert!(builder.export("url", stranger.output("url")).is_err());

        let site = builder.register(ResourceSpec::new(SITE, "site")).unwrap();
        builder.export("url", site.output("url")).unwrap();
        assert!(matches!(
            builder.export("url", site.output("url")),
            Err(GraphBuilderError::DuplicateExport(_))
        ));
    }

    #[test]
    fn test_validate_produces_plan() {
        let mut builder = GraphBuilder::new();
        let a = builder.register(ResourceSpec::new(BUCKET, "a")).unwrap();
        builder
            .register(ResourceSpec::new(SITE, "site").depends_on(&a))
            .unwrap();

        let plan = builder.validate().unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.edge_count(), 1);
        assert_eq!(plan.waves().len(), 2);
    }
}
