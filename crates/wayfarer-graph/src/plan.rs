//! Validated deployment plans
//!
//! A [`DeploymentPlan`] can only be produced by
//! [`GraphBuilder::validate`](crate::builder::GraphBuilder::validate). It is
//! immutable and already ordered:
//! resources appear in creation order and are grouped into waves of
//! mutually independent resources.

use crate::output::Output;
use crate::resource::{urn, Properties};
use crate::types::{GraphId, ResourceId, ResourceKind};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// One resource inside a plan
#[derive(Debug, Clone)]
pub struct PlannedResource {
    pub(crate) id: ResourceId,
    pub(crate) kind: ResourceKind,
    pub(crate) name: String,
    pub(crate) properties: Properties,
    pub(crate) declared: Vec<ResourceId>,
    pub(crate) implicit: BTreeSet<ResourceId>,
}

impl PlannedResource {
    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn urn(&self) -> String {
        urn(self.kind, &self.name)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Explicit `depends_on` edges, in declaration order
    pub fn declared_dependencies(&self) -> &[ResourceId] {
        &self.declared
    }

    /// Producers of deferred inputs
    pub fn implicit_dependencies(&self) -> &BTreeSet<ResourceId> {
        &self.implicit
    }

    /// Every resource that must exist first
    pub fn dependencies(&self) -> BTreeSet<ResourceId> {
        self.declared.iter().copied().chain(self.implicit.iter().copied()).collect()
    }
}

/// An immutable, ordered deployment graph
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    graph_id: GraphId,
    resources: Vec<PlannedResource>,
    index: HashMap<ResourceId, usize>,
    waves: Vec<Vec<ResourceId>>,
    edge_count: usize,
    exports: IndexMap<String, Output<String>>,
}

impl DeploymentPlan {
    pub(crate) fn new(
        graph_id: GraphId,
        resources: Vec<PlannedResource>,
        waves: Vec<Vec<ResourceId>>,
        edge_count: usize,
        exports: IndexMap<String, Output<String>>,
    ) -> Self {
        let index = resources.iter().enumerate().map(|(i, r)| (r.id, i)).collect();
        Self {
            graph_id,
            resources,
            index,
            waves,
            edge_count,
            exports,
        }
    }

    pub fn graph_id(&self) -> GraphId {
        self.graph_id
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Resources in creation order
    pub fn resources(&self) -> &[PlannedResource] {
        &self.resources
    }

    pub fn get(&self, id: ResourceId) -> Option<&PlannedResource> {
        self.index.get(&id).map(|&i| &self.resources[i])
    }

    /// Position in creation order
    pub fn position(&self, id: ResourceId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Find a resource by kind and logical name
    pub fn find(&self, kind: ResourceKind, name: &str) -> Option<&PlannedResource> {
        self.resources.iter().find(|r| r.kind == kind && r.name == name)
    }

    /// All resources of one kind
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &PlannedResource> + '_ {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    /// Explicit dependencies of `id`; empty if the id is unknown
    pub fn declared_dependencies(&self, id: ResourceId) -> &[ResourceId] {
        self.get(id)
            .map(PlannedResource::declared_dependencies)
            .unwrap_or(&[])
    }

    /// Explicit and implicit dependencies of `id`
    pub fn dependencies(&self, id: ResourceId) -> BTreeSet<ResourceId> {
        self.get(id).map(PlannedResource::dependencies).unwrap_or_default()
    }

    /// Levels of mutually independent resources
    pub fn waves(&self) -> &[Vec<ResourceId>] {
        &self.waves
    }

    /// Named stack outputs
    pub fn exports(&self) -> &IndexMap<String, Output<String>> {
        &self.exports
    }

    /// Serializable rendering for `plan` output
    pub fn document(&self) -> PlanDocument {
        let urns: HashMap<ResourceId, String> =
            self.resources.iter().map(|r| (r.id, r.urn())).collect();
        let wave_of: HashMap<ResourceId, usize> = self
            .waves
            .iter()
            .enumerate()
            .flat_map(|(w, ids)| ids.iter().map(move |id| (*id, w)))
            .collect();

        let resources = self
            .resources
            .iter()
            .map(|r| PlanEntry {
                urn: r.urn(),
                kind: r.kind.as_str().to_string(),
                name: r.name.clone(),
                wave: wave_of.get(&r.id).copied().unwrap_or_default(),
                depends_on: r
                    .declared
                    .iter()
                    .filter_map(|id| urns.get(id).cloned())
                    .collect(),
                inputs_from: r
                    .implicit
                    .iter()
                    .filter_map(|id| urns.get(id).cloned())
                    .collect(),
                properties: r.properties.render(),
            })
            .collect();

        let outputs = self
            .exports
            .iter()
            .map(|(name, out)| (name.clone(), format!("${{{}}}", out.label())))
            .collect();

        PlanDocument {
            graph_id: self.graph_id,
            waves: self.waves.len(),
            resources,
            outputs,
        }
    }
}

/// Plan as rendered for humans and tooling
#[derive(Debug, Clone, Serialize)]
pub struct PlanDocument {
    pub graph_id: GraphId,
    pub waves: usize,
    pub resources: Vec<PlanEntry>,
    pub outputs: IndexMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub urn: String,
    pub kind: String,
    pub name: String,
    pub wave: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inputs_from: Vec<String>,
    pub properties: Value,
}

#[cfg(test)]
mod tests {
    use crate::builder::GraphBuilder;
    use crate::resource::{Properties, ResourceSpec};
    use crate::types::ResourceKind;
    use serde_json::json;

    const BUCKET: ResourceKind = ResourceKind::new("test:storage:Bucket");
    const SITE: ResourceKind = ResourceKind::new("test:web:Site");

    #[test]
    fn test_document_renders_placeholders_and_edges() {
        let mut builder = GraphBuilder::new();
        let bucket = builder.register(ResourceSpec::new(BUCKET, "assets")).unwrap();
        let site = builder
            .register(
                ResourceSpec::new(SITE, "site").with_properties(
                    Properties::new()
                        .set("origin", bucket.output::<String>("url"))
                        .set("https", true),
                ),
            )
            .unwrap();
        builder.export("url", site.output("url")).unwrap();

        let doc = builder.validate().unwrap().document();
        assert_eq!(doc.waves, 2);
        assert_eq!(doc.resources[1].inputs_from, vec!["test:storage:Bucket::assets"]);
        assert_eq!(
            doc.resources[1].properties,
            json!({"origin": "${assets.url}", "https": true})
        );
        assert_eq!(doc.outputs["url"], "${site.url}");
    }

    #[test]
    fn test_find_and_position() {
        let mut builder = GraphBuilder::new();
        let a = builder.register(ResourceSpec::new(BUCKET, "a")).unwrap();
        let b = builder
            .register(ResourceSpec::new(SITE, "b").depends_on(&a))
            .unwrap();

        let plan = builder.validate().unwrap();
        assert_eq!(plan.find(SITE, "b").map(|r| r.id()), Some(b.id()));
        assert!(plan.find(SITE, "a").is_none());
        assert!(plan.position(a.id()) < plan.position(b.id()));
        assert_eq!(plan.declared_dependencies(b.id()), &[a.id()]);
        assert_eq!(plan.of_kind(BUCKET).count(), 1);
    }
}
