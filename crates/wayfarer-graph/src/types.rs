//! Identifiers for graphs, resources and resource kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of one resource graph (one deployment definition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphId(pub Uuid);

impl GraphId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

/// Resource identity, scoped to the graph that registered it
///
/// The sequence number is the registration index, so it is also a valid
/// topological position: a resource can only depend on lower sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    graph: GraphId,
    seq: u32,
}

impl ResourceId {
    pub(crate) fn new(graph: GraphId, seq: u32) -> Self {
        Self { graph, seq }
    }

    /// Graph this resource belongs to
    pub fn graph(&self) -> GraphId {
        self.graph
    }

    /// Registration index inside the graph
    pub fn sequence(&self) -> u32 {
        self.seq
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.seq)
    }
}

/// Provider type token, e.g. `azure-native:cdn:Route`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceKind(&'static str);

impl ResourceKind {
    pub const fn new(token: &'static str) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Last segment of the token (`Route` for `azure-native:cdn:Route`)
    pub fn short_name(&self) -> &'static str {
        self.0.rsplit(':').next().unwrap_or(self.0)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_short_name() {
        let kind = ResourceKind::new("azure-native:cdn:Route");
        assert_eq!(kind.short_name(), "Route");
        assert_eq!(ResourceKind::new("plain").short_name(), "plain");
    }

    #[test]
    fn test_resource_ids_order_by_sequence() {
        let graph = GraphId::new();
        let a = ResourceId::new(graph, 0);
        let b = ResourceId::new(graph, 1);
        assert!(a < b);
        assert_eq!(b.to_string(), "r1");
    }
}
