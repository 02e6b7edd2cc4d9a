use crate::error::GraphBuilderError;
use crate::types::ResourceId;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

/// Dependency DAG, edges point from producer to consumer
#[derive(Debug, Clone, Default)]
pub struct Dag {
    inner: DiGraphMap<ResourceId, ()>,
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: ResourceId) {
        self.inner.add_node(id);
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.inner.contains_node(id)
    }

    pub fn add_edge(&mut self, from: ResourceId, to: ResourceId) -> Result<(), GraphBuilderError> {
        if from == to {
            return Err(GraphBuilderError::SelfLoop(from));
        }

        self.inner.add_node(from);
        self.inner.add_node(to);
        self.inner.add_edge(from, to, ());

        if petgraph::algo::is_cyclic_directed(&self.inner) {
            self.inner.remove_edge(from, to);
            return Err(GraphBuilderError::WouldCreateCycle { from, to });
        }

        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Direct producers of `id`
    pub fn predecessors(&self, id: ResourceId) -> Vec<ResourceId> {
        let mut preds: Vec<_> = self
            .inner
            .neighbors_directed(id, Direction::Incoming)
            .collect();
        preds.sort();
        preds
    }

    /// Topological order, ties broken by registration sequence
    pub fn topological_sort(&self) -> Result<Vec<ResourceId>, GraphBuilderError> {
        toposort(&self.inner, None).map_err(|cycle| {
            let node = cycle.node_id();
            GraphBuilderError::WouldCreateCycle { from: node, to: node }
        })?;

        let mut indegree: HashMap<ResourceId, usize> = self
            .inner
            .nodes()
            .map(|n| (n, self.inner.neighbors_directed(n, Direction::Incoming).count()))
            .collect();
        let mut ready: BTreeSet<ResourceId> = indegree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(n, _)| *n)
            .collect();

        let mut order = Vec::with_capacity(indegree.len());
        while let Some(next) = ready.pop_first() {
            order.push(next);
            for succ in self.inner.neighbors_directed(next, Direction::Outgoing) {
                if let Some(d) = indegree.get_mut(&succ) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(succ);
                    }
                }
            }
        }
        Ok(order)
    }

    /// Group nodes into levels; nodes in one level are mutually independent
    pub fn waves(&self) -> Result<Vec<Vec<ResourceId>>, GraphBuilderError> {
        let order = self.topological_sort()?;
        let mut level: HashMap<ResourceId, usize> = HashMap::with_capacity(order.len());
        let mut waves: Vec<Vec<ResourceId>> = Vec::new();

        for id in order {
            let depth = self
                .predecessors(id)
                .iter()
                .filter_map(|p| level.get(p))
                .map(|l| l + 1)
                .max()
                .unwrap_or(0);
            level.insert(id, depth);
            if waves.len() <= depth {
                waves.resize_with(depth + 1, Vec::new);
            }
            waves[depth].push(id);
        }

        Ok(waves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GraphId;

    fn ids(n: u32) -> Vec<ResourceId> {
        let graph = GraphId::new();
        (0..n).map(|i| ResourceId::new(graph, i)).collect()
    }

    #[test]
    fn test_rejects_self_loop() {
        let mut dag = Dag::new();
        let n = ids(1);
        assert_eq!(dag.add_edge(n[0], n[0]), Err(GraphBuilderError::SelfLoop(n[0])));
    }

    #[test]
    fn test_rejects_cycle_and_rolls_back() {
        let mut dag = Dag::new();
        let n = ids(3);
        dag.add_edge(n[0], n[1]).unwrap();
        dag.add_edge(n[1], n[2]).unwrap();

        assert!(matches!(
            dag.add_edge(n[2], n[0]),
            Err(GraphBuilderError::WouldCreateCycle { .. })
        ));
        assert_eq!(dag.edge_count(), 2);
    }

    #[test]
    fn test_waves_group_independent_nodes() {
        let mut dag = Dag::new();
        let n = ids(4);
        // 0 -> 2, 1 -> 2, 2 -> 3
        dag.add_edge(n[0], n[2]).unwrap();
        dag.add_edge(n[1], n[2]).unwrap();
        dag.add_edge(n[2], n[3]).unwrap();

        let waves = dag.waves().unwrap();
        assert_eq!(waves, vec![vec![n[0], n[1]], vec![n[2]], vec![n[3]]]);
    }

    #[test]
    fn test_topological_sort_respects_backward_edges() {
        let mut dag = Dag::new();
        let n = ids(3);
        // registered out of order: 2 must come before 0
        dag.add_edge(n[2], n[0]).unwrap();
        dag.add_node(n[1]);

        assert_eq!(dag.topological_sort().unwrap(), vec![n[1], n[2], n[0]]);
    }
}
