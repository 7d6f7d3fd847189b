//! structure.rs
//! Wraps an assembled relation list in a petgraph graph for traversal queries.

use super::edge::{Relation, RelationType};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Directed multigraph with one node per token index that appears in the
/// relation list. Parallel edges of different kinds are kept.
#[derive(Debug, Clone, Default)]
pub struct StructureGraph {
    graph: DiGraph<u32, RelationType>,
    nodes: HashMap<u32, NodeIndex>,
}

impl StructureGraph {
    pub fn new() -> Self { Self::default() }

    pub fn from_relations(relations: &[Relation]) -> Self {
        let mut structure = Self::new();
        for relation in relations {
            let from = structure.node(relation.from);
            let to = structure.node(relation.to);
            structure.graph.add_edge(from, to, relation.kind);
        }
        structure
    }

    fn node(&mut self, index: u32) -> NodeIndex {
        let graph = &mut self.graph;
        *self.nodes.entry(index).or_insert_with(|| graph.add_node(index))
    }

    pub fn node_count(&self) -> usize { self.graph.node_count() }
    pub fn edge_count(&self) -> usize { self.graph.edge_count() }

    /// Direct targets of `index` over edges whose kind is in `kinds`.
    pub fn successors(&self, index: u32, kinds: &[RelationType]) -> BTreeSet<u32> {
        let Some(&start) = self.nodes.get(&index) else {
            return BTreeSet::new();
        };
        self.graph
            .edges(start)
            .filter(|e| kinds.contains(e.weight()))
            .map(|e| self.graph[e.target()])
            .collect()
    }

    /// All token indices reachable from `index` (excluding itself unless on a
    /// cycle) following only edges whose kind is in `kinds`.
    pub fn reachable_from(&self, index: u32, kinds: &[RelationType]) -> BTreeSet<u32> {
        let Some(&start) = self.nodes.get(&index) else {
            return BTreeSet::new();
        };
        let mut visited = HashSet::new();
        let mut reached = BTreeSet::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            for edge in self.graph.edges(node).filter(|e| kinds.contains(e.weight())) {
                reached.insert(self.graph[edge.target()]);
                queue.push_back(edge.target());
            }
        }
        reached
    }
}
