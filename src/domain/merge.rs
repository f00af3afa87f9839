//! Graph Merger
//!
//! Folds per-file graphs into one corpus-wide graph for the combined views.

use crate::domain::graph::DiGraph;

pub struct GraphMerger;

impl GraphMerger {
    /// Fold an ordered sequence of graphs into one.
    ///
    /// Node identity is the FQN, edge identity the ordered FQN pair, so the
    /// fold is idempotent (re-adding is a no-op) and the resulting sets do
    /// not depend on fold order. Metadata conflicts keep the first-seen
    /// value; the graph reports them as warnings.
    pub fn merge<'a, I>(graphs: I) -> DiGraph
    where
        I: IntoIterator<Item = &'a DiGraph>,
    {
        let mut merged = DiGraph::new();
        for graph in graphs {
            for (fqn, info) in graph.nodes() {
                merged.add_node(fqn, info.clone());
            }
            for (from, to) in graph.edges() {
                merged.add_edge(from, to);
            }
        }
        merged
    }
}
