//! Class Graph Builder
//!
//! Collapses a function-level graph to class granularity by owner lookup.
//! Calls between methods of the same class are invisible at this level.

use crate::domain::graph::{DiGraph, NodeInfo};
use crate::domain::index::UnitIndex;

pub struct ClassGraphBuilder;

impl ClassGraphBuilder {
    /// Derive the class-level graph from a function-level graph.
    ///
    /// A class node appears only when it owns a retained function node.
    /// Edges connect distinct owners of a caller/callee pair; self-loops
    /// are suppressed.
    pub fn build(functions: &DiGraph, index: &UnitIndex) -> DiGraph {
        let mut graph = DiGraph::new();

        // Pass 1: class nodes, one per owner of a retained function node.
        for (fqn, _) in functions.nodes() {
            if let Some(owner) = index.owner_of(fqn) {
                graph.add_node(&owner, NodeInfo::from_fqn(&owner));
            }
        }

        // Pass 2: aggregate edges between distinct owners.
        for (caller, callee) in functions.edges() {
            let src = match index.owner_of(caller) {
                Some(owner) => owner,
                None => continue,
            };
            let dst = match index.owner_of(callee) {
                Some(owner) => owner,
                None => continue,
            };
            if src == dst {
                continue;
            }
            graph.add_edge(&src, &dst);
        }

        graph
    }
}
