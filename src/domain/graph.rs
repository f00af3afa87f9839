//! Directed Graph ADT
//!
//! Minimal node-map + edge-set storage for call relationships.
//! Nodes are keyed by FQN; at most one edge exists per ordered pair.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::unit::split_fqn;

/// Display metadata attached to a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    /// Short display name (last FQN segment).
    pub label: String,
    /// Owning module or class path (everything before the last segment).
    pub group: String,
}

impl NodeInfo {
    /// Derive display metadata from an FQN alone.
    pub fn from_fqn(fqn: &str) -> Self {
        let (group, name) = split_fqn(fqn);
        NodeInfo {
            label: name.to_string(),
            group: group.to_string(),
        }
    }
}

/// A directed graph with FQN-keyed nodes and deduplicated edges.
///
/// Insertion order is never part of the contract: anything exposed
/// downstream goes through `sorted_nodes` / `sorted_edges`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiGraph {
    nodes: HashMap<String, NodeInfo>,
    edges: HashSet<(String, String)>,
}

impl DiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. The first insertion wins; a later insertion with
    /// different metadata is reported as a conflict and ignored.
    /// Returns false only when a conflict was detected.
    pub fn add_node(&mut self, fqn: &str, info: NodeInfo) -> bool {
        match self.nodes.get(fqn) {
            None => {
                self.nodes.insert(fqn.to_string(), info);
                true
            }
            Some(existing) if *existing == info => true,
            Some(existing) => {
                eprintln!(
                    "[graph] WARN metadata conflict for {}: keeping label={} group={}, ignoring label={} group={}",
                    fqn, existing.label, existing.group, info.label, info.group
                );
                false
            }
        }
    }

    /// Insert a directed edge. Missing endpoints are created with metadata
    /// derived from their FQN; re-adding an existing edge is a no-op.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if !self.nodes.contains_key(from) {
            self.add_node(from, NodeInfo::from_fqn(from));
        }
        if !self.nodes.contains_key(to) {
            self.add_node(to, NodeInfo::from_fqn(to));
        }
        self.edges.insert((from.to_string(), to.to_string()));
    }

    pub fn has_node(&self, fqn: &str) -> bool {
        self.nodes.contains_key(fqn)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.contains(&(from.to_string(), to.to_string()))
    }

    pub fn node_info(&self, fqn: &str) -> Option<&NodeInfo> {
        self.nodes.get(fqn)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in arbitrary order (merging, counting).
    pub fn nodes(&self) -> impl Iterator<Item = (&String, &NodeInfo)> {
        self.nodes.iter()
    }

    /// Iterate edges in arbitrary order (merging, collapsing).
    pub fn edges(&self) -> impl Iterator<Item = &(String, String)> {
        self.edges.iter()
    }

    /// Nodes sorted by FQN, for deterministic rendering and comparison.
    pub fn sorted_nodes(&self) -> Vec<(&String, &NodeInfo)> {
        let mut nodes: Vec<_> = self.nodes.iter().collect();
        nodes.sort_by(|a, b| a.0.cmp(b.0));
        nodes
    }

    /// Edges sorted by (from, to), for deterministic rendering and comparison.
    pub fn sorted_edges(&self) -> Vec<&(String, String)> {
        let mut edges: Vec<_> = self.edges.iter().collect();
        edges.sort();
        edges
    }
}

/// Graphs produced for a single source file.
#[derive(Debug, Clone)]
pub struct FileGraph {
    /// File stem used to name per-file artifacts.
    pub stem: String,
    /// Package-qualified module FQN of the file.
    pub module: String,
    /// Function/method-level graph.
    pub functions: DiGraph,
    /// Class-level graph derived from `functions`.
    pub classes: DiGraph,
}
