//! Function Graph Builder
//!
//! Turns resolved call edges into a per-file graph at function/method
//! granularity.

use crate::domain::graph::{DiGraph, NodeInfo};
use crate::domain::resolve::CallMap;
use crate::domain::unit::ProgramUnit;

pub struct FunctionGraphBuilder;

impl FunctionGraphBuilder {
    /// Build the function-level graph for one module.
    ///
    /// Every extracted callable unit is seeded as a node first, so a unit
    /// with zero calls in or out still appears as an isolated node. Edges
    /// come from the resolved call map, restricted to callers belonging to
    /// this module; endpoints the extractor never saw get metadata
    /// synthesized from their FQN.
    pub fn build(module: &str, units: &[ProgramUnit], calls: &CallMap) -> DiGraph {
        let mut graph = DiGraph::new();

        for unit in units {
            if unit.kind.is_callable() {
                graph.add_node(
                    &unit.fqn,
                    NodeInfo {
                        label: unit.name.clone(),
                        group: unit.group.clone(),
                    },
                );
            }
        }

        for (caller, callees) in calls {
            if !Self::belongs_to(caller, module) {
                continue;
            }
            graph.add_node(caller, NodeInfo::from_fqn(caller));
            for callee in callees {
                graph.add_node(callee, NodeInfo::from_fqn(callee));
                graph.add_edge(caller, callee);
            }
        }

        graph
    }

    /// A caller belongs to a module when it is the module itself or lives
    /// under it (next character after the module prefix is a dot).
    fn belongs_to(caller: &str, module: &str) -> bool {
        caller == module
            || (caller.starts_with(module) && caller[module.len()..].starts_with('.'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::unit::{ParameterList, UnitKind};
    use std::collections::BTreeSet;

    fn unit(fqn: &str, kind: UnitKind) -> ProgramUnit {
        let (group, name) = crate::domain::unit::split_fqn(fqn);
        ProgramUnit {
            fqn: fqn.to_string(),
            kind,
            name: name.to_string(),
            group: group.to_string(),
            file: "mod.py".to_string(),
            start_line: 1,
            end_line: 1,
            params: ParameterList::default(),
        }
    }

    fn calls(entries: &[(&str, &[&str])]) -> CallMap {
        entries
            .iter()
            .map(|(caller, callees)| {
                (
                    caller.to_string(),
                    callees.iter().map(|c| c.to_string()).collect::<BTreeSet<_>>(),
                )
            })
            .collect()
    }

    #[test]
    fn test_isolated_unit_still_appears() {
        let units = vec![unit("pkg.mod.lonely", UnitKind::Function)];
        let graph = FunctionGraphBuilder::build("pkg.mod", &units, &CallMap::new());
        assert!(graph.has_node("pkg.mod.lonely"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_edges_restricted_to_own_module() {
        let units = vec![unit("pkg.a.f", UnitKind::Function)];
        let map = calls(&[
            ("pkg.a.f", &["pkg.b.g"]),
            ("pkg.b.g", &["pkg.a.f"]),
        ]);
        let graph = FunctionGraphBuilder::build("pkg.a", &units, &map);
        assert!(graph.has_edge("pkg.a.f", "pkg.b.g"));
        assert!(!graph.has_edge("pkg.b.g", "pkg.a.f"));
    }

    #[test]
    fn test_module_prefix_is_segment_aware() {
        // "pkg.ab" must not claim callers from "pkg.abc".
        assert!(!FunctionGraphBuilder::belongs_to("pkg.abc.f", "pkg.ab"));
        assert!(FunctionGraphBuilder::belongs_to("pkg.ab.f", "pkg.ab"));
        assert!(FunctionGraphBuilder::belongs_to("pkg.ab", "pkg.ab"));
    }

    #[test]
    fn test_synthesized_metadata_matches_seeded() {
        let units = vec![unit("pkg.mod.C.m", UnitKind::Method)];
        let map = calls(&[("pkg.mod.C.m", &["pkg.mod.f"])]);
        let graph = FunctionGraphBuilder::build("pkg.mod", &units, &map);
        let seeded = graph.node_info("pkg.mod.C.m").unwrap();
        assert_eq!(seeded.label, "m");
        assert_eq!(seeded.group, "pkg.mod.C");
        let synthesized = graph.node_info("pkg.mod.f").unwrap();
        assert_eq!(synthesized.label, "f");
        assert_eq!(synthesized.group, "pkg.mod");
    }
}
