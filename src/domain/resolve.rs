//! Edge Resolution
//!
//! Filters the oracle's raw call data down to in-corpus references.
//! This is a pure filter: unresolvable names never reach it, and both
//! graph levels consume only what survives here.

use std::collections::{BTreeMap, BTreeSet};

/// Caller FQN -> callee FQNs, as reported by the call-graph oracle.
pub type CallMap = BTreeMap<String, BTreeSet<String>>;

/// The in-corpus test shared by both graph levels: the FQN begins with
/// the recognized corpus prefix.
pub fn in_corpus(fqn: &str, prefix: &str) -> bool {
    fqn.starts_with(prefix)
}

/// Retain callers inside the corpus and, within those, only in-corpus
/// callees. Guarantee: no surviving edge has an endpoint that fails the
/// prefix test.
pub fn filter_to_corpus(raw: &CallMap, prefix: &str) -> CallMap {
    let mut kept = CallMap::new();
    for (caller, callees) in raw {
        if !in_corpus(caller, prefix) {
            continue;
        }
        let retained: BTreeSet<String> = callees
            .iter()
            .filter(|callee| in_corpus(callee, prefix))
            .cloned()
            .collect();
        // Callers with no surviving callees stay: they are still corpus
        // units and may seed isolated nodes downstream.
        kept.insert(caller.clone(), retained);
    }
    kept
}
