use dashmap::DashMap;
use rayon::prelude::*;

use crate::domain::unit::{split_fqn, FileUnits, UnitKind};

/// Thread-safe index of every unit extracted in a run, keyed by FQN.
/// Built in parallel, one task per file; read-only afterwards.
pub struct UnitIndex {
    kinds: DashMap<String, UnitKind>,
}

impl Default for UnitIndex {
    fn default() -> Self {
        Self { kinds: DashMap::new() }
    }
}

impl UnitIndex {
    /// Build the index from per-file extraction results.
    pub fn build(files: &[FileUnits]) -> Self {
        let index = UnitIndex::default();

        files.par_iter().for_each(|file| {
            for unit in &file.units {
                index.insert(&unit.fqn, unit.kind);
            }
        });

        index
    }

    pub fn insert(&self, fqn: &str, kind: UnitKind) {
        self.kinds.insert(fqn.to_string(), kind);
    }

    pub fn kind_of(&self, fqn: &str) -> Option<UnitKind> {
        self.kinds.get(fqn).map(|entry| *entry)
    }

    /// The class-level owner of a callable, if it has one.
    ///
    /// Extracted units use their kind tag: only methods are owned, and the
    /// owner is the FQN minus its last segment. Names the extractor never
    /// saw (lambdas, dynamically reported attributes) fall back to the
    /// segment heuristic: three or more dotted segments imply an owner.
    pub fn owner_of(&self, fqn: &str) -> Option<String> {
        match self.kind_of(fqn) {
            Some(UnitKind::Method) => {
                let (group, _) = split_fqn(fqn);
                Some(group.to_string())
            }
            Some(_) => None,
            None => {
                if fqn.matches('.').count() >= 2 {
                    let (group, _) = split_fqn(fqn);
                    Some(group.to_string())
                } else {
                    None
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_owner_is_enclosing_class() {
        let index = UnitIndex::default();
        index.insert("pkg.mod.C", UnitKind::Class);
        index.insert("pkg.mod.C.m", UnitKind::Method);
        assert_eq!(index.owner_of("pkg.mod.C.m"), Some("pkg.mod.C".to_string()));
    }

    #[test]
    fn test_module_level_function_has_no_owner() {
        let index = UnitIndex::default();
        index.insert("pkg.mod.f", UnitKind::Function);
        assert_eq!(index.owner_of("pkg.mod.f"), None);
    }

    #[test]
    fn test_kind_tag_beats_segment_counting() {
        // A deeply nested module-level function looks like a method by
        // segment count alone; the tag disambiguates.
        let index = UnitIndex::default();
        index.insert("pkg.sub.mod.helper", UnitKind::Function);
        assert_eq!(index.owner_of("pkg.sub.mod.helper"), None);
    }

    #[test]
    fn test_unknown_name_uses_segment_heuristic() {
        let index = UnitIndex::default();
        assert_eq!(index.owner_of("pkg.mod.C.lambda0"), Some("pkg.mod.C".to_string()));
        assert_eq!(index.owner_of("pkg.f"), None);
    }
}
