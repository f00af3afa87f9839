// Program unit model for Callatlas.
// A unit is anything the extractor can name: a module, class, function, or method.

use serde::{Deserialize, Serialize};

/// Kind of program unit, as tagged by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    Module,
    Class,
    Function,
    Method,
}

impl UnitKind {
    /// Whether this unit can appear as a node in the function-level graph.
    pub fn is_callable(&self) -> bool {
        matches!(self, UnitKind::Function | UnitKind::Method)
    }
}

/// Declared parameters of a function definition, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterList {
    /// Positional parameter names.
    pub positional: Vec<String>,
    /// Name of the `*args`-style parameter, if any.
    pub vararg: Option<String>,
    /// Keyword-only parameter names (declared after `*` or `*args`).
    pub kwonly: Vec<String>,
    /// Name of the `**kwargs`-style parameter, if any.
    pub kwarg: Option<String>,
}

/// A named program unit with its location in the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramUnit {
    /// Fully-qualified dotted name; unique within one analysis run and
    /// used as the node identity in every graph.
    pub fqn: String,
    pub kind: UnitKind,
    /// Display name: the last path segment of the FQN.
    pub name: String,
    /// Owning group: every segment except the last, dot-joined (empty if none).
    pub group: String,
    /// Source file the unit was extracted from.
    pub file: String,
    /// First line of the definition, 1-indexed.
    pub start_line: usize,
    /// Last line of the deepest body statement, 1-indexed, inclusive.
    pub end_line: usize,
    /// Declared parameters (empty for classes).
    pub params: ParameterList,
}

impl ProgramUnit {
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// Every unit extracted from a single source file, in document order.
#[derive(Debug, Clone)]
pub struct FileUnits {
    /// File stem used to name per-file artifacts.
    pub stem: String,
    /// Package-qualified module FQN of the file.
    pub module: String,
    pub units: Vec<ProgramUnit>,
}

/// Split a dotted FQN into (group, display name).
pub fn split_fqn(fqn: &str) -> (&str, &str) {
    match fqn.rfind('.') {
        Some(idx) => (&fqn[..idx], &fqn[idx + 1..]),
        None => ("", fqn),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fqn_method() {
        assert_eq!(split_fqn("pkg.mod.Class.method"), ("pkg.mod.Class", "method"));
    }

    #[test]
    fn test_split_fqn_bare_name() {
        assert_eq!(split_fqn("main"), ("", "main"));
    }

    #[test]
    fn test_line_count_inclusive() {
        let unit = ProgramUnit {
            fqn: "pkg.mod.f".to_string(),
            kind: UnitKind::Function,
            name: "f".to_string(),
            group: "pkg.mod".to_string(),
            file: "mod.py".to_string(),
            start_line: 3,
            end_line: 7,
            params: ParameterList::default(),
        };
        assert_eq!(unit.line_count(), 5);
    }

    #[test]
    fn test_callable_kinds() {
        assert!(UnitKind::Function.is_callable());
        assert!(UnitKind::Method.is_callable());
        assert!(!UnitKind::Class.is_callable());
        assert!(!UnitKind::Module.is_callable());
    }
}
