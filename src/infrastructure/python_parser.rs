/// Python Unit Extractor.
///
/// Parses one source file with tree-sitter and flattens its syntax tree
/// into ProgramUnit records: classes, functions, and methods, in document
/// order, each with its own FQN, parameter list, and 1-indexed inclusive
/// line span. Nested definitions are emitted independently.

use anyhow::{bail, Context, Result};
use tree_sitter::{Node, Parser};

use crate::domain::unit::{split_fqn, ParameterList, ProgramUnit, UnitKind};

pub struct PyUnitExtractor {
    parser: Parser,
}

/// One level of lexical nesting while walking a file.
struct ScopeEntry {
    name: String,
    is_class: bool,
}

impl PyUnitExtractor {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser
            .set_language(&language)
            .context("Failed to load the Python grammar")?;
        Ok(Self { parser })
    }

    /// Extract every unit defined in `source`.
    ///
    /// `module` is the package-qualified module FQN of the file; the file
    /// itself is emitted first as a Module unit so downstream owner lookups
    /// can tell deep module paths from class paths.
    pub fn extract(&mut self, module: &str, file: &str, source: &str) -> Result<Vec<ProgramUnit>> {
        let tree = self
            .parser
            .parse(source, None)
            .with_context(|| format!("Parser returned no tree for {}", file))?;
        let root = tree.root_node();
        if root.has_error() {
            bail!("Syntax error in {}: file skipped from analysis", file);
        }

        let mut units = Vec::new();
        let (group, name) = split_fqn(module);
        // The root node ends at column 0 of the next row when the file has
        // a trailing newline; clamp to the last real line.
        let end = root.end_position();
        let module_end = if end.column == 0 && end.row > 0 {
            end.row
        } else {
            end.row + 1
        };
        units.push(ProgramUnit {
            fqn: module.to_string(),
            kind: UnitKind::Module,
            name: name.to_string(),
            group: group.to_string(),
            file: file.to_string(),
            start_line: 1,
            end_line: module_end,
            params: ParameterList::default(),
        });

        let mut scope: Vec<ScopeEntry> = Vec::new();
        collect_units(root, source, file, module, &mut scope, &mut units)?;
        Ok(units)
    }
}

/// Walk a subtree, emitting definitions in document order (pre-order).
fn collect_units(
    node: Node,
    source: &str,
    file: &str,
    module: &str,
    scope: &mut Vec<ScopeEntry>,
    out: &mut Vec<ProgramUnit>,
) -> Result<()> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "function_definition" => visit_function(child, source, file, module, scope, out)?,
            "class_definition" => visit_class(child, source, file, module, scope, out)?,
            // Decorated definitions, conditionals, try blocks: recurse, the
            // definition node is found wherever it sits.
            _ => collect_units(child, source, file, module, scope, out)?,
        }
    }
    Ok(())
}

fn visit_function(
    node: Node,
    source: &str,
    file: &str,
    module: &str,
    scope: &mut Vec<ScopeEntry>,
    out: &mut Vec<ProgramUnit>,
) -> Result<()> {
    let name_node = match node.child_by_field_name("name") {
        Some(n) => n,
        None => return Ok(()),
    };
    let name = name_node.utf8_text(source.as_bytes())?.to_string();
    let group = scope_path(module, scope);
    let kind = if scope.last().map_or(false, |entry| entry.is_class) {
        UnitKind::Method
    } else {
        UnitKind::Function
    };
    let params = collect_params(node.child_by_field_name("parameters"), source)?;

    out.push(ProgramUnit {
        fqn: format!("{}.{}", group, name),
        kind,
        name: name.clone(),
        group,
        file: file.to_string(),
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        params,
    });

    // Nested definitions get their own units; their spans stay contained
    // within this one and nothing is deduplicated.
    scope.push(ScopeEntry { name, is_class: false });
    if let Some(body) = node.child_by_field_name("body") {
        collect_units(body, source, file, module, scope, out)?;
    }
    scope.pop();
    Ok(())
}

fn visit_class(
    node: Node,
    source: &str,
    file: &str,
    module: &str,
    scope: &mut Vec<ScopeEntry>,
    out: &mut Vec<ProgramUnit>,
) -> Result<()> {
    let name_node = match node.child_by_field_name("name") {
        Some(n) => n,
        None => return Ok(()),
    };
    let name = name_node.utf8_text(source.as_bytes())?.to_string();
    let group = scope_path(module, scope);

    out.push(ProgramUnit {
        fqn: format!("{}.{}", group, name),
        kind: UnitKind::Class,
        name: name.clone(),
        group,
        file: file.to_string(),
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        params: ParameterList::default(),
    });

    scope.push(ScopeEntry { name, is_class: true });
    if let Some(body) = node.child_by_field_name("body") {
        collect_units(body, source, file, module, scope, out)?;
    }
    scope.pop();
    Ok(())
}

fn scope_path(module: &str, scope: &[ScopeEntry]) -> String {
    let mut path = module.to_string();
    for entry in scope {
        path.push('.');
        path.push_str(&entry.name);
    }
    path
}

/// Read declared parameter names off a `parameters` node.
///
/// Anything declared after `*args` or a bare `*` is keyword-only.
fn collect_params(node: Option<Node>, source: &str) -> Result<ParameterList> {
    let mut params = ParameterList::default();
    let node = match node {
        Some(n) => n,
        None => return Ok(params),
    };

    let mut keyword_only = false;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                push_name(&mut params, keyword_only, child.utf8_text(source.as_bytes())?);
            }
            "typed_parameter" => {
                // `*args: T` and `**kw: T` nest their splat inside the
                // typed_parameter node.
                if let Some(inner) = child.named_child(0) {
                    match inner.kind() {
                        "identifier" => push_name(
                            &mut params,
                            keyword_only,
                            inner.utf8_text(source.as_bytes())?,
                        ),
                        "list_splat_pattern" => {
                            keyword_only = true;
                            params.vararg = splat_name(inner, source)?;
                        }
                        "dictionary_splat_pattern" => {
                            params.kwarg = splat_name(inner, source)?;
                        }
                        _ => {}
                    }
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name_node) = child.child_by_field_name("name") {
                    push_name(
                        &mut params,
                        keyword_only,
                        name_node.utf8_text(source.as_bytes())?,
                    );
                }
            }
            "list_splat_pattern" => {
                keyword_only = true;
                params.vararg = splat_name(child, source)?;
            }
            "dictionary_splat_pattern" => {
                params.kwarg = splat_name(child, source)?;
            }
            "keyword_separator" => {
                keyword_only = true;
            }
            // `/` positional-only marker contributes no name.
            _ => {}
        }
    }
    Ok(params)
}

fn splat_name(node: Node, source: &str) -> Result<Option<String>> {
    match node.named_child(0) {
        Some(inner) => Ok(Some(inner.utf8_text(source.as_bytes())?.to_string())),
        None => Ok(None),
    }
}

fn push_name(params: &mut ParameterList, keyword_only: bool, name: &str) {
    if keyword_only {
        params.kwonly.push(name.to_string());
    } else {
        params.positional.push(name.to_string());
    }
}
