// Signature strings and verbatim source slices for the function catalogue.

use crate::domain::unit::ParameterList;

/// Render a human-readable signature string:
/// `name(p1, p2, *varpos, k1=?, k2=?, **varkw)`.
///
/// Positional names come first in declaration order, the variadic
/// positional carries a `*` marker, keyword-only names carry the `=?`
/// assignable marker, and the variadic keyword carries `**`.
pub fn format_signature(name: &str, params: &ParameterList) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.extend(params.positional.iter().cloned());
    if let Some(vararg) = &params.vararg {
        parts.push(format!("*{}", vararg));
    }
    for kwonly in &params.kwonly {
        parts.push(format!("{}=?", kwonly));
    }
    if let Some(kwarg) = &params.kwarg {
        parts.push(format!("**{}", kwarg));
    }
    format!("{}({})", name, parts.join(", "))
}

/// Slice the literal lines [start, end] (1-indexed, inclusive) out of a
/// source text. Original line breaks are preserved; nothing is
/// re-indented.
pub fn slice_lines(source: &str, start: usize, end: usize) -> String {
    source
        .split_inclusive('\n')
        .skip(start.saturating_sub(1))
        .take(end.saturating_sub(start) + 1)
        .collect()
}
