//! Signature Catalogue CSV Writer
//!
//! One row per catalogued function: normalized signature, verbatim source.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Fixed two-column header of the catalogue file.
pub const HEADER: &str = "function_signature,source_code";

pub struct SignatureCsvExporter;

impl SignatureCsvExporter {
    /// Write the catalogue as UTF-8 CSV.
    pub fn write(rows: &[(String, String)], path: &Path) -> Result<()> {
        fs::write(path, Self::to_csv(rows))
            .with_context(|| format!("Failed to write catalogue {}", path.display()))
    }

    pub fn to_csv(rows: &[(String, String)]) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for (signature, source) in rows {
            out.push_str(&quote_field(signature));
            out.push(',');
            out.push_str(&quote_field(source));
            out.push('\n');
        }
        out
    }
}

/// Quote a field per RFC 4180 when it contains a delimiter, a quote, or a
/// line break; embedded quotes are doubled.
fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
