use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::graph::DiGraph;
use crate::domain::resolve::CallMap;

pub mod csv_exporter;
pub mod html_exporter;

/// The external static-analysis collaborator: given a corpus root and the
/// analyzed files, return the raw caller -> callees map (package-qualified
/// FQNs, external references included), or fail. Failure aborts the whole
/// graph run before any artifact is written.
pub trait CallGraphOracle {
    fn call_map(&self, corpus_root: &Path, files: &[PathBuf]) -> Result<CallMap>;
}

/// Renders a plain node/edge graph to an artifact on disk. The renderer
/// sees nothing beyond nodes with display metadata and directed edges.
pub trait GraphExporter {
    fn export(&self, graph: &DiGraph, title: &str, path: &Path) -> Result<()>;
}
