//! Analysis usecases: the corpus-wide graph run and the per-file
//! signature catalogue.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::domain::class_graph::ClassGraphBuilder;
use crate::domain::function_graph::FunctionGraphBuilder;
use crate::domain::graph::{DiGraph, FileGraph};
use crate::domain::index::UnitIndex;
use crate::domain::merge::GraphMerger;
use crate::domain::resolve;
use crate::domain::signature::{format_signature, slice_lines};
use crate::domain::unit::FileUnits;
use crate::infrastructure::{CorpusLoader, PyUnitExtractor, SourceFile};
use crate::ports::csv_exporter::SignatureCsvExporter;
use crate::ports::html_exporter::HtmlExporter;
use crate::ports::{CallGraphOracle, GraphExporter};

/// Outcome summary of a graph run.
#[derive(Debug)]
pub struct AnalysisReport {
    pub files_analyzed: usize,
    pub files_failed: usize,
    pub function_nodes: usize,
    pub function_edges: usize,
    pub class_nodes: usize,
    pub class_edges: usize,
    pub artifacts: Vec<PathBuf>,
}

/// End-to-end graph generation over one corpus.
///
/// All graphs are built in memory before the export phase starts, so an
/// oracle failure aborts the run with nothing half-written.
pub struct AnalysisPipeline<'a> {
    pub config: &'a AnalysisConfig,
    pub oracle: &'a dyn CallGraphOracle,
}

impl<'a> AnalysisPipeline<'a> {
    pub fn run(&self) -> Result<AnalysisReport> {
        let config = self.config;
        fs::create_dir_all(&config.output_dir).with_context(|| {
            format!("Failed to create output directory {}", config.output_dir.display())
        })?;

        let sources = CorpusLoader::load(&config.corpus_root, &config.files)?;
        let (file_units, files_failed) = extract_all(&sources);
        let index = UnitIndex::build(&file_units);
        println!(
            "[extract] {} unit(s) across {} file(s)",
            index.len(),
            file_units.len()
        );

        let paths: Vec<PathBuf> = sources.iter().map(|src| src.path.clone()).collect();
        let raw = self.oracle.call_map(&config.corpus_root, &paths)?;
        let prefix = config.corpus_prefix()?;
        let resolved = resolve::filter_to_corpus(&raw, &prefix);

        let mut file_graphs = Vec::new();
        for file in &file_units {
            // Seeded nodes honor the same in-corpus test as edges.
            let seedable: Vec<_> = file
                .units
                .iter()
                .filter(|unit| resolve::in_corpus(&unit.fqn, &prefix))
                .cloned()
                .collect();
            let functions = FunctionGraphBuilder::build(&file.module, &seedable, &resolved);
            let classes = ClassGraphBuilder::build(&functions, &index);
            file_graphs.push(FileGraph {
                stem: file.stem.clone(),
                module: file.module.clone(),
                functions,
                classes,
            });
        }

        let combined_functions = GraphMerger::merge(file_graphs.iter().map(|fg| &fg.functions));
        let combined_classes = GraphMerger::merge(file_graphs.iter().map(|fg| &fg.classes));
        println!(
            "[graph] combined: {} function node(s) / {} edge(s), {} class node(s) / {} edge(s)",
            combined_functions.node_count(),
            combined_functions.edge_count(),
            combined_classes.node_count(),
            combined_classes.edge_count()
        );

        let artifacts = export_all(config, &file_graphs, &combined_functions, &combined_classes)?;

        Ok(AnalysisReport {
            files_analyzed: file_units.len(),
            files_failed,
            function_nodes: combined_functions.node_count(),
            function_edges: combined_functions.edge_count(),
            class_nodes: combined_classes.node_count(),
            class_edges: combined_classes.edge_count(),
            artifacts,
        })
    }
}

/// Extract units from every file, one rayon task per file.
/// A file that fails to parse is excluded, loudly: a silently missing
/// file yields an incomplete-but-plausible graph.
fn extract_all(sources: &[SourceFile]) -> (Vec<FileUnits>, usize) {
    let results: Vec<Result<FileUnits>> = sources
        .par_iter()
        .map(|src| {
            let mut extractor = PyUnitExtractor::new()?;
            let units =
                extractor.extract(&src.module, &src.path.display().to_string(), &src.content)?;
            Ok(FileUnits {
                stem: src.stem.clone(),
                module: src.module.clone(),
                units,
            })
        })
        .collect();

    let mut file_units = Vec::new();
    let mut failed = 0;
    for (src, result) in sources.iter().zip(results) {
        match result {
            Ok(units) => file_units.push(units),
            Err(e) => {
                eprintln!("[extract] ERROR {}: {:#}", src.path.display(), e);
                failed += 1;
            }
        }
    }
    (file_units, failed)
}

/// Write every non-empty graph page plus the index. A failed artifact is
/// reported and counted; independent artifacts are still attempted.
fn export_all(
    config: &AnalysisConfig,
    file_graphs: &[FileGraph],
    combined_functions: &DiGraph,
    combined_classes: &DiGraph,
) -> Result<Vec<PathBuf>> {
    let exporter = HtmlExporter;
    let mut jobs: Vec<(&DiGraph, String, String, bool)> = Vec::new();

    for fg in file_graphs {
        if !fg.functions.is_empty() {
            jobs.push((
                &fg.functions,
                format!("Function Call Graph: {}.py", fg.stem),
                format!("{}_function.html", fg.stem),
                true,
            ));
        }
        if !fg.classes.is_empty() {
            jobs.push((
                &fg.classes,
                format!("Class Call Graph: {}.py", fg.stem),
                format!("{}_class.html", fg.stem),
                false,
            ));
        }
    }
    if !combined_functions.is_empty() {
        jobs.push((
            combined_functions,
            "Combined Function Call Graph (All Files)".to_string(),
            "combined_function.html".to_string(),
            true,
        ));
    }
    if !combined_classes.is_empty() {
        jobs.push((
            combined_classes,
            "Combined Class Call Graph (All Files)".to_string(),
            "combined_class.html".to_string(),
            false,
        ));
    }

    let mut artifacts = Vec::new();
    let mut function_pages = Vec::new();
    let mut class_pages = Vec::new();
    let mut failures = 0;

    for (graph, title, name, is_function_level) in jobs {
        let path = config.output_dir.join(&name);
        match exporter.export(graph, &title, &path) {
            Ok(()) => {
                println!("[export] wrote {}", path.display());
                if is_function_level {
                    function_pages.push(name);
                } else {
                    class_pages.push(name);
                }
                artifacts.push(path);
            }
            Err(e) => {
                eprintln!("[export] ERROR {}: {:#}", path.display(), e);
                failures += 1;
            }
        }
    }

    let index_path = config.output_dir.join("index.html");
    match HtmlExporter::write_index(&function_pages, &class_pages, &index_path) {
        Ok(()) => {
            println!("[export] wrote {}", index_path.display());
            artifacts.push(index_path);
        }
        Err(e) => {
            eprintln!("[export] ERROR {}: {:#}", index_path.display(), e);
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{} artifact(s) failed to write", failures);
    }
    Ok(artifacts)
}

/// Export the signature/source catalogue for one file.
/// Runs file-by-file with no graph dependency.
pub fn export_signatures(source_path: &Path, csv_path: &Path) -> Result<()> {
    let content = fs::read_to_string(source_path)
        .with_context(|| format!("Failed to read source file {}", source_path.display()))?;
    let module = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "module".to_string());

    let mut extractor = PyUnitExtractor::new()?;
    let units = extractor.extract(&module, &source_path.display().to_string(), &content)?;

    let mut rows = Vec::new();
    for unit in units.iter().filter(|u| u.kind.is_callable()) {
        println!("{} lines in {}", unit.line_count(), unit.name);
        rows.push((
            format_signature(&unit.name, &unit.params),
            slice_lines(&content, unit.start_line, unit.end_line),
        ));
    }

    SignatureCsvExporter::write(&rows, csv_path)?;
    println!(
        "[extract] {} function(s) catalogued to {}",
        rows.len(),
        csv_path.display()
    );
    Ok(())
}
