// Command-line entry point for Callatlas.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use callatlas::application::{export_signatures, AnalysisPipeline};
use callatlas::config::AnalysisConfig;
use callatlas::infrastructure::{concurrency, PycgOracle};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate function- and class-level call graph maps for a corpus
    Graph {
        /// Root directory of the analyzed package
        #[arg(long)]
        corpus_root: Option<PathBuf>,

        /// Artifact destination directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Analysis target (repeatable); defaults to every .py under the root
        #[arg(short, long)]
        file: Vec<PathBuf>,

        /// In-corpus FQN prefix (defaults to the corpus directory name)
        #[arg(long)]
        prefix: Option<String>,

        /// TOML config supplying corpus_root / files / output_dir / prefix
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Extract function signatures and source bodies from one file to CSV
    Extract {
        /// Input source file path
        input: PathBuf,

        /// Output CSV path
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Graph { corpus_root, output_dir, file, prefix, config } => {
            run_graph(corpus_root, output_dir, file, prefix, config)
        }
        Commands::Extract { input, output } => export_signatures(&input, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run_graph(
    corpus_root: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    files: Vec<PathBuf>,
    prefix: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => AnalysisConfig::from_toml_file(path)?,
        None => match (&corpus_root, &output_dir) {
            (Some(root), Some(out)) => AnalysisConfig::new(root.clone(), out.clone()),
            _ => bail!("Provide --corpus-root and --output-dir, or a --config file"),
        },
    };

    // Flags override the config file.
    if let Some(root) = corpus_root {
        config.corpus_root = root;
    }
    if let Some(out) = output_dir {
        config.output_dir = out;
    }
    if !files.is_empty() {
        config.files = files;
    }
    if prefix.is_some() {
        config.prefix = prefix;
    }

    concurrency::init_thread_pool()?;

    let oracle = PycgOracle::new(config.output_dir.join("call_graph.json"));
    let pipeline = AnalysisPipeline { config: &config, oracle: &oracle };
    let report = pipeline.run()?;

    println!(
        "Analysis completed! {} file(s) analyzed ({} failed), {} function node(s) / {} edge(s), {} class node(s) / {} edge(s), artifacts in {}",
        report.files_analyzed,
        report.files_failed,
        report.function_nodes,
        report.function_edges,
        report.class_nodes,
        report.class_edges,
        config.output_dir.display()
    );
    Ok(())
}
