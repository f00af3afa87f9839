/// Call-Graph Oracle Runner.
///
/// Invokes pycg as a subprocess against the corpus and reads its JSON
/// output back synchronously. The oracle's raw names are module-relative;
/// this adapter qualifies them with the package segment so the resolver
/// can stay a plain prefix filter.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::domain::resolve::CallMap;
use crate::infrastructure::corpus_loader::package_name;
use crate::ports::CallGraphOracle;

// ═══════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════

/// Production oracle backed by the pycg static analyzer.
pub struct PycgOracle {
    /// Where the oracle's raw JSON output lands.
    output_json: PathBuf,
}

impl PycgOracle {
    pub fn new(output_json: PathBuf) -> Self {
        Self { output_json }
    }
}

impl CallGraphOracle for PycgOracle {
    fn call_map(&self, corpus_root: &Path, files: &[PathBuf]) -> Result<CallMap> {
        check_oracle_available()?;

        println!("[oracle] Running pycg over {} file(s)", files.len());

        let spec = build_command_spec(corpus_root, &self.output_json, files);
        let status = Command::new(&spec.program)
            .args(&spec.args)
            .status()
            .context("Failed to execute pycg")?;

        if !status.success() {
            bail!("pycg exited with code {:?}; aborting the run", status.code());
        }
        if !self.output_json.exists() {
            bail!(
                "Expected oracle output was not created at: {}",
                self.output_json.display()
            );
        }

        let contents = fs::read_to_string(&self.output_json)
            .with_context(|| format!("Failed to read {}", self.output_json.display()))?;
        let raw: CallMap = serde_json::from_str(&contents)
            .context("Oracle output is not a valid caller->callees JSON map")?;

        let package = package_name(corpus_root)?;
        let roots = module_roots(corpus_root, files);
        let qualified = normalize_call_map(raw, &package, &roots);

        println!("[oracle] {} caller entries ingested", qualified.len());
        Ok(qualified)
    }
}

/// Describes the command that would be run for a given corpus.
/// Primarily for testing without executing pycg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

/// Build the pycg invocation (testable function).
pub fn build_command_spec(
    corpus_root: &Path,
    output_json: &Path,
    files: &[PathBuf],
) -> OracleCommandSpec {
    let mut args = vec![
        "--package".to_string(),
        corpus_root.display().to_string(),
        "-o".to_string(),
        output_json.display().to_string(),
    ];
    args.extend(files.iter().map(|f| f.display().to_string()));
    OracleCommandSpec {
        program: "pycg".to_string(),
        args,
    }
}

/// Qualify raw oracle names with the package segment.
///
/// A name already carrying the package prefix passes through; a name whose
/// first segment is a known corpus module root gets the prefix prepended;
/// anything else is an external reference and is left for the resolver to
/// drop.
pub fn normalize_call_map(
    raw: CallMap,
    package: &str,
    module_roots: &BTreeSet<String>,
) -> CallMap {
    let qualify = |name: &str| -> String {
        if name == package || name.starts_with(&format!("{}.", package)) {
            return name.to_string();
        }
        let first = name.split('.').next().unwrap_or(name);
        if module_roots.contains(first) {
            format!("{}.{}", package, name)
        } else {
            name.to_string()
        }
    };

    raw.iter()
        .map(|(caller, callees)| {
            (
                qualify(caller),
                callees.iter().map(|callee| qualify(callee)).collect(),
            )
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Internal Implementation
// ═══════════════════════════════════════════════════════════════════════════

/// First path components of the analyzed files relative to the corpus
/// root; these are the module roots the oracle reports names under.
fn module_roots(corpus_root: &Path, files: &[PathBuf]) -> BTreeSet<String> {
    let mut roots = BTreeSet::new();
    for file in files {
        let rel = file.strip_prefix(corpus_root).unwrap_or(file);
        let first = match rel.components().next() {
            Some(component) => component.as_os_str().to_string_lossy().to_string(),
            None => continue,
        };
        roots.insert(first.trim_end_matches(".py").to_string());
    }
    roots
}

/// Check that pycg is installed and runnable.
fn check_oracle_available() -> Result<()> {
    let check = Command::new("pycg").arg("--help").output();
    match check {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => {
            bail!("pycg found but returned error: {:?}", output.status.code());
        }
        Err(_) => {
            bail!("pycg not found in PATH. Install it with: pip install pycg");
        }
    }
}
