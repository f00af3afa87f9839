use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// One source file scheduled for analysis.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// File stem used to name per-file artifacts.
    pub stem: String,
    /// Package-qualified module FQN ("pkg.sub.mod").
    pub module: String,
    pub content: String,
}

pub struct CorpusLoader;

impl CorpusLoader {
    /// Resolve the analyzed file set: the explicit list when given,
    /// otherwise every .py file under the corpus root.
    /// Results are sorted and deduplicated so the fold order downstream
    /// is stable.
    pub fn load(corpus_root: &Path, files: &[PathBuf]) -> Result<Vec<SourceFile>> {
        let package = package_name(corpus_root)?;

        let mut paths = if files.is_empty() {
            let mut collected = Vec::new();
            Self::collect_py_recursive(corpus_root, &mut collected)?;
            collected
        } else {
            files.to_vec()
        };
        paths.sort();
        paths.dedup();

        let mut sources = Vec::new();
        for path in paths {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read source file {}", path.display()))?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "module".to_string());
            let module = module_fqn(corpus_root, &package, &path);
            sources.push(SourceFile { path, stem, module, content });
        }

        println!(
            "[corpus] {} source file(s) under {}",
            sources.len(),
            corpus_root.display()
        );
        Ok(sources)
    }

    fn collect_py_recursive(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }
        let dir_name = dir.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if dir_name == "__pycache__" || dir_name.starts_with('.') {
            return Ok(());
        }

        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to list directory {}", dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                Self::collect_py_recursive(&path, out)?;
            } else if path.extension().map_or(false, |ext| ext == "py") {
                out.push(path);
            }
        }
        Ok(())
    }
}

/// The package segment every corpus FQN starts with: the corpus root's
/// directory name.
pub fn package_name(corpus_root: &Path) -> Result<String> {
    corpus_root
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .with_context(|| {
            format!(
                "Corpus root has no usable directory name: {}",
                corpus_root.display()
            )
        })
}

/// Derive the package-qualified module FQN for a file.
/// `pkg/sub/mod.py` becomes `pkg.sub.mod`; an `__init__.py` names its
/// package directory.
pub fn module_fqn(corpus_root: &Path, package: &str, path: &Path) -> String {
    let rel = path.strip_prefix(corpus_root).unwrap_or(path);
    let mut segments = vec![package.to_string()];
    let components: Vec<_> = rel.components().collect();
    for (idx, component) in components.iter().enumerate() {
        let part = component.as_os_str().to_string_lossy();
        if idx + 1 == components.len() {
            let stem = part.trim_end_matches(".py");
            if stem != "__init__" {
                segments.push(stem.to_string());
            }
        } else {
            segments.push(part.to_string());
        }
    }
    segments.join(".")
}
