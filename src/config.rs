//! Analysis configuration.
//!
//! The recognized surface: corpus root, analyzed files, output directory,
//! and the in-corpus name prefix. Loadable from a TOML file; CLI flags
//! override individual fields. One config value per run keeps independent
//! analyses free of shared mutable state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::infrastructure::corpus_loader::package_name;

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Root directory of the analyzed package.
    pub corpus_root: PathBuf,
    /// Explicit analysis targets; empty means every .py under the root.
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Artifact destination directory.
    pub output_dir: PathBuf,
    /// FQN prefix that marks a unit as in-corpus.
    /// Defaults to the corpus root's directory name.
    #[serde(default)]
    pub prefix: Option<String>,
}

impl AnalysisConfig {
    pub fn new(corpus_root: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            corpus_root,
            files: Vec::new(),
            output_dir,
            prefix: None,
        }
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// The effective in-corpus prefix for this run.
    pub fn corpus_prefix(&self) -> Result<String> {
        match &self.prefix {
            Some(prefix) => Ok(prefix.clone()),
            None => package_name(&self.corpus_root),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: AnalysisConfig = toml::from_str(
            r#"
            corpus_root = "/corpus/pkg"
            output_dir = "/out"
            "#,
        )
        .unwrap();
        assert!(config.files.is_empty());
        assert!(config.prefix.is_none());
        assert_eq!(config.corpus_prefix().unwrap(), "pkg");
    }

    #[test]
    fn test_explicit_prefix_wins() {
        let config: AnalysisConfig = toml::from_str(
            r#"
            corpus_root = "/corpus/pkg"
            output_dir = "/out"
            prefix = "custom"
            files = ["/corpus/pkg/a.py"]
            "#,
        )
        .unwrap();
        assert_eq!(config.corpus_prefix().unwrap(), "custom");
        assert_eq!(config.files.len(), 1);
    }
}
