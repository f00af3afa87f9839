/// Graph Pipeline Verification Tests
///
/// Exercises the whole graph run against a temp-dir corpus with an
/// in-memory oracle, so no external analysis tools are required.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use callatlas::application::AnalysisPipeline;
use callatlas::config::AnalysisConfig;
use callatlas::domain::resolve::CallMap;
use callatlas::ports::CallGraphOracle;

struct FakeOracle {
    map: CallMap,
}

impl CallGraphOracle for FakeOracle {
    fn call_map(&self, _corpus_root: &Path, _files: &[PathBuf]) -> Result<CallMap> {
        Ok(self.map.clone())
    }
}

struct FailingOracle;

impl CallGraphOracle for FailingOracle {
    fn call_map(&self, _corpus_root: &Path, _files: &[PathBuf]) -> Result<CallMap> {
        anyhow::bail!("oracle exited with code 1")
    }
}

fn call_map(entries: &[(&str, &[&str])]) -> CallMap {
    entries
        .iter()
        .map(|(caller, callees)| {
            (
                caller.to_string(),
                callees
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<BTreeSet<_>>(),
            )
        })
        .collect()
}

/// Two-module corpus: pkg.a has a bare function and a class with two
/// methods, pkg.b has a second class.
fn write_corpus(root: &Path) {
    fs::create_dir_all(root).unwrap();
    fs::write(
        root.join("a.py"),
        "def f():\n    pass\n\nclass C:\n    def m(self):\n        f()\n\n    def m2(self):\n        self.m()\n",
    )
    .unwrap();
    fs::write(
        root.join("b.py"),
        "class D:\n    def n(self):\n        pass\n",
    )
    .unwrap();
}

fn corpus_calls() -> CallMap {
    call_map(&[
        ("pkg.a.f", &[]),
        ("pkg.a.C.m", &["pkg.a.f", "json.dumps"]),
        ("pkg.a.C.m2", &["pkg.a.C.m", "pkg.b.D.n"]),
        ("pkg.b.D.n", &["os.path.join"]),
    ])
}

#[test]
fn full_run_produces_expected_graphs_and_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("pkg");
    write_corpus(&root);
    let out = dir.path().join("out");

    let config = AnalysisConfig::new(root, out.clone());
    let oracle = FakeOracle { map: corpus_calls() };
    let pipeline = AnalysisPipeline { config: &config, oracle: &oracle };

    let report = pipeline.run().unwrap();
    assert_eq!(report.files_analyzed, 2);
    assert_eq!(report.files_failed, 0);

    // Function level: f, C.m, C.m2, D.n; three internal edges survive.
    assert_eq!(report.function_nodes, 4);
    assert_eq!(report.function_edges, 3);
    // Class level: C and D, with the single cross-class edge.
    assert_eq!(report.class_nodes, 2);
    assert_eq!(report.class_edges, 1);

    for artifact in [
        "a_function.html",
        "a_class.html",
        "b_function.html",
        "b_class.html",
        "combined_function.html",
        "combined_class.html",
        "index.html",
    ] {
        assert!(out.join(artifact).exists(), "missing artifact {}", artifact);
    }
}

#[test]
fn external_references_never_reach_the_rendered_graphs() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("pkg");
    write_corpus(&root);
    let out = dir.path().join("out");

    let config = AnalysisConfig::new(root, out.clone());
    let oracle = FakeOracle { map: corpus_calls() };
    AnalysisPipeline { config: &config, oracle: &oracle }
        .run()
        .unwrap();

    let html = fs::read_to_string(out.join("combined_function.html")).unwrap();
    assert!(html.contains("pkg.a.C.m"));
    assert!(!html.contains("json.dumps"));
    assert!(!html.contains("os.path.join"));
}

#[test]
fn class_graph_suppresses_same_class_and_unowned_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("pkg");
    write_corpus(&root);
    let out = dir.path().join("out");

    let config = AnalysisConfig::new(root, out.clone());
    let oracle = FakeOracle { map: corpus_calls() };
    let report = AnalysisPipeline { config: &config, oracle: &oracle }
        .run()
        .unwrap();

    // Of three function edges, only C.m2 -> D.n survives the collapse:
    // m -> f hits an unowned function, m2 -> m is a same-class call.
    assert_eq!(report.class_edges, 1);
    let html = fs::read_to_string(out.join("combined_class.html")).unwrap();
    assert!(html.contains("\"from\":\"pkg.a.C\""));
    assert!(html.contains("\"to\":\"pkg.b.D\""));
}

#[test]
fn isolated_units_still_appear_as_nodes() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("pkg");
    write_corpus(&root);
    let out = dir.path().join("out");

    // Oracle reports nothing at all; every extracted callable must still
    // show up as an isolated node.
    let config = AnalysisConfig::new(root, out.clone());
    let oracle = FakeOracle { map: CallMap::new() };
    let report = AnalysisPipeline { config: &config, oracle: &oracle }
        .run()
        .unwrap();

    assert_eq!(report.function_nodes, 4);
    assert_eq!(report.function_edges, 0);
    let html = fs::read_to_string(out.join("combined_function.html")).unwrap();
    assert!(html.contains("pkg.a.f"));
    assert!(html.contains("pkg.b.D.n"));
}

#[test]
fn oracle_failure_aborts_with_no_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("pkg");
    write_corpus(&root);
    let out = dir.path().join("out");

    let config = AnalysisConfig::new(root, out.clone());
    let pipeline = AnalysisPipeline { config: &config, oracle: &FailingOracle };

    assert!(pipeline.run().is_err());
    let html_files: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.path().extension().map_or(false, |ext| ext == "html")
        })
        .collect();
    assert!(html_files.is_empty(), "partial graph artifacts were written");
}

#[test]
fn parse_failure_excludes_file_but_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("pkg");
    write_corpus(&root);
    fs::write(root.join("broken.py"), "def broken(:\n").unwrap();
    let out = dir.path().join("out");

    let config = AnalysisConfig::new(root, out.clone());
    let oracle = FakeOracle { map: corpus_calls() };
    let report = AnalysisPipeline { config: &config, oracle: &oracle }
        .run()
        .unwrap();

    assert_eq!(report.files_analyzed, 2);
    assert_eq!(report.files_failed, 1);
    assert!(!out.join("broken_function.html").exists());
}

#[test]
fn repeated_runs_render_byte_identical_pages() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("pkg");
    write_corpus(&root);

    let render = |out: PathBuf| -> String {
        let config = AnalysisConfig::new(root.clone(), out.clone());
        let oracle = FakeOracle { map: corpus_calls() };
        AnalysisPipeline { config: &config, oracle: &oracle }
            .run()
            .unwrap();
        fs::read_to_string(out.join("combined_function.html")).unwrap()
    };

    let first = render(dir.path().join("out1"));
    let second = render(dir.path().join("out2"));
    assert_eq!(first, second);
}

#[test]
fn explicit_prefix_narrows_the_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("pkg");
    write_corpus(&root);
    let out = dir.path().join("out");

    let mut config = AnalysisConfig::new(root, out);
    config.prefix = Some("pkg.a".to_string());
    let oracle = FakeOracle { map: corpus_calls() };
    let report = AnalysisPipeline { config: &config, oracle: &oracle }
        .run()
        .unwrap();

    // pkg.b.* fails the prefix test everywhere: its callers are dropped
    // and the cross-file edge loses its callee.
    assert_eq!(report.function_edges, 2);
    assert_eq!(report.class_edges, 0);
}
