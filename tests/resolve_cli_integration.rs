use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

const CORPUS: &str = r#"{"groupId":"a","artifactId":"a","version":"1","releaseDate":1,"dependencies":[{"groupId":"b","artifactId":"b"}]}
{"groupId":"b","artifactId":"b","version":"1","releaseDate":1}
{"groupId":"b","artifactId":"b","version":"2","releaseDate":2}
{"groupId":"c","artifactId":"c","version":"1","releaseDate":1,"dependencies":[{"groupId":"b","artifactId":"b","version":"[2]"}]}

{"groupId":"x","artifactId":"x","version":"1","releaseDate":1,"dependencies":[{"groupId":"p","artifactId":"p","version":"1"}]}
{"groupId":"y","artifactId":"y","version":"1","releaseDate":1,"dependencies":[{"groupId":"q","artifactId":"q","version":"1"}]}
{"groupId":"p","artifactId":"p","version":"1","releaseDate":1}
{"groupId":"q","artifactId":"q","version":"1","releaseDate":1}
{"groupId":"m","artifactId":"m","version":"1","releaseDate":1,"dependencies":[{"groupId":"n","artifactId":"n","version":"1"}]}
{"groupId":"n","artifactId":"n","version":"1","releaseDate":1,"dependencies":[{"groupId":"m","artifactId":"m","version":"1"}]}
"#;

struct TestCorpus {
    root: PathBuf,
}

impl TestCorpus {
    fn new(prefix: &str) -> Self {
        let root = unique_temp_dir(prefix);
        fs::create_dir_all(root.join("nested")).expect("create corpus dirs");
        fs::write(root.join("artifacts.jsonl"), CORPUS).expect("write corpus");
        fs::write(
            root.join("artifact-graph.toml"),
            "[data]\npath = \"artifacts.jsonl\"\njobs = 2\n",
        )
        .expect("write config");
        Self { root }
    }

    fn run_in(&self, dir: &Path, args: &[&str]) -> Output {
        Command::new(artifact_graph_bin())
            .current_dir(dir)
            .env_remove("ARTIFACT_GRAPH_CONFIG")
            .env_remove("ARTIFACT_GRAPH_DATA")
            .env_remove("ARTIFACT_GRAPH_JOBS")
            .env_remove("RUST_LOG")
            .arg("--no-color")
            .args(args)
            .output()
            .expect("run artifact-graph")
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.run_in(&self.root, args);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        assert!(
            output.status.success(),
            "artifact-graph {} failed\nstdout:\n{stdout}\nstderr:\n{stderr}",
            args.join(" ")
        );
        serde_json::from_slice(&output.stdout).expect("parse json output")
    }

    fn gavs(&self, args: &[&str]) -> Vec<String> {
        revisions(&self.json(args))
    }
}

impl Drop for TestCorpus {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn revisions(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("json array")
        .iter()
        .map(|entry| {
            format!(
                "{}:{}:{}",
                entry["groupId"].as_str().expect("groupId"),
                entry["artifactId"].as_str().expect("artifactId"),
                entry["version"].as_str().expect("version"),
            )
        })
        .collect()
}

fn artifact_graph_bin() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_artifact-graph") {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().expect("resolve current test binary path");
    let target_dir = current_exe
        .parent()
        .and_then(|path| path.parent())
        .expect("derive cargo target dir from test binary path");
    let bin_name = if cfg!(windows) {
        "artifact-graph.exe"
    } else {
        "artifact-graph"
    };
    let fallback = target_dir.join(bin_name);

    if fallback.is_file() {
        fallback
    } else {
        panic!(
            "CARGO_BIN_EXE_artifact-graph is not set and fallback binary not found at {}",
            fallback.display()
        );
    }
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("artifact-graph-{prefix}-{pid}-{nanos}"))
}

#[test]
fn deps_travel_in_time() {
    let corpus = TestCorpus::new("deps-time");
    assert_eq!(
        corpus.gavs(&["deps", "a:a:1", "--at", "1", "--json"]),
        vec!["a:a:1", "b:b:1"]
    );
    assert_eq!(
        corpus.gavs(&["deps", "a:a:1", "--at", "2", "--json"]),
        vec!["a:a:1", "b:b:2"]
    );
    assert_eq!(
        corpus.gavs(&["deps", "c:c:1", "--at", "1", "--json"]),
        vec!["c:c:1"]
    );
}

#[test]
fn deps_report_seed_failures() {
    let corpus = TestCorpus::new("deps-errors");

    let missing = corpus.run_in(&corpus.root, &["deps", "a:a:9"]);
    assert_eq!(missing.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&missing.stderr);
    assert!(stderr.contains("cannot find coordinate a:a:9"), "{stderr}");

    let too_new = corpus.run_in(&corpus.root, &["deps", "b:b:2", "--at", "1"]);
    assert_eq!(too_new.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&too_new.stderr);
    assert!(stderr.contains("released at 2"), "{stderr}");

    let malformed = corpus.run_in(&corpus.root, &["deps", "a:a:[1,2"]);
    assert_eq!(malformed.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&malformed.stderr);
    assert!(stderr.contains("invalid version constraint"), "{stderr}");
}

#[test]
fn dependents_are_verified_against_the_version() {
    let corpus = TestCorpus::new("dependents");
    assert_eq!(
        corpus.gavs(&["dependents", "b:b", "1", "--direct", "--json"]),
        vec!["a:a:1"]
    );
    assert_eq!(
        corpus.gavs(&["dependents", "b:b", "2", "--json"]),
        vec!["a:a:1", "c:c:1"]
    );
}

#[test]
fn batch_returns_the_union() {
    let corpus = TestCorpus::new("batch");
    assert_eq!(
        corpus.gavs(&["batch", "x:x:1", "y:y:1", "--json"]),
        vec!["p:p:1", "q:q:1", "x:x:1", "y:y:1"]
    );
}

#[test]
fn show_prints_the_descriptor() {
    let corpus = TestCorpus::new("show");
    let record = corpus.json(&["show", "c:c:1", "--json"]);
    assert_eq!(record["releaseDate"], 1);
    assert_eq!(record["dependencies"][0]["version"], "[2]");
    assert_eq!(record["dependencies"][0]["scope"], "compile");

    let text = corpus.run_in(&corpus.root, &["show", "c:c:1"]);
    assert!(text.status.success());
    let stdout = String::from_utf8_lossy(&text.stdout);
    assert!(stdout.starts_with("c:c:1 (released 1)"), "{stdout}");
    assert!(stdout.contains("b:b:[2] [compile]"), "{stdout}");
}

#[test]
fn check_reports_cycles_and_missing_edges() {
    let corpus = TestCorpus::new("check");

    let latest = corpus.json(&["check", "--json"]);
    assert_eq!(latest["missing"].as_array().map(Vec::len), Some(0));
    assert_eq!(latest["cycles"], serde_json::json!([["m:m:1", "n:n:1"]]));

    let early = corpus.json(&["check", "--at", "1", "--json"]);
    assert_eq!(early["missing"][0]["from"], "c:c:1");
    assert_eq!(early["missing"][0]["dependency"], "b:b");
    assert_eq!(early["missing"][0]["constraint"], "[2]");
}

#[test]
fn config_is_found_from_a_nested_directory() {
    let corpus = TestCorpus::new("nested");
    let output = corpus.run_in(&corpus.root.join("nested"), &["deps", "x:x:1", "--json"]);
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).expect("parse json output");
    assert_eq!(revisions(&value), vec!["p:p:1", "x:x:1"]);
}

#[test]
fn data_flag_and_env_override_the_config() {
    let corpus = TestCorpus::new("data-override");
    let other = corpus.root.join("other.jsonl");
    fs::write(
        &other,
        "{\"groupId\":\"solo\",\"artifactId\":\"solo\",\"version\":\"1\",\"releaseDate\":1}\n",
    )
    .expect("write other corpus");

    let flag = corpus.run_in(
        &corpus.root,
        &["--data", other.to_str().expect("utf-8 path"), "deps", "solo:solo:1", "--json"],
    );
    assert!(flag.status.success());

    let env = Command::new(artifact_graph_bin())
        .current_dir(&corpus.root)
        .env_remove("ARTIFACT_GRAPH_CONFIG")
        .env("ARTIFACT_GRAPH_DATA", &other)
        .args(["deps", "a:a:1"])
        .output()
        .expect("run artifact-graph");
    assert_eq!(env.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&env.stderr);
    assert!(stderr.contains("cannot find coordinate a:a:1"), "{stderr}");
}

#[test]
fn missing_data_is_a_config_error() {
    let root = unique_temp_dir("no-data");
    fs::create_dir_all(&root).expect("create temp dir");
    fs::write(root.join("artifact-graph.toml"), "[resolution]\ntransitive = false\n")
        .expect("write config");

    let output = Command::new(artifact_graph_bin())
        .current_dir(&root)
        .env_remove("ARTIFACT_GRAPH_CONFIG")
        .env_remove("ARTIFACT_GRAPH_DATA")
        .args(["deps", "a:a:1"])
        .output()
        .expect("run artifact-graph");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no artifact data configured"), "{stderr}");

    let _ = fs::remove_dir_all(&root);
}
