// CLI tests for the `chorale` binary.
//
// Each test writes a small corpus into a temp directory and drives the
// binary through `assert_cmd`, checking stdout only (logs go to stderr).

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const CORPUS: &str = ". a b .\n. a c .\n";

fn temp_workspace() -> TempDir {
    tempfile::tempdir().expect("create tempdir")
}

fn write_corpus(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).expect("write corpus");
    path.to_str().expect("utf-8 path").to_string()
}

fn chorale() -> Command {
    Command::cargo_bin("chorale").expect("binary exists")
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).expect("utf-8 stdout")
}

#[test]
fn generate_prints_one_chorale_per_line() {
    let ws = temp_workspace();
    let corpus = write_corpus(ws.path(), "corpus.txt", CORPUS);

    let stdout = stdout_of(chorale().args(["-q", "generate", "--corpus", corpus.as_str(), "-n", "5"]));
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    for line in lines {
        assert!(line == "a b ." || line == "a c .", "unexpected chorale {line:?}");
    }
}

#[test]
fn generate_is_reproducible_for_a_seed() {
    let ws = temp_workspace();
    let text = ". C G Am F C .\n. C F G C .\n. Am F C G Am .\n. G C F C G .\n";
    let corpus = write_corpus(ws.path(), "corpus.txt", text);
    let args = ["-q", "generate", "--corpus", corpus.as_str(), "-n", "10", "--seed", "42"];

    let first = stdout_of(chorale().args(args));
    let second = stdout_of(chorale().args(args));
    assert_eq!(first, second);
    assert_eq!(first.lines().count(), 10);
}

#[test]
fn stats_reports_singletons_and_top_sums() {
    let ws = temp_workspace();
    let corpus = write_corpus(ws.path(), "corpus.txt", CORPUS);

    let stdout = stdout_of(chorale().args(["-q", "stats", "--corpus", corpus.as_str()]));
    assert!(stdout.contains("Total number of tokens in the corpus: 8"));
    assert!(stdout.contains("Number of unique tokens in the corpus: 4 (50.00%)"));
    assert!(stdout.contains("Number of singular tokens: 2"));
    assert!(stdout.contains("Count of 20 most common tokens: [1, 1, 2, 2]"));
}

#[test]
fn stats_json_descending() {
    let ws = temp_workspace();
    let corpus = write_corpus(ws.path(), "corpus.txt", CORPUS);

    let stdout = stdout_of(chorale().args([
        "-q",
        "stats",
        "--corpus",
        corpus.as_str(),
        "--top",
        "3",
        "--descending",
        "--json",
    ]));
    let report: Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(report["singular_tokens"], 2);
    assert_eq!(report["total_bigrams"], 6);
    let top: Vec<u64> = report["top_frequencies"]
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_u64().expect("u64"))
        .collect();
    assert_eq!(top, vec![2, 2, 1]);
}

#[test]
fn selection_flags_resolve_named_corpus() {
    let ws = temp_workspace();
    write_corpus(ws.path(), "all-chorales-SB-per-beat.txt", CORPUS);
    let data_dir = ws.path().to_str().unwrap();

    let stdout = stdout_of(chorale().args([
        "-q",
        "generate",
        "--voicing",
        "soprano-bass",
        "--encoding",
        "per-beat",
        "--data-dir",
        data_dir,
    ]));
    assert_eq!(stdout.lines().count(), 1);
}

#[test]
fn interactive_selection_reads_stdin() {
    let ws = temp_workspace();
    write_corpus(ws.path(), "all-chorales-chords-start-of-beat.txt", CORPUS);
    let data_dir = ws.path().to_str().unwrap();

    let stdout = stdout_of(
        chorale()
            .args(["-q", "stats", "--interactive", "--data-dir", data_dir])
            .write_stdin("x\nn\n9\n3\n"),
    );
    assert!(stdout.contains("Number of singular tokens: 2"));
}

#[test]
fn config_file_supplies_corpus_and_markers() {
    let ws = temp_workspace();
    let corpus = write_corpus(
        ws.path(),
        "marked.txt",
        "<s> a b <e>\n<s> a c <e>\n",
    );
    let config = serde_json::json!({
        "corpus_path": corpus,
        "terminator": ".",
        "marker_substitutions": {"<s>": ".", "<e>": "."},
        "verbose": false
    });
    let config_path = ws.path().join("config.json");
    fs::write(&config_path, config.to_string()).unwrap();

    let stdout = stdout_of(chorale().args([
        "-q",
        "stats",
        "--config",
        config_path.to_str().unwrap(),
    ]));
    assert!(stdout.contains("Number of singular tokens: 2"));
}

#[test]
fn heatmap_writes_pgm() {
    let ws = temp_workspace();
    let corpus = write_corpus(ws.path(), "corpus.txt", CORPUS);
    let output = ws.path().join("counts.pgm");

    chorale()
        .args([
            "-q",
            "heatmap",
            "--corpus",
            corpus.as_str(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();
    let pgm = fs::read_to_string(&output).expect("heat map written");
    assert!(pgm.starts_with("P2\n"));
    assert!(pgm.contains("\n4 4\n255\n"));
}

#[test]
fn missing_terminator_fails() {
    let ws = temp_workspace();
    let corpus = write_corpus(ws.path(), "corpus.txt", "a b c\n");
    chorale()
        .args(["-q", "generate", "--corpus", corpus.as_str()])
        .assert()
        .failure();
}

#[test]
fn no_corpus_selected_fails() {
    chorale().args(["-q", "generate"]).assert().failure();
}

#[test]
fn missing_corpus_file_fails() {
    let ws = temp_workspace();
    let missing = ws.path().join("nope.txt");
    chorale()
        .args(["-q", "stats", "--corpus", missing.to_str().unwrap()])
        .assert()
        .failure();
}
