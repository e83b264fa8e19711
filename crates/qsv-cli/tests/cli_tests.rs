//! End-to-end tests of the `qsv` binary.
//!
//! Each test writes a program to a temporary directory and runs the built
//! binary against it.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const BELL: &str = r#"{
  "numQubits": 2,
  "gates": [
    {"type": "H", "params": [0]},
    {"type": "CNOT", "params": [0, 1]}
  ]
}"#;

fn qsv(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qsv"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("QSV_CONFIG")
        .output()
        .expect("failed to launch qsv")
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// run
// ============================================================================

#[test]
fn run_json_report() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "bell.json", BELL);

    let output = qsv(&[
        "run",
        "-i",
        path_str(&input),
        "--shots",
        "200",
        "--seed",
        "1",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["numQubits"], 2);
    assert_eq!(report["stateVector"].as_array().unwrap().len(), 4);
    assert!(report["densityMatrix"].is_array());
    let pair = &report["pairwise"]["0-1"];
    assert!((pair["concurrence"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    let counts = report["counts"].as_object().unwrap();
    let total: u64 = counts.values().map(|v| v.as_u64().unwrap()).sum();
    assert_eq!(total, 200);
    assert!(counts.keys().all(|k| k == "00" || k == "11"));
}

#[test]
fn run_table_output_and_report_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "bell.json", BELL);
    let report_path = dir.path().join("report.json");

    let output = qsv(&[
        "run",
        "-i",
        path_str(&input),
        "-o",
        path_str(&report_path),
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("|00⟩"));
    assert!(text.contains("Entanglement"));
    assert!(text.contains("Counts (1024 shots)"));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(saved["gatesApplied"], 2);
}

#[test]
fn run_no_analysis_omits_derived_quantities() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "bell.json", BELL);

    let output = qsv(&[
        "run",
        "-i",
        path_str(&input),
        "--no-analysis",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(report.get("densityMatrix").is_none());
    assert!(report.get("pairwise").is_none());
    assert!(report.get("statistics").is_none());
    assert!(report["counts"].is_object());
}

#[test]
fn run_density_above_ceiling_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "wide.json", r#"{"numQubits": 9, "gates": []}"#);

    let output = qsv(&["run", "-i", path_str(&input), "--density"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error:"));
    assert!(stderr(&output).contains("exceeds the limit"));
}

#[test]
fn run_respects_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "bell.json", BELL);
    let config = write(&dir, "qsv.yaml", "limits:\n  max_qubits: 1\n");

    let output = qsv(&["--config", path_str(&config), "run", "-i", path_str(&input)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("only supports 1"));
}

#[test]
fn run_missing_file() {
    let output = qsv(&["run", "-i", "/nonexistent/program.json"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("File not found"));
}

// ============================================================================
// qasm / validate / version
// ============================================================================

#[test]
fn qasm_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "bell.json", BELL);

    let output = qsv(&["qasm", "-i", path_str(&input)]);
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    assert!(text.starts_with("OPENQASM 2.0;"));
    assert!(text.contains("h q[0];"));
    assert!(text.contains("cx q[0],q[1];"));
}

#[test]
fn qasm_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "bell.json", BELL);
    let out = dir.path().join("bell.qasm");

    let output = qsv(&["qasm", "-i", path_str(&input), "-o", path_str(&out)]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(std::fs::read_to_string(&out).unwrap().contains("qreg q[2];"));
}

#[test]
fn validate_reports_bad_qubit() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "bell.json", BELL);
    let bad = write(
        &dir,
        "bad.json",
        r#"{"numQubits": 2, "gates": [{"type": "H", "params": [3]}]}"#,
    );

    let ok = qsv(&["validate", "-i", path_str(&good)]);
    assert!(ok.status.success(), "{}", stderr(&ok));
    assert!(stdout(&ok).contains("is valid"));

    let err = qsv(&["validate", "-i", path_str(&bad)]);
    assert!(!err.status.success());
    assert!(stderr(&err).contains("Error:"));
}

#[test]
fn version_prints_components() {
    let output = qsv(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("qsv-sim"));
}

#[test]
fn unknown_subcommand_fails() {
    let output = qsv(&["frobnicate"]);
    assert!(!output.status.success());
}
