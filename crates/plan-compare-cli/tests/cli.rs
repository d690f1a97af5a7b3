//! Tests running the `plan-compare` binary against fixture plans.

use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_plan-compare"))
        .args(args)
        .env_remove("PLAN_COMPARE_SORT")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run plan-compare")
}

fn diff_json(extra: &[&str]) -> Value {
    let top = fixture("index_seek.json");
    let bottom = fixture("index_scan.json");
    let mut args = vec![
        "diff",
        "--format",
        "json",
        "--top",
        top.to_str().unwrap(),
        "--bottom",
        bottom.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);

    let output = run(&args);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn row_names(report: &Value) -> Vec<String> {
    report["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_diff_json_default_order() {
    let report = diff_json(&[]);

    assert_eq!(report["topHeader"], "Top operation: Index Seek");
    assert_eq!(report["bottomHeader"], "Bottom operation: Clustered IndexScan");
    assert_eq!(report["sortPolicy"], "display-order");
    assert_eq!(
        row_names(&report),
        [
            "Ordered",
            "Estimated Operator Cost",
            "Estimated Number of Rows",
            "Object",
            "  Database",
            "  Index",
            "  Storage",
        ]
    );

    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows[0]["value1"], "True");
    assert!(rows[0].get("value2").is_none());
    assert_eq!(rows[1]["value2"], "0.182 (100%)");
    assert_eq!(rows[4]["parent"], 3);
    assert_eq!(rows[6]["parent"], 3);
    assert_eq!(rows[6]["value2"], "RowStore");
    assert!(rows[3]["parent"].is_null());
}

#[test]
fn test_diff_json_alphabetical() {
    let report = diff_json(&["--sort", "alphabetical"]);
    assert_eq!(
        row_names(&report),
        [
            "Estimated Number of Rows",
            "Estimated Operator Cost",
            "Object",
            "  Database",
            "  Index",
            "  Storage",
            "Ordered",
        ]
    );
}

#[test]
fn test_diff_table_output() {
    let top = fixture("index_seek.json");
    let output = run(&["diff", "--format", "plain", "--top", top.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Top operation: Index Seek"));
    assert!(stdout.contains("Value (Top Plan)"));
    assert!(stdout.contains("[PK_Person]"));
}

#[test]
fn test_invalid_input_fails() {
    let output = run(&["diff", "--top", "/nonexistent/plan.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read plan element"));
}

#[test]
fn test_policies_lists_all() {
    let output = run(&["policies", "--format", "json"]);
    assert!(output.status.success());

    let names: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        names,
        ["display-order", "alphabetical", "reverse-alphabetical", "reverse-display-order"]
    );
}
