#![cfg(feature = "cli")]

use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

const SAFE_READINGS: [(&str, &str); 9] = [
    ("--ph", "7.0"),
    ("--tds", "300"),
    ("--turbidity", "2"),
    ("--hardness", "100"),
    ("--chlorine", "1"),
    ("--conductivity", "200"),
    ("--nitrates", "5"),
    ("--fluoride", "1.0"),
    ("--iron", "0.1"),
];

fn cmd_with_db(db: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("water_quality_rs");
    cmd.env_remove("WATER_QUALITY_DB").arg("--db").arg(db);
    cmd
}

fn analyze_with(db: &Path, overrides: &[(&str, &str)]) -> assert_cmd::Command {
    let mut cmd = cmd_with_db(db);
    cmd.arg("analyze");
    for (flag, value) in SAFE_READINGS {
        let value = overrides
            .iter()
            .find(|(f, _)| *f == flag)
            .map(|(_, v)| *v)
            .unwrap_or(value);
        cmd.arg(flag).arg(value);
    }
    cmd
}

#[test]
fn cli_fails_without_any_input() {
    let dir = tempdir().unwrap();
    let mut cmd = cmd_with_db(&dir.path().join("reports.db"));
    cmd.arg("analyze");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input data"));
}

#[test]
fn cli_rejects_non_numeric_reading_and_saves_nothing() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("reports.db");

    analyze_with(&db, &[("--tds", "lots")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid numbers only"));

    cmd_with_db(&db)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No reports stored yet"));
}

#[test]
fn cli_reports_missing_single_reading() {
    let dir = tempdir().unwrap();
    let mut cmd = cmd_with_db(&dir.path().join("reports.db"));
    cmd.args(["analyze", "--ph", "7"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing reading for --tds"));
}

#[test]
fn cli_analyze_saves_and_history_lists_newest_first() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("reports.db");

    analyze_with(&db, &[])
        .assert()
        .success()
        .stdout(predicate::str::contains("Water Status: Safe for Drinking"))
        .stdout(predicate::str::contains("Saved as report #1"));

    analyze_with(&db, &[("--ph", "7.2"), ("--tds", "600")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unsafe – Contaminated"))
        .stdout(predicate::str::contains("Out of range: TDS"));

    let output = cmd_with_db(&db)
        .args(["history", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["id"], 2);
    assert_eq!(reports[0]["verdict"], "Unsafe – Contaminated");
    assert_eq!(reports[1]["verdict"], "Safe for Drinking");
    assert_eq!(reports[1]["measurement"]["tds"], 300.0);
}

#[test]
fn cli_accepts_inline_json_measurement() {
    let dir = tempdir().unwrap();
    let inputs = serde_json::json!({
        "ph": 9.0,
        "tds": 600.0,
        "turbidity": 1.0,
        "hardness": 50.0,
        "chlorine": 1.0,
        "conductivity": 100.0,
        "nitrates": 2.0,
        "fluoride": 0.5,
        "iron": 0.1
    })
    .to_string();

    let output = cmd_with_db(&dir.path().join("reports.db"))
        .args(["analyze", "--json", "--no-save", "--inputs-json"])
        .arg(inputs)
        .output()
        .unwrap();
    assert!(output.status.success());
    let out: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(out["assessment"]["verdict"], "Needs Filtration");
    assert!(out.get("verdict").is_none());
    assert_eq!(out["assessment"]["flagged"], serde_json::json!(["ph"]));
    assert!(out["report_id"].is_null());
}

#[test]
fn cli_reads_measurement_document_from_stdin() {
    let dir = tempdir().unwrap();
    let doc = serde_json::json!({
        "measurement": {
            "ph": 7.0,
            "tds": 300.0,
            "turbidity": 2.0,
            "hardness": 100.0,
            "chlorine": 1.0,
            "conductivity": 200.0,
            "nitrates": 5.0,
            "fluoride": 1.0,
            "iron": 0.1
        }
    })
    .to_string();

    cmd_with_db(&dir.path().join("reports.db"))
        .args(["analyze", "--input", "-"])
        .write_stdin(doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Safe for Drinking"));
}

#[test]
fn cli_reports_invalid_json_for_inputs_json() {
    let dir = tempdir().unwrap();
    cmd_with_db(&dir.path().join("reports.db"))
        .args(["analyze", "--inputs-json", "{not valid json}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON for --inputs-json"));
}

#[test]
fn cli_reports_invalid_json_in_file() {
    use std::fs::File;
    use std::io::Write as _;

    let dir = tempdir().unwrap();
    let file_path = dir.path().join("bad.json");
    let mut f = File::create(&file_path).unwrap();
    writeln!(f, "this is not json").unwrap();

    cmd_with_db(&dir.path().join("reports.db"))
        .arg("analyze")
        .arg("--input")
        .arg(file_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON in input document"));
}

#[test]
fn cli_shows_verdict_but_fails_when_storage_is_unavailable() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("no_such_dir").join("reports.db");

    analyze_with(&db, &[])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Water Status: Safe for Drinking"))
        .stdout(predicate::str::contains("Saved as").not())
        .stderr(predicate::str::contains("Storage unavailable"))
        .stderr(predicate::str::contains("The report was not saved."));
}

#[test]
fn cli_writes_printable_report_and_chart() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("sample_report.txt");

    analyze_with(&dir.path().join("reports.db"), &[("--iron", "0.5")])
        .arg("--chart")
        .arg("--report-path")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Water Test Parameters"))
        .stdout(predicate::str::contains("Report written to"));

    let text = std::fs::read_to_string(&report).unwrap();
    assert!(text.contains("Iron: 0.5 mg/L"));
    assert!(text.contains("Water Status: Unsafe – Contaminated"));
    assert!(text.contains("Out of range: Iron"));
}

#[test]
fn cli_history_defaults_to_ten_newest_reports() {
    use water_quality_rs::{Measurement, ReportStore, StoreConfig, classify};

    let dir = tempdir().unwrap();
    let db = dir.path().join("reports.db");
    {
        let store = ReportStore::open(&StoreConfig::at(&db)).unwrap();
        for i in 0..11 {
            let tds = 50.0 * f64::from(i);
            let m = Measurement::from_values([7.0, tds, 2.0, 100.0, 1.0, 200.0, 5.0, 1.0, 0.1]);
            store
                .append(&m, classify(&m), &format!("2024-06-01 10:00:{i:02}"))
                .unwrap();
        }
    }

    let output = cmd_with_db(&db).args(["history", "--json"]).output().unwrap();
    assert!(output.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 10);
    assert_eq!(reports[0]["id"], 11);
    assert_eq!(reports[9]["id"], 2);
}
