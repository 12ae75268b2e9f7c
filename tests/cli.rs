use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

fn write_sample_csv(dir: &Path) -> PathBuf {
    let path = dir.join("sales.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(
        f,
        "ORDERDATE,QUANTITYORDERED,PRICEEACH,SALES,STATUS,PRODUCTLINE,PRODUCTCODE,CUSTOMERNAME,COUNTRY,DEALSIZE"
    )
    .unwrap();
    writeln!(f, "01/03/2019,2,50.0,100.0,Shipped,Cars,C1,Acme,USA,Small").unwrap();
    writeln!(f, "02/03/2019,1,50.0,50.0,Shipped,Trucks,T1,Acme,USA,Small").unwrap();
    path
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("salesdash").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("salesdash"));
}

#[test]
fn charts_subcommand_lists_the_full_catalog() {
    let mut cmd = Command::cargo_bin("salesdash").unwrap();
    cmd.arg("charts");
    let assert = cmd
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly Sales Trend"))
        .stdout(predicate::str::contains("Deal Size Potential"));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 15);
}

#[test]
fn out_of_range_columns_is_rejected_at_parse_time() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sample_csv(dir.path());
    let mut cmd = Command::cargo_bin("salesdash").unwrap();
    cmd.arg("render").arg("--data").arg(&data);
    cmd.args(["--columns", "9"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("is not in 1..=5"));
}

#[test]
fn empty_chart_selection_warns_and_renders_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sample_csv(dir.path());
    let out = dir.path().join("dash.svg");
    let mut cmd = Command::cargo_bin("salesdash").unwrap();
    cmd.arg("render").arg("--data").arg(&data);
    cmd.args(["--charts", ""]).arg("--out").arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("no charts selected"));
    assert!(!out.exists());
}

#[test]
fn renders_selected_charts_to_svg() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sample_csv(dir.path());
    let out = dir.path().join("dash.svg");
    let mut cmd = Command::cargo_bin("salesdash").unwrap();
    cmd.arg("render").arg("--data").arg(&data);
    cmd.args(["--charts", "2,4", "--columns", "2"]);
    cmd.arg("--out").arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Loaded 2 rows"));
    assert!(out.exists());
}

#[test]
fn unknown_chart_identifier_fails() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sample_csv(dir.path());
    let mut cmd = Command::cargo_bin("salesdash").unwrap();
    cmd.arg("render").arg("--data").arg(&data);
    cmd.args(["--charts", "99"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown chart identifier"));
}

#[test]
fn missing_data_file_is_a_load_error() {
    let mut cmd = Command::cargo_bin("salesdash").unwrap();
    cmd.args(["render", "--data", "does-not-exist.csv"]);
    cmd.assert().failure();
}

#[test]
fn stats_prints_dataset_summary() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sample_csv(dir.path());
    let mut cmd = Command::cargo_bin("salesdash").unwrap();
    cmd.arg("stats").arg("--data").arg(&data);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("rows: 2"))
        .stdout(predicate::str::contains("Cars"));
}

#[test]
fn exports_normalized_table_alongside_the_page() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sample_csv(dir.path());
    let out = dir.path().join("dash.svg");
    let tidy = dir.path().join("tidy.json");
    let mut cmd = Command::cargo_bin("salesdash").unwrap();
    cmd.arg("render").arg("--data").arg(&data);
    cmd.args(["--charts", "1"]);
    cmd.arg("--out").arg(&out);
    cmd.arg("--out-data").arg(&tidy);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Saved 2 rows"));
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&tidy).unwrap()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
}
