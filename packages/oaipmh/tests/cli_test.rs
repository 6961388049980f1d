//! Command-line tests for the `regelrecht-oaipmh` binary.

#![allow(deprecated)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

fn cli() -> Command {
    Command::cargo_bin("regelrecht-oaipmh").unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_read_list_records_as_yaml() {
    cli()
        .arg("read")
        .arg(fixture_path("list_records.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "oai:repository.example.org:BWBR0018451",
        ))
        .stdout(predicate::str::contains("Wet op de zorgtoeslag"))
        .stdout(predicate::str::contains("Algemene wet inkomensafhankelijke regelingen"))
        .stdout(predicate::str::contains("BWBR0000000").not())
        .stderr(predicate::str::contains("2 record(s)"));
}

#[test]
fn test_read_as_json() {
    let output = cli()
        .arg("read")
        .arg(fixture_path("list_records.xml"))
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.as_array().map(Vec::len), Some(2));
    assert_eq!(records[0]["metadata"]["language"][0], "nl");
    assert_eq!(records[1]["metadata"]["rights"][0], "CC0 1.0");
}

#[test]
fn test_read_unknown_prefix_fails() {
    cli()
        .arg("read")
        .arg(fixture_path("list_records.xml"))
        .args(["--prefix", "marc21"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No metadata reader registered for format 'marc21'",
        ));
}

#[test]
fn test_read_with_schema_reports_degraded_field() {
    cli()
        .arg("read")
        .arg(fixture_path("wti.xml"))
        .args(["--prefix", "wti", "--format", "json", "--schema"])
        .arg(fixture_path("wti_schema.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"bwb_id\": \"BWBR0018451\""))
        .stdout(predicate::str::contains("\"soort_regeling\": \"wet\""))
        .stderr(predicate::str::contains("warning:"))
        .stderr(predicate::str::contains("broken"))
        .stderr(predicate::str::contains("Degraded: 1"));
}

#[test]
fn test_formats_lists_schema_formats() {
    cli()
        .arg("formats")
        .arg("--schema")
        .arg(fixture_path("wti_schema.yaml"))
        .assert()
        .success()
        .stdout(predicate::eq("oai_dc\nwti\n"));
}

#[test]
fn test_formats_with_invalid_schema_fails() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.yaml");
    fs::write(
        &schema,
        "formats:\n  bad:\n    fields:\n      x: { type: integer, path: \"x\" }\n",
    )
    .unwrap();

    cli()
        .arg("formats")
        .arg("--schema")
        .arg(&schema)
        .assert()
        .failure()
        .stderr(predicate::str::contains("integer"));
}

#[test]
fn test_read_missing_file_fails() {
    cli()
        .arg("read")
        .arg(fixture_path("does-not-exist.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}
