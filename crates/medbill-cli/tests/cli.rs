//! Integration tests for the medbill binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DUPLICATE_BILL: &str = "City Hospital\nPatient Name: Asha Verma\nTotal: 500\n2 Paracetamol 10.00 20.00\n2 Paracetamol 10.00 20.00\n";

const MISMATCH_BILL: &str = "Total 1000\n5 Syringe 20.00 1000.00\n";

/// CLI command with the user config directory pointed into `home`.
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_medbill"));
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

fn write_bill(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

/// One-page PDF with a grayscale image and no text, like a scanned bill.
fn write_scanned_pdf(dir: &Path, name: &str) -> std::path::PathBuf {
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 1_i64,
            "Height" => 1_i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8_i64,
        },
        vec![128],
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Resources" => dictionary! { "XObject" => dictionary! { "Im1" => image_id } },
        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(100), Object::Integer(100)],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

// ============ PROCESS ============

#[test]
fn test_process_json() {
    let dir = TempDir::new().unwrap();
    let input = write_bill(dir.path(), "bill.txt", DUPLICATE_BILL);

    let output = cli(dir.path())
        .arg("process")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["record"]["patient_name"], "Asha Verma");
    assert_eq!(json["record"]["date"], "not detected");
    assert_eq!(json["validation"]["fraud_score"], 10);
    assert_eq!(json["validation"]["errors"][0], "Duplicate items detected");
}

#[test]
fn test_process_text_report_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write_bill(dir.path(), "bill.txt", MISMATCH_BILL);
    let report = dir.path().join("report.txt");

    cli(dir.path())
        .args(["process", "-f", "text", "-o"])
        .arg(&report)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let content = fs::read_to_string(&report).unwrap();
    assert!(content.contains("Line mismatch: Syringe"));
    assert!(content.contains("Complete Extracted Bill Content"));
    assert!(content.contains("End of Report"));
}

#[test]
fn test_process_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_bill(dir.path(), "empty.txt", "");

    cli(dir.path())
        .args(["process", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("patient_name,hospital_name,date"))
        .stdout(predicate::str::contains("not detected,not detected,not detected"))
        .stdout(predicate::str::contains("50,Medium Risk"));
}

#[test]
fn test_process_fail_on_threshold() {
    let dir = TempDir::new().unwrap();
    let input = write_bill(dir.path(), "empty.txt", "");

    cli(dir.path())
        .args(["process", "--fail-on", "medium"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Medium Risk"));

    cli(dir.path())
        .args(["process", "--fail-on", "high"])
        .arg(&input)
        .assert()
        .success();
}

#[test]
fn test_process_missing_file() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .args(["process", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_unsupported_format() {
    let dir = TempDir::new().unwrap();
    let input = write_bill(dir.path(), "bill.xlsx", "Total 100");

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: xlsx"));
}

#[test]
fn test_process_image_without_models() {
    let dir = TempDir::new().unwrap();
    let input = write_bill(dir.path(), "scan.png", "not really a png");

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .arg("--model-dir")
        .arg(dir.path().join("models"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("OCR models not found"));
}

#[test]
fn test_process_scanned_pdf_falls_back_to_ocr() {
    let dir = TempDir::new().unwrap();
    let input = write_scanned_pdf(dir.path(), "scan.pdf");

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .arg("--model-dir")
        .arg(dir.path().join("models"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("OCR models not found"));
}

#[test]
fn test_process_fail_on_rejects_unknown_level() {
    let dir = TempDir::new().unwrap();
    let input = write_bill(dir.path(), "empty.txt", "");

    cli(dir.path())
        .args(["process", "--fail-on", "severe"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown risk level"));
}

#[test]
fn test_process_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write_bill(dir.path(), "empty.txt", "");
    let config = dir.path().join("strict.json");
    fs::write(&config, r#"{"validation": {"check_identity_fields": true}}"#).unwrap();

    let output = cli(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("process")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["validation"]["fraud_score"], 100);
    assert_eq!(json["risk"], "high");
}

// ============ BATCH ============

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let bills = dir.path().join("bills");
    fs::create_dir_all(&bills).unwrap();
    write_bill(&bills, "a.txt", DUPLICATE_BILL);
    write_bill(&bills, "b.txt", MISMATCH_BILL);
    let out = dir.path().join("out");

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", bills.display()))
        .arg("-d")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let rows: Vec<&str> = summary.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].starts_with("filename,status,patient_name"));
    assert!(rows[1].starts_with("a.txt,success,Asha Verma"));
    assert!(rows[2].contains("Line mismatch: Syringe"));
}

#[test]
fn test_batch_continue_on_error() {
    let dir = TempDir::new().unwrap();
    let bills = dir.path().join("bills");
    fs::create_dir_all(&bills).unwrap();
    write_bill(&bills, "a.txt", DUPLICATE_BILL);
    write_bill(&bills, "scan.png", "not really a png");
    let out = dir.path().join("out");

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*", bills.display()))
        .arg("-d")
        .arg(&out)
        .arg("--model-dir")
        .arg(dir.path().join("models"))
        .args(["--summary", "--continue-on-error", "-f", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"));

    assert!(out.join("a.txt").exists());
    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("scan.png,error"));
}

#[test]
fn test_batch_fails_fast_without_flag() {
    let dir = TempDir::new().unwrap();
    write_bill(dir.path(), "scan.png", "not really a png");

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*.png", dir.path().display()))
        .arg("--model-dir")
        .arg(dir.path().join("models"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_batch_no_matches() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

// ============ CONFIG ============

#[test]
fn test_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("medbill.json");

    cli(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    cli(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cli(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "validation.check_identity_fields", "true"])
        .assert()
        .success();

    cli(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "validation.check_identity_fields"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));

    cli(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "validation.no_such_key"])
        .assert()
        .failure();
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("medbill.json");

    cli(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "validation.bogus", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));

    assert!(!config.exists());
}

#[test]
fn test_config_path_default_location() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("medbill"))
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_config_show_defaults() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"line_tolerance\""))
        .stdout(predicate::str::contains("\"check_identity_fields\": false"));
}
