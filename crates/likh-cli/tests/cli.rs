use std::path::Path;

use assert_cmd::Command;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use predicates::prelude::*;
use tempfile::TempDir;

fn likh(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("likh").unwrap();
    // Keep the user's real config out of the tests.
    cmd.env("XDG_CONFIG_HOME", config_dir.path())
        .env("HOME", config_dir.path())
        .env_remove("OPENAI_API_KEY");
    cmd
}

fn write_png(path: &Path, width: u32, height: u32) {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

#[test]
fn prompt_defaults_to_verbatim() {
    let dir = TempDir::new().unwrap();
    likh(&dir)
        .arg("prompt")
        .assert()
        .success()
        .stdout(predicate::str::contains("exactly as it appears"));
}

#[test]
fn prompt_structured_requires_csv() {
    let dir = TempDir::new().unwrap();
    likh(&dir)
        .args(["prompt", "--structured"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exactly as it appears"))
        .stdout(predicate::str::contains("Grand Total").not());

    likh(&dir)
        .args(["prompt", "--csv", "--structured"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IGST Payable,Grand Total"));
}

#[test]
fn extract_without_credential_fails_first() {
    let dir = TempDir::new().unwrap();
    // The input does not exist either; the credential check must win.
    likh(&dir)
        .args(["extract", "missing.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn extract_rejects_unlisted_upload_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("scan.bmp");
    std::fs::write(&input, b"BM").unwrap();

    likh(&dir)
        .env("OPENAI_API_KEY", "sk-test")
        .args(["extract", "--source", "upload"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format for upload"));
}

#[test]
fn extract_missing_input() {
    let dir = TempDir::new().unwrap();
    likh(&dir)
        .env("OPENAI_API_KEY", "sk-test")
        .args(["extract", "does-not-exist.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn dry_run_shows_prompt_and_payload() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bill.png");
    write_png(&input, 32, 16);

    likh(&dir)
        .args(["extract", "--dry-run", "--csv", "--structured", "--source", "camera"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("image/jpeg 32x16"))
        .stdout(predicate::str::contains("structured_bill_camera.csv"))
        .stdout(predicate::str::contains("Date,Invoice No."));
}

#[test]
fn dry_run_reports_corrupt_image() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.png");
    std::fs::write(&input, b"not really a png").unwrap();

    likh(&dir)
        .args(["extract", "--dry-run"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("image"));
}

#[test]
fn config_set_and_get_roundtrip() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("likh.json");

    likh(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "api.model", "gpt-4o-mini"])
        .assert()
        .success();

    likh(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "api.model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4o-mini"));

    likh(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "api.no_such_key", "1"])
        .assert()
        .failure();
}

#[test]
fn config_rejects_invalid_quality() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("likh.json");

    likh(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "image.jpeg_quality", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("jpeg_quality"));
}

#[test]
fn verbose_logs_stay_off_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("note.png");
    write_png(&input, 8, 8);

    likh(&dir)
        .args(["-v", "extract", "--dry-run"])
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("Read "))
        .stdout(predicate::str::contains("Read ").not())
        .stdout(predicate::str::contains("image/jpeg 8x8"));
}
