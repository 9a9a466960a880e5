//! Integration tests for configuration layering.
//!
//! Tests the full priority chain: hardcoded defaults < XDG config < project config < CLI args

#![allow(clippy::unwrap_used)] // Test code uses unwrap for brevity
#![allow(deprecated)] // cargo_bin deprecation warning

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use raster_gate_test_support::FixtureBuilder;
use serde_json::Value;

fn raster_gate(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("raster-gate").unwrap();
    cmd.current_dir(dir).env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd
}

fn write_xdg_config(dir: &Path, content: &str) {
    let config_dir = dir.join("xdg").join("raster-gate");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_project_config_applies_threshold() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = FixtureBuilder::rgb_jpeg(temp_dir.path(), "print.jpg", Some((150, 150))).unwrap();
    fs::write(
        temp_dir.path().join(".raster-gate.toml"),
        "[policy]\ndpi_threshold = 200\n",
    )
    .unwrap();

    raster_gate(temp_dir.path())
        .arg("check")
        .arg(&image)
        .assert()
        .code(0);
}

#[test]
fn test_cli_overrides_project_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = FixtureBuilder::rgb_jpeg(temp_dir.path(), "print.jpg", Some((150, 150))).unwrap();
    fs::write(
        temp_dir.path().join(".raster-gate.toml"),
        "[policy]\ndpi_threshold = 200\n",
    )
    .unwrap();

    raster_gate(temp_dir.path())
        .args(["check", "--dpi-threshold", "100"])
        .arg(&image)
        .assert()
        .code(1);
}

#[test]
fn test_project_config_overrides_xdg() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = FixtureBuilder::rgb_jpeg(temp_dir.path(), "print.jpg", Some((150, 150))).unwrap();
    write_xdg_config(temp_dir.path(), "[policy]\ndpi_threshold = 300\n");
    fs::write(
        temp_dir.path().join(".raster-gate.toml"),
        "[policy]\ndpi_threshold = 96\n",
    )
    .unwrap();

    raster_gate(temp_dir.path())
        .arg("check")
        .arg(&image)
        .assert()
        .code(1);
}

#[test]
fn test_xdg_config_applies_without_project_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = FixtureBuilder::rgb_jpeg(temp_dir.path(), "print.jpg", Some((150, 150))).unwrap();
    write_xdg_config(temp_dir.path(), "[policy]\ndpi_threshold = 300\n");

    raster_gate(temp_dir.path())
        .arg("check")
        .arg(&image)
        .assert()
        .code(0);
}

#[test]
fn test_project_config_applies_format() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = FixtureBuilder::rgb_jpeg(temp_dir.path(), "web.jpg", Some((72, 72))).unwrap();
    fs::write(
        temp_dir.path().join(".raster-gate.toml"),
        "[output]\nformat = 'json'\n",
    )
    .unwrap();

    let output = raster_gate(temp_dir.path())
        .arg("check")
        .arg(&image)
        .output()
        .unwrap();

    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed.is_array());
}

#[test]
fn test_invalid_config_warns_and_uses_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = FixtureBuilder::rgb_jpeg(temp_dir.path(), "print.jpg", Some((150, 150))).unwrap();
    fs::write(
        temp_dir.path().join(".raster-gate.toml"),
        "[decoder]\nbackend = 'vips'\n",
    )
    .unwrap();

    let output = raster_gate(temp_dir.path())
        .arg("check")
        .arg(&image)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: decoder.backend"));
}

#[test]
fn test_config_page_size_applies() {
    let temp_dir = tempfile::tempdir().unwrap();
    let media = temp_dir.path().join("uploads");
    fs::create_dir(&media).unwrap();
    for i in 0..3 {
        FixtureBuilder::rgb_png(&media, &format!("img{i}.png")).unwrap();
    }
    fs::write(
        temp_dir.path().join(".raster-gate.toml"),
        "[audit]\npage_size = 1\n",
    )
    .unwrap();

    raster_gate(temp_dir.path())
        .args(["-vv", "audit"])
        .arg(&media)
        .assert()
        .code(0)
        .stderr(predicates::str::contains("1 per page"));
}
