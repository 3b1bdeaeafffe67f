//! End-to-end CLI tests for the noir binary.

use std::io::Cursor;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::assert::OutputAssertExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Binary isolated from the caller's config and log settings.
fn noir(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("noir").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn sample_png() -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([220, 30, 30])))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

async fn serve(path_str: &str, template: ResponseTemplate) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(template)
        .mount(&mock_server)
        .await;
    mock_server
}

/// Test that --help lists the exit codes and exits with code 0.
#[test]
fn test_binary_help_lists_exit_codes() {
    let config = TempDir::new().unwrap();
    noir(config.path())
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("grayscale"))
        .stdout(predicate::str::contains("Exit codes:"))
        .stdout(predicate::str::contains("6  User cancelled"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let config = TempDir::new().unwrap();
    noir(config.path())
        .arg("--version")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("noir"));
}

#[test]
fn test_binary_missing_url_exits_2_with_usage() {
    let config = TempDir::new().unwrap();
    noir(config.path())
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with("Error: "))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_binary_invalid_flag_exits_2() {
    let config = TempDir::new().unwrap();
    noir(config.path())
        .args(["https://example.com/a.png", "--invalid-flag"])
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with("Error: "));
}

#[test]
fn test_binary_invalid_url_exits_2() {
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    noir(config.path())
        .args(["not a url", "-d"])
        .arg(out.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error: Invalid URL: "));
}

#[test]
fn test_binary_declined_directory_exits_6_without_creating_it() {
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let missing = out.path().join("gray");

    noir(config.path())
        .arg("https://example.com/a.png")
        .arg("-d")
        .arg(&missing)
        .write_stdin("no\n")
        .assert()
        .code(6)
        .stdout(predicate::str::contains("Would you like to create it? (yes/no): "))
        .stderr(predicate::str::contains("Error: Operation cancelled by user."));

    assert!(!missing.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_http_404_exits_3() {
    let mock_server = serve("/gone.png", ResponseTemplate::new(404)).await;
    let url = format!("{}/gone.png", mock_server.uri());
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let (config_path, out_path) = (config.path().to_path_buf(), out.path().to_path_buf());
    let output = tokio::task::spawn_blocking(move || {
        noir(&config_path)
            .arg(&url)
            .arg("-d")
            .arg(&out_path)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Fetching image"))
        .stdout(predicate::str::contains(" FAILED"))
        .stderr(predicate::str::contains("Error: Failed to fetch image from URL"));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_non_image_body_exits_4() {
    let mock_server = serve(
        "/page.png",
        ResponseTemplate::new(200).set_body_string("<html>nope</html>"),
    )
    .await;
    let url = format!("{}/page.png", mock_server.uri());
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let (config_path, out_path) = (config.path().to_path_buf(), out.path().to_path_buf());
    let output = tokio::task::spawn_blocking(move || {
        noir(&config_path)
            .arg(&url)
            .arg("-d")
            .arg(&out_path)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Error: Failed to process image"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_success_writes_png_and_exits_0() {
    let mock_server = serve(
        "/red.png",
        ResponseTemplate::new(200).set_body_bytes(sample_png()),
    )
    .await;
    let url = format!("{}/red.png", mock_server.uri());
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let (config_path, out_path) = (config.path().to_path_buf(), out.path().to_path_buf());
    let output = tokio::task::spawn_blocking(move || {
        noir(&config_path)
            .arg(&url)
            .args(["-o", "gray"])
            .arg("--output-dir")
            .arg(&out_path)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Image fetched successfully, size: "))
        .stdout(predicate::str::contains("Processed image saved to: "))
        .stdout(predicate::str::contains("Compression: "))
        .stderr(predicate::str::is_empty());

    let written = std::fs::read(out.path().join("gray.png")).unwrap();
    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!(decoded.color(), image::ColorType::L8);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_quiet_success_prints_nothing() {
    let mock_server = serve(
        "/red.png",
        ResponseTemplate::new(200).set_body_bytes(sample_png()),
    )
    .await;
    let url = format!("{}/red.png", mock_server.uri());
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let (config_path, out_path) = (config.path().to_path_buf(), out.path().to_path_buf());
    let output = tokio::task::spawn_blocking(move || {
        noir(&config_path)
            .arg(&url)
            .arg("-q")
            .arg("-d")
            .arg(&out_path)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 1);
}

#[test]
fn test_binary_invalid_config_exits_1() {
    let config = TempDir::new().unwrap();
    std::fs::create_dir_all(config.path().join("noir")).unwrap();
    std::fs::write(config.path().join("noir").join("config.toml"), "bogus = 1\n").unwrap();

    noir(config.path())
        .arg("https://example.com/a.png")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_binary_config_output_dir_is_used_when_flag_absent() {
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let missing = out.path().join("from-config");
    std::fs::create_dir_all(config.path().join("noir")).unwrap();
    std::fs::write(
        config.path().join("noir").join("config.toml"),
        format!("output_dir = \"{}\"\n", missing.display()),
    )
    .unwrap();

    noir(config.path())
        .arg("https://example.com/a.png")
        .write_stdin("n\n")
        .assert()
        .code(6)
        .stdout(predicate::str::contains("from-config"));

    assert!(!missing.exists());
}
