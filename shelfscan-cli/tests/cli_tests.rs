//! Integration tests for the Shelfscan CLI

use assert_cmd::Command;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A shelfscan command isolated from the caller's environment
fn shelfscan() -> Command {
    let mut cmd = Command::cargo_bin("shelfscan").unwrap();
    for var in [
        "OPEN_AI_KEY",
        "SHELFSCAN_USER",
        "SHELFSCAN_EMAIL",
        "SHELFSCAN_DATA_DIR",
        "SHELFSCAN_VISION_URL",
        "SHELFSCAN_VISION_API",
        "SHELFSCAN_VISION_MODEL",
        "SHELFSCAN_LOOKUP_URL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Write a stored book list for `user` under `data_dir`
fn seed_books(data_dir: &Path, user: &str, books: Value) {
    let dir = data_dir.join("books");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.json", user)), books.to_string()).unwrap();
}

fn write_jpeg(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("cover.jpg");
    fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9]).unwrap();
    path
}

#[test]
fn test_help() {
    shelfscan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("lookup"));
}

#[test]
fn test_version() {
    shelfscan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shelfscan"));
}

#[test]
fn test_scan_help() {
    shelfscan()
        .args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan a photo"))
        .stdout(predicate::str::contains("--vision-api"))
        .stdout(predicate::str::contains("--no-camera-permission"));
}

#[test]
fn test_parse_finds_isbn() {
    shelfscan()
        .args(["parse", "ISBN-13: 9780131103627 great book"])
        .assert()
        .success()
        .stdout("9780131103627\n");
}

#[test]
fn test_parse_without_isbn_fails() {
    shelfscan()
        .args(["parse", "no numbers here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No ISBN found"));
}

#[test]
fn test_list_requires_user() {
    let dir = TempDir::new().unwrap();
    shelfscan()
        .args(["list", "--data-dir", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No signed-in user"));
}

#[test]
fn test_list_empty() {
    let dir = TempDir::new().unwrap();
    shelfscan()
        .args(["--user", "reader", "--email", "reader@example.com", "list"])
        .args(["--data-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, reader@example.com"))
        .stdout(predicate::str::contains("No books scanned yet."));
}

#[test]
fn test_list_shows_books_in_scan_order() {
    let dir = TempDir::new().unwrap();
    seed_books(
        dir.path(),
        "reader",
        json!([
            {"id": "a1", "title": "Zebra Tales", "author": "Z. Writer", "isbn": "1111111111",
             "numberOfPages": 12, "timestamp": 1700000000000i64},
            {"id": "b2", "title": "Apple Stories", "author": "A. Writer", "isbn": "2222222222",
             "numberOfPages": 34, "timestamp": 1700000100000i64}
        ]),
    );

    let output = shelfscan()
        .args(["--user", "reader", "list"])
        .args(["--data-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, reader"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let zebra = stdout.find("Zebra Tales").unwrap();
    let apple = stdout.find("Apple Stories").unwrap();
    assert!(zebra < apple, "books should be listed in insertion order");
}

#[test]
fn test_list_json() {
    let dir = TempDir::new().unwrap();
    seed_books(
        dir.path(),
        "reader",
        json!([{"id": "a1", "title": "Only Book", "author": "Someone", "isbn": "9780131103627",
                "numberOfPages": 0, "timestamp": 1700000000000i64}]),
    );

    let output = shelfscan()
        .args(["--user", "reader", "list", "--json"])
        .args(["--data-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let books: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(books[0]["title"], "Only Book");
    assert_eq!(books[0]["numberOfPages"], 0);
}

#[test]
fn test_list_with_corrupt_store_is_empty() {
    let dir = TempDir::new().unwrap();
    let books = dir.path().join("books");
    fs::create_dir_all(&books).unwrap();
    fs::write(books.join("reader.json"), "{{{ not json").unwrap();

    shelfscan()
        .args(["--user", "reader", "list"])
        .args(["--data-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No books scanned yet."));
}

#[test]
fn test_scan_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    let image = write_jpeg(&dir);

    shelfscan()
        .args(["--user", "reader", "scan", image.to_str().unwrap()])
        .args(["--data-dir", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPEN_AI_KEY"));
}

#[test]
fn test_scan_without_camera_permission_fails() {
    let dir = TempDir::new().unwrap();
    let image = write_jpeg(&dir);

    shelfscan()
        .env("OPEN_AI_KEY", "sk-test")
        .args(["--user", "reader", "scan", "--no-camera-permission"])
        .arg(image.to_str().unwrap())
        .args(["--data-dir", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("camera permission"));

    assert!(!dir.path().join("books").exists());
}

#[test]
fn test_scan_rejects_unknown_vision_api() {
    let dir = TempDir::new().unwrap();
    let image = write_jpeg(&dir);

    shelfscan()
        .env("OPEN_AI_KEY", "sk-test")
        .args(["--user", "reader", "scan", "--vision-api", "telepathy"])
        .arg(image.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown vision API"));
}

#[test]
fn test_lookup_rejects_bad_isbn() {
    shelfscan()
        .args(["lookup", "12-34"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a 10-13 digit ISBN"));
}

// =============================================================================
// Against in-process services
// =============================================================================

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn services(vision_status: StatusCode) -> (String, String) {
    let vision = Router::new().route(
        "/v1/chat/completions",
        post(move || async move {
            (
                vision_status,
                Json(json!({"choices": [{"message": {"content": "ISBN-13: 9780131103627"}}]})),
            )
        }),
    );
    let lookup = Router::new().route(
        "/api/books",
        get(|| async {
            Json(json!({
                "ISBN:9780131103627": {
                    "title": "The C Programming Language",
                    "authors": [{"name": "Brian W. Kernighan"}],
                    "number_of_pages": 272
                }
            }))
        }),
    );

    (
        format!("{}/v1", serve(vision).await),
        serve(lookup).await,
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_scan_then_list() {
    let (vision_url, lookup_url) = services(StatusCode::OK).await;
    let dir = TempDir::new().unwrap();
    let image = write_jpeg(&dir);
    let data_dir = dir.path().to_path_buf();

    tokio::task::spawn_blocking(move || {
        shelfscan()
            .env("OPEN_AI_KEY", "sk-test")
            .env("SHELFSCAN_VISION_URL", &vision_url)
            .env("SHELFSCAN_LOOKUP_URL", &lookup_url)
            .env("SHELFSCAN_DATA_DIR", &data_dir)
            .args(["--user", "reader", "scan"])
            .arg(&image)
            .assert()
            .success()
            .stdout(predicate::str::contains("Book Details"))
            .stdout(predicate::str::contains("Title: The C Programming Language"))
            .stdout(predicate::str::contains("Author: Brian W. Kernighan"));

        shelfscan()
            .env("SHELFSCAN_DATA_DIR", &data_dir)
            .args(["--user", "reader", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("The C Programming Language by Brian W. Kernighan"))
            .stdout(predicate::str::contains("ISBN 9780131103627"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_scan_vision_failure_reports_once() {
    let (vision_url, lookup_url) = services(StatusCode::INTERNAL_SERVER_ERROR).await;
    let dir = TempDir::new().unwrap();
    let image = write_jpeg(&dir);
    let data_dir = dir.path().to_path_buf();

    let output = tokio::task::spawn_blocking(move || {
        shelfscan()
            .env("OPEN_AI_KEY", "sk-test")
            .env("SHELFSCAN_VISION_URL", &vision_url)
            .env("SHELFSCAN_LOOKUP_URL", &lookup_url)
            .env("SHELFSCAN_DATA_DIR", &data_dir)
            .args(["--user", "reader", "scan"])
            .arg(&image)
            .assert()
            .failure()
            .stderr(predicate::str::contains("extraction failed"))
            .get_output()
            .stdout
            .clone()
    })
    .await
    .unwrap();

    let stdout = String::from_utf8(output).unwrap();
    assert_eq!(stdout.matches("Error").count(), 1);
    assert!(stdout.contains("No result from the vision service."));
    assert!(!dir.path().join("books").exists());
}
