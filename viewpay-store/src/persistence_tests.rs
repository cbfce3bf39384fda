//! Persistence round-trip and edge case tests.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::persistence::{load_json, load_json_or_default, save_json};
use crate::settings::Settings;

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.json");

    let settings = Settings {
        currency_code: "eur".to_string(),
    };

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded.currency_code, "eur");
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir
        .path()
        .join("deeply")
        .join("nested")
        .join("settings.json");

    let data = serde_json::json!({"currency_code": "jpy"});

    save_json(&nested_path, &data).await.unwrap();
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let result: Result<Settings, _> = load_json(&file_path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_load_or_default_on_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, "{not json").await.unwrap();

    let settings: Settings = load_json_or_default(&file_path).await;
    assert_eq!(settings.currency_code, "usd");
}

#[tokio::test]
async fn test_unknown_fields_are_ignored() {
    // Settings written by a newer version must still load.
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(
        &file_path,
        r#"{"currency_code": "gbp", "future_field": true}"#,
    )
    .await
    .unwrap();

    let settings: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(settings.currency_code, "gbp");
}
