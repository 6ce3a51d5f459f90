//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use item_thumb_rust::error::ItemThumbError;
use item_thumb_rust::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_watch_dir(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, ItemThumbError::FolderNotFound(_)));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_watch_dir(dir.path());

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 在庫表以外のファイルのみのフォルダ
#[test]
fn test_scan_folder_without_workbooks() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("readme.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("inventory-42.csv"), "a,b").unwrap();
    std::fs::write(dir.path().join("~$inventory-42.xlsx"), "lock").unwrap();

    let files = scanner::scan_watch_dir(dir.path()).unwrap();
    assert!(files.is_empty());
}

/// サブフォルダ内の在庫表は対象外
#[test]
fn test_scan_is_not_recursive() {
    let dir = tempdir().expect("Failed to create temp dir");
    let sub = dir.path().join("archive");
    std::fs::create_dir_all(&sub).unwrap();
    std::fs::write(sub.join("inventory-42.xlsx"), "x").unwrap();

    let files = scanner::scan_watch_dir(dir.path()).unwrap();
    assert!(files.is_empty());
}

/// スキーマエラーのメッセージに欠落列が含まれる
#[test]
fn test_schema_error_message() {
    let err: ItemThumbError = item_thumb_common::Error::Schema {
        missing: vec!["Item Code".into(), "Department".into()],
    }
    .into();

    assert!(err.is_schema());
    let msg = err.to_string();
    assert!(msg.contains("Item Code"));
    assert!(msg.contains("Department"));
}

/// IOエラーの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: ItemThumbError = io_err.into();
    assert!(matches!(err, ItemThumbError::Io(_)));
    assert!(!err.is_schema());
}
