#![allow(non_snake_case)]

use super::*;
use tempfile::TempDir;

#[test]
fn write_atomic___new_file___writes_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("client.ts");

    write_atomic(&path, b"export {};\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "export {};\n");
}

#[test]
fn write_atomic___existing_file___is_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("types.go");
    std::fs::write(&path, "old contents that are longer").unwrap();

    write_atomic(&path, b"new").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
}

#[test]
fn write_atomic___leaves_no_temp_files() {
    let dir = TempDir::new().unwrap();

    write_atomic(dir.path().join("a.ts"), b"a").unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn write_atomic___missing_directory___is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("client.ts");

    let err = write_atomic(&path, b"x").unwrap_err();

    assert!(matches!(err, CodegenError::Io { .. }));
    assert!(!path.exists());
}
