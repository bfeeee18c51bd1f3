//! Manifest source precedence against real files.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use pkgprism_core::manifest::{ManifestSource, DependencyClass};

const PATH_MANIFEST: &str = r#"{"name":"from-path","dependencies":{"express":"^4.18.0"}}"#;
const INLINE_MANIFEST: &str = r#"{"name":"inline","devDependencies":{"jest":"^29.0.0"}}"#;

#[test]
fn inline_wins_over_valid_path() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("package.json");
    fs::write(&path, PATH_MANIFEST).unwrap();

    let m = ManifestSource::select(Some(INLINE_MANIFEST), Some(path.as_path())).load().unwrap();
    assert_eq!(m.name.as_deref(), Some("inline"));
    let declared: Vec<_> = m.declared().collect();
    assert_eq!(declared, vec![(DependencyClass::Dev, "jest", "^29.0.0")]);
}

#[test]
fn path_is_read_when_no_inline() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("package.json");
    fs::write(&path, PATH_MANIFEST).unwrap();

    let m = ManifestSource::select(None, Some(path.as_path())).load().unwrap();
    assert_eq!(m.name.as_deref(), Some("from-path"));
    assert_eq!(m.dependencies.get("express").map(String::as_str), Some("^4.18.0"));
}

#[test]
fn malformed_path_content_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("package.json");
    fs::write(&path, "{\"dependencies\": [").unwrap();

    let err = ManifestSource::Path(path).load().expect_err("must fail");
    assert_eq!(err.code().as_str(), "MANIFEST_PARSE");
}

#[test]
fn missing_path_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let err = ManifestSource::Path(tmp.path().join("absent.json")).load().expect_err("must fail");
    assert_eq!(err.code().as_str(), "MANIFEST_READ");
    assert!(err.to_string().contains("absent.json"));
}
