//! `./package.json` lookup relative to the working directory.
//!
//! Kept as the only test in this binary: it changes the process cwd.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::env;
use std::fs;

use pkgprism_core::manifest::{ManifestSource, MANIFEST_FILE};

#[test]
fn default_path_is_lowest_precedence() {
    let cwd = tempfile::tempdir().unwrap();
    fs::write(
        cwd.path().join(MANIFEST_FILE),
        r#"{"name":"cwd-default","dependencies":{"left-pad":"^1.3.0"}}"#,
    )
    .unwrap();
    let explicit = tempfile::tempdir().unwrap();
    let explicit_path = explicit.path().join("app.json");
    fs::write(&explicit_path, r#"{"name":"explicit","dependencies":{"express":"^4.18.0"}}"#).unwrap();

    let original = env::current_dir().unwrap();
    env::set_current_dir(cwd.path()).unwrap();

    let default = ManifestSource::select(None, None).load();
    let by_path = ManifestSource::select(None, Some(explicit_path.as_path())).load();
    let inline = ManifestSource::select(Some(r#"{"name":"inline"}"#), Some(explicit_path.as_path())).load();

    fs::remove_file(cwd.path().join(MANIFEST_FILE)).unwrap();
    let missing = ManifestSource::Default.load();

    env::set_current_dir(original).unwrap();

    let default = default.unwrap();
    assert_eq!(default.name.as_deref(), Some("cwd-default"));
    assert!(default.dependencies.contains_key("left-pad"));

    let by_path = by_path.unwrap();
    assert_eq!(by_path.name.as_deref(), Some("explicit"));
    assert!(!by_path.dependencies.contains_key("left-pad"));

    assert_eq!(inline.unwrap().name.as_deref(), Some("inline"));

    let err = missing.expect_err("no ./package.json left");
    assert_eq!(err.code().as_str(), "MANIFEST_READ");
}
