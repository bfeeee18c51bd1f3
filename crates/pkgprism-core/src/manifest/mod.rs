//! Primary manifest loading.
//!
//! A manifest comes from exactly one source, picked by precedence: inline
//! content, then an explicit path, then `./package.json`. Read and parse
//! failures are returned to the caller; there is no fallback content.

pub mod package;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PkgPrismError, Result};

pub use package::{Author, DependencyClass, Manifest};

/// Manifest file name, both for the project and for installed packages.
pub const MANIFEST_FILE: &str = "package.json";

/// Where the primary manifest is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Inline(String),
    Path(PathBuf),
    Default,
}

impl ManifestSource {
    /// Pick the highest-precedence source that was supplied.
    pub fn select(inline: Option<&str>, path: Option<&Path>) -> Self {
        match (inline, path) {
            (Some(s), _) => ManifestSource::Inline(s.to_string()),
            (None, Some(p)) => ManifestSource::Path(p.to_path_buf()),
            (None, None) => ManifestSource::Default,
        }
    }

    pub fn load(&self) -> Result<Manifest> {
        match self {
            ManifestSource::Inline(s) => load_from_str(s),
            ManifestSource::Path(p) => load_from_file(p),
            ManifestSource::Default => load_from_file(Path::new(".").join(MANIFEST_FILE)),
        }
    }
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<Manifest> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|source| PkgPrismError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&s)
}

/// Strict decode: the document must be a JSON object.
pub fn load_from_str(s: &str) -> Result<Manifest> {
    let value: serde_json::Value = serde_json::from_str(s)
        .map_err(|e| PkgPrismError::ManifestParse(format!("invalid json: {e}")))?;
    if !value.is_object() {
        return Err(PkgPrismError::ManifestParse("manifest must be a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| PkgPrismError::ManifestParse(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn missing_maps_are_empty() {
        let m = load_from_str(r#"{"name":"app","version":"1.0.0"}"#).unwrap();
        assert_eq!(m.name.as_deref(), Some("app"));
        assert!(m.dependencies.is_empty());
        assert!(m.dev_dependencies.is_empty());
    }

    #[test]
    fn non_object_is_rejected() {
        for bad in ["[]", "\"package\"", "42", "null"] {
            let err = load_from_str(bad).expect_err("must fail");
            assert_eq!(err.code(), ErrorCode::ManifestParse, "input: {bad}");
        }
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = load_from_str(r#"{"dependencies": {"#).expect_err("must fail");
        assert_eq!(err.code().as_str(), "MANIFEST_PARSE");
    }

    #[test]
    fn non_string_range_is_rejected() {
        let err = load_from_str(r#"{"dependencies":{"a":1}}"#).expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::ManifestParse);
    }

    #[test]
    fn select_prefers_inline_then_path() {
        let p = Path::new("x/package.json");
        assert_eq!(
            ManifestSource::select(Some("{}"), Some(p)),
            ManifestSource::Inline("{}".into())
        );
        assert_eq!(ManifestSource::select(None, Some(p)), ManifestSource::Path(p.into()));
        assert_eq!(ManifestSource::select(None, None), ManifestSource::Default);
    }

    #[test]
    fn unreadable_path_is_read_error() {
        let err = load_from_file("/definitely/not/here/package.json").expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::ManifestRead);
    }
}
