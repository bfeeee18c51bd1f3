//! Exporter config file loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use pkgprism_core::error::{PkgPrismError, Result};

pub use schema::{ExporterSection, FileConfig, ManifestSection};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<FileConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| PkgPrismError::BadConfig(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<FileConfig> {
    let cfg: FileConfig = serde_yaml::from_str(s)
        .map_err(|e| PkgPrismError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
