use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::Deserialize;

use pkgprism_core::error::{PkgPrismError, Result};

use crate::collect::CollectConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub version: u32,

    #[serde(default)]
    pub manifest: ManifestSection,

    #[serde(default)]
    pub modules_path: Option<PathBuf>,

    #[serde(default)]
    pub report_missing: bool,

    #[serde(default)]
    pub exporter: ExporterSection,
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PkgPrismError::UnsupportedVersion);
        }
        if matches!(&self.modules_path, Some(p) if p.as_os_str().is_empty()) {
            return Err(PkgPrismError::BadConfig("modules_path must not be empty".into()));
        }

        self.manifest.validate()?;
        self.exporter.validate()?;

        Ok(())
    }

    /// Library options for one collection pass. Registries are left unset so
    /// the usual selection rule applies.
    pub fn into_collect_config(self) -> CollectConfig {
        CollectConfig {
            manifest_path: self.manifest.path,
            manifest: self.manifest.inline,
            modules_path: self.modules_path,
            registries: None,
            port: self.exporter.port,
            host: Some(self.exporter.host),
            report_missing: Some(self.report_missing),
            serve: Some(self.exporter.enabled),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            version: 1,
            manifest: ManifestSection::default(),
            modules_path: None,
            report_missing: false,
            exporter: ExporterSection::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestSection {
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Raw `package.json` text; wins over `path`.
    #[serde(default)]
    pub inline: Option<String>,
}

impl ManifestSection {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.path, Some(p) if p.as_os_str().is_empty()) {
            return Err(PkgPrismError::BadConfig("manifest.path must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Unset means the default port and the shared default registry.
    #[serde(default)]
    pub port: Option<u16>,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            host: default_host(),
            port: None,
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        if self.port == Some(0) {
            return Err(PkgPrismError::BadConfig("exporter.port must be between 1 and 65535".into()));
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}
fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}
