//! Package inventory collection.
//!
//! One pass per call: load the manifest, resolve each declared dependency,
//! record one counter increment per entry, then optionally start the
//! exposition server on a detached task.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use pkgprism_core::error::Result;
use pkgprism_core::manifest::{Manifest, ManifestSource};
use pkgprism_core::resolve::{VersionResolver, DEFAULT_MODULES_PATH};

use crate::obs::{CounterVec, Registry};
use crate::server;

pub const DEFAULT_PORT: u16 = 9991;
pub const METRIC_NAME: &str = "npm_packages_installed";
pub const METRIC_HELP: &str = "npm packages installed for this project";

pub const LABEL_TYPE: &str = "package_type";
pub const LABEL_NAME: &str = "package_name";
pub const LABEL_VERSION: &str = "package_version";

/// Caller-facing options. Every field is optional; see [`CollectConfig::resolve`].
#[derive(Debug, Clone, Default)]
pub struct CollectConfig {
    /// Primary manifest file. Defaults to `./package.json`.
    pub manifest_path: Option<PathBuf>,
    /// Manifest content already in memory. Wins over `manifest_path`.
    pub manifest: Option<String>,
    /// Module install prefix. Defaults to `./node_modules/`.
    pub modules_path: Option<PathBuf>,
    /// Registries to populate and serve.
    pub registries: Option<Vec<Arc<Registry>>>,
    /// Listen port. Setting it without `registries` isolates into a fresh
    /// registry. `Some(0)` counts as unset.
    pub port: Option<u16>,
    pub host: Option<IpAddr>,
    /// Log installed-version lookups that fail.
    pub report_missing: Option<bool>,
    /// Start the built-in server. Only an explicit `false` disables it.
    pub serve: Option<bool>,
}

/// `CollectConfig` with defaults applied.
#[derive(Debug)]
pub struct Settings {
    pub source: ManifestSource,
    pub resolver: VersionResolver,
    pub registries: Vec<Arc<Registry>>,
    pub listen: SocketAddr,
    pub serve: bool,
}

impl CollectConfig {
    /// Apply defaults. Registry choice: explicit list, else a fresh registry
    /// when a port was given, else `default_registry`.
    pub fn resolve(&self, default_registry: &Arc<Registry>) -> Settings {
        let port = self.port.filter(|p| *p != 0);
        let registries = match (&self.registries, port) {
            (Some(list), _) => list.clone(),
            (None, Some(_)) => vec![Arc::new(Registry::new())],
            (None, None) => vec![Arc::clone(default_registry)],
        };

        let modules_path = self
            .modules_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODULES_PATH));

        Settings {
            source: ManifestSource::select(self.manifest.as_deref(), self.manifest_path.as_deref()),
            resolver: VersionResolver::new(modules_path, self.report_missing.unwrap_or(false)),
            registries,
            listen: SocketAddr::new(
                self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
                port.unwrap_or(DEFAULT_PORT),
            ),
            serve: self.serve != Some(false),
        }
    }
}

/// Register the installed-packages counter in every registry and record one
/// increment per declared dependency (dev dependencies first).
pub fn record_packages(
    manifest: &Manifest,
    resolver: &VersionResolver,
    registries: &[Arc<Registry>],
) -> Result<Arc<CounterVec>> {
    let counter = Arc::new(CounterVec::new(
        METRIC_NAME,
        METRIC_HELP,
        &[LABEL_TYPE, LABEL_NAME, LABEL_VERSION],
    )?);
    for reg in registries {
        reg.register(Arc::clone(&counter))?;
    }

    for (class, name, declared) in manifest.declared() {
        let version = resolver.resolve(name).or_declared(declared);
        counter.inc(&[
            (LABEL_TYPE, class.as_str()),
            (LABEL_NAME, name),
            (LABEL_VERSION, version.as_str()),
        ])?;
    }

    tracing::debug!(packages = manifest.dependency_count(), "recorded package inventory");
    Ok(counter)
}

/// Load, record, and (unless disabled) serve.
///
/// Returns `Ok(true)` once observations are recorded, whether or not the
/// server came up. Manifest read and parse failures are returned as errors.
/// Must be called inside a tokio runtime when serving is enabled.
pub async fn collect_package_info(cfg: &CollectConfig, default_registry: &Arc<Registry>) -> Result<bool> {
    let settings = cfg.resolve(default_registry);

    let manifest = settings.source.load()?;
    record_packages(&manifest, &settings.resolver, &settings.registries)?;

    if settings.serve {
        match server::start(settings.listen, settings.registries).await {
            Ok(handle) => handle.detach(),
            Err(e) => {
                tracing::error!(listen = %settings.listen, code = e.code().as_str(), error = %e, "metrics server failed to start")
            }
        }
    }

    Ok(true)
}
