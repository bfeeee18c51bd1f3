//! pkgprism exporter binary.
//!
//! Reads `package.json`, records installed dependency versions, and serves
//! them on `/metrics` until interrupted.
//!
//! Config: first argument, else `pkgprism.yaml` when present, else defaults.

use std::path::Path;

use tracing_subscriber::{fmt, EnvFilter};

use pkgprism_core::error::{PkgPrismError, Result};
use pkgprism_exporter::{collect_package_info, config, Registry};

const DEFAULT_CONFIG: &str = "pkgprism.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => config::load_from_file(DEFAULT_CONFIG)?,
        None => config::FileConfig::default(),
    };

    let recorded = collect_package_info(&cfg.into_collect_config(), &Registry::global()).await?;
    if !recorded {
        tracing::warn!("no manifest to record");
    }

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| PkgPrismError::Internal(format!("signal handler failed: {e}")))?;
    tracing::info!("pkgprism exporter shutting down");
    Ok(())
}
