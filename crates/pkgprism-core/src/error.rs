//! Shared error type across pkgprism crates.

use std::path::PathBuf;

use thiserror::Error;

/// Stable error codes (used in logs and by embedding hosts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Primary manifest could not be read.
    ManifestRead,
    /// Primary manifest is not a valid JSON object.
    ManifestParse,
    /// A metric with the same name already exists in a registry.
    MetricConflict,
    /// Metric name or label set rejected.
    InvalidMetric,
    /// Invalid exporter configuration.
    BadConfig,
    /// Unsupported config file version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in log fields and error bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ManifestRead => "MANIFEST_READ",
            ErrorCode::ManifestParse => "MANIFEST_PARSE",
            ErrorCode::MetricConflict => "METRIC_CONFLICT",
            ErrorCode::InvalidMetric => "INVALID_METRIC",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PkgPrismError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum PkgPrismError {
    #[error("read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest: {0}")]
    ManifestParse(String),
    #[error("metric already registered: {0}")]
    MetricAlreadyRegistered(String),
    #[error("invalid metric: {0}")]
    InvalidMetric(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl PkgPrismError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PkgPrismError::ManifestRead { .. } => ErrorCode::ManifestRead,
            PkgPrismError::ManifestParse(_) => ErrorCode::ManifestParse,
            PkgPrismError::MetricAlreadyRegistered(_) => ErrorCode::MetricConflict,
            PkgPrismError::InvalidMetric(_) => ErrorCode::InvalidMetric,
            PkgPrismError::BadConfig(_) => ErrorCode::BadConfig,
            PkgPrismError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            PkgPrismError::Internal(_) => ErrorCode::Internal,
        }
    }
}
