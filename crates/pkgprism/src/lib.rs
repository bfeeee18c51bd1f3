//! Top-level facade crate for pkgprism.
//!
//! Re-exports core types and the exporter library so users can depend on a single crate.

pub mod core {
    pub use pkgprism_core::*;
}

pub mod exporter {
    pub use pkgprism_exporter::*;
}

pub use pkgprism_exporter::{collect_package_info, CollectConfig, Registry};
