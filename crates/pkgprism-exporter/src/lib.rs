//! pkgprism exporter library entry.
//!
//! Wires manifest loading and version resolution from `pkgprism-core` into an
//! in-process metric registry and a one-route axum server. Consumed by the
//! binary (`main.rs`), by host applications that embed the exporter, and by
//! integration tests.

pub mod app_state;
pub mod collect;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;

pub use collect::{collect_package_info, record_packages, CollectConfig};
pub use obs::{CounterVec, Registry};
pub use server::ServerHandle;
