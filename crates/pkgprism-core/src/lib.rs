//! pkgprism core: manifest parsing, installed-version resolution, and the
//! shared error type.
//!
//! This crate carries no HTTP or runtime dependencies; the exporter crate
//! builds the metric registry and server on top of it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible path
//! surfaces as `PkgPrismError`/`Result`, or as a `Resolution::Absent` where a
//! failure is an expected outcome.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod manifest;
pub mod resolve;

/// Shared result type.
pub use error::{Result, PkgPrismError};
