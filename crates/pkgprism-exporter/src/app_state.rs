//! Shared state for the exposition server.

use std::sync::Arc;

use pkgprism_core::error::Result;

use crate::obs::Registry;

#[derive(Clone)]
pub struct AppState {
    registries: Arc<[Arc<Registry>]>,
}

impl AppState {
    pub fn new(registries: Vec<Arc<Registry>>) -> Self {
        Self {
            registries: registries.into(),
        }
    }

    /// Merge and render on every call; registries may change after startup.
    pub fn render_metrics(&self) -> Result<String> {
        Registry::merge_render(&self.registries)
    }
}
