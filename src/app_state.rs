//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::SweepRunner;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Sweep driver for the administrative endpoint.
    pub sweep_runner: Arc<SweepRunner>,
    /// Bearer secret required by admin endpoints. `None` rejects all.
    pub sweep_secret: Option<Arc<str>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sweep_runner", &self.sweep_runner)
            .field("sweep_secret", &self.sweep_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
