use std::sync::Arc;

use gatepass_core::clock::Clock;
use gatepass_core::types::Timestamp;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Snapshot store handle.
    pub pool: gatepass_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Time source for decision, scan and lateness timestamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}
