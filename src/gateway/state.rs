//! Gateway State
//!
//! Shared state accessible by all gateway handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::client::RequestCache;
use crate::config::GatewayConfig;
use crate::routing::RouteTable;

/// Shared application state for all handlers
///
/// Holds no session: every browser carries its own in cookies.
#[derive(Clone)]
pub struct AppState {
    /// Route tree the gateway serves
    pub routes: Arc<RouteTable>,
    /// Backend access shared by all visitors, keyed by token
    pub cache: Arc<RequestCache>,
    /// Gateway configuration
    pub config: Arc<GatewayConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(routes: RouteTable, cache: Arc<RequestCache>, config: GatewayConfig) -> Self {
        Self {
            routes: Arc::new(routes),
            cache,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
