use std::sync::{Arc, Mutex};

use crate::engine::DEFAULT_ENGINE;
use crate::logging::Logger;
use crate::metrics::RouterMetrics;

use super::audit::{NullRouterAudit, RouterAudit};

/// Section name the router registers with the state store.
pub const DEFAULT_STATE_SECTION: &str = "UI";

/// Configuration knobs for the router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Engine used when a requested name does not resolve.
    pub default_engine: String,
    /// Section the selection is persisted under.
    pub state_section: String,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Counters shared with whoever reports them.
    pub metrics: Option<Arc<Mutex<RouterMetrics>>>,
    /// Receives every routing checkpoint.
    pub audit: Arc<dyn RouterAudit>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_engine: DEFAULT_ENGINE.to_string(),
            state_section: DEFAULT_STATE_SECTION.to_string(),
            logger: None,
            metrics: None,
            audit: Arc::new(NullRouterAudit),
        }
    }
}

impl RouterConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RouterMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RouterMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}
