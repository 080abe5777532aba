use std::sync::Arc;

use crate::common::config::LivenessConfig;
use crate::common::time::{Clock, SystemClock};
use crate::storage::cluster_registry::ClusterRegistry;

#[derive(Clone)]
pub struct HandlerContext {
    pub registry: Arc<ClusterRegistry>,
    pub clock: Arc<dyn Clock>,
    pub liveness: LivenessConfig,
}

impl HandlerContext {
    pub fn new(registry: Arc<ClusterRegistry>, clock: Arc<dyn Clock>, liveness: LivenessConfig) -> Self {
        Self {
            registry,
            clock,
            liveness,
        }
    }

    pub fn with_system_clock(cluster_count: usize, liveness: LivenessConfig) -> Self {
        Self::new(
            Arc::new(ClusterRegistry::new(cluster_count)),
            Arc::new(SystemClock),
            liveness,
        )
    }
}
