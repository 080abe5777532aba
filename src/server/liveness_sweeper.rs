use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::common::config::LivenessConfig;
use crate::common::time::Clock;
use crate::storage::cluster_registry::ClusterRegistry;

/// Periodically flags records whose last heartbeat is older than the
/// stale threshold.
pub struct LivenessSweeper {
    registry: Arc<ClusterRegistry>,
    clock: Arc<dyn Clock>,
    liveness: LivenessConfig,
}

impl LivenessSweeper {
    pub fn new(registry: Arc<ClusterRegistry>, clock: Arc<dyn Clock>, liveness: LivenessConfig) -> Self {
        Self {
            registry,
            clock,
            liveness,
        }
    }

    /// One scan over every record of every cluster. Flagging a record also
    /// restarts its clock, so it is not flagged again until a full threshold
    /// has passed. Returns the number of records flagged by this scan.
    pub async fn sweep_once(&self) -> usize {
        let mut slots = self.registry.lock().await;
        let now = self.clock.now();
        let mut flagged = 0;

        for record in slots.records_mut() {
            if record.elapsed(now) <= self.liveness.stale_threshold {
                continue;
            }
            if record.missed_heartbeat {
                log::debug!(
                    "Server {} on cluster {} still missing heartbeats",
                    record.server_id,
                    record.cluster_id
                );
                continue;
            }
            record.missed_heartbeat = true;
            record.last_heartbeat_at = now;
            flagged += 1;
            log::warn!(
                "Missed heartbeat from server {} on cluster {}",
                record.server_id,
                record.cluster_id
            );
        }
        flagged
    }

    /// Sweeps until `shutdown` turns true or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        log::info!(
            "Liveness sweeper started (interval {:?}, threshold {}ms)",
            self.liveness.sweep_interval,
            self.liveness.stale_threshold.num_milliseconds()
        );
        while !*shutdown.borrow() {
            self.sweep_once().await;
            tokio::select! {
                _ = tokio::time::sleep(self.liveness.sweep_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        log::info!("Liveness sweeper stopped");
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
