use anyhow::Result;

use crate::common::cluster::{ServerInfo, ServerRecord};
use crate::common::error::CoordinatorError;
use crate::common::protocol::Response;
use crate::handler::context::HandlerContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatOutcome {
    Registered,
    Refreshed,
}

impl HeartbeatOutcome {
    /// Wire form: `false` for a first registration, `true` for a refresh.
    pub fn already_registered(&self) -> bool {
        matches!(self, HeartbeatOutcome::Refreshed)
    }
}

/// Creates the cluster's first record, or refreshes the cluster's current
/// record. The reporting server id is not compared against the current
/// record, so any heartbeat for a non-empty cluster refreshes it.
pub async fn record_heartbeat(
    info: &ServerInfo,
    handler_ctx: &HandlerContext,
) -> Result<HeartbeatOutcome, CoordinatorError> {
    log::info!(
        "Received heartbeat from server {} to cluster {}",
        info.server_id,
        info.cluster_id
    );

    let mut slots = handler_ctx.registry.lock().await;
    let now = handler_ctx.clock.now();

    if slots.refresh_last(info.cluster_id, now)? {
        log::debug!("Refreshed current server of cluster {}", info.cluster_id);
        return Ok(HeartbeatOutcome::Refreshed);
    }

    slots.register(info.cluster_id, ServerRecord::from_heartbeat(info, now))?;
    log::info!(
        "Registered server {} at {}:{} as current server of cluster {}",
        info.server_id,
        info.hostname,
        info.port,
        info.cluster_id
    );
    Ok(HeartbeatOutcome::Registered)
}

pub async fn handle_heartbeat_request(info: &ServerInfo, handler_ctx: &HandlerContext) -> Result<Response> {
    let response = match record_heartbeat(info, handler_ctx).await {
        Ok(outcome) => Response::Heartbeat {
            registered: outcome.already_registered(),
        },
        Err(e) => {
            log::warn!("Rejected heartbeat from server {}: {}", info.server_id, e);
            e.into()
        }
    };
    Ok(response)
}
