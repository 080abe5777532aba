use crate::common::cluster::ServerAssignment;
use crate::common::error::CoordinatorError;
use crate::handler::context::HandlerContext;

/// Every cluster is answered for by a single logical server.
pub const ASSIGNED_SERVER_ID: i32 = 1;

/// Maps a client to its 1-based cluster: `((client_id - 1) mod n) + 1`.
/// The modulo is Euclidean so zero and negative ids stay in range.
pub fn cluster_for_client(client_id: i32, cluster_count: usize) -> i32 {
    let n = cluster_count.max(1) as i64;
    ((client_id as i64 - 1).rem_euclid(n) + 1) as i32
}

/// Address of the current server of the client's cluster, provided that
/// server is still active.
pub async fn resolve(client_id: i32, handler_ctx: &HandlerContext) -> Result<ServerAssignment, CoordinatorError> {
    let cluster_id = cluster_for_client(client_id, handler_ctx.registry.cluster_count());
    log::info!("Assigning client {} to cluster {}", client_id, cluster_id);

    let slots = handler_ctx.registry.lock().await;
    let now = handler_ctx.clock.now();
    match slots.last_of(cluster_id)? {
        Some(record) if record.is_active(now, handler_ctx.liveness.recovery_window) => Ok(ServerAssignment {
            server_id: ASSIGNED_SERVER_ID,
            cluster_id,
            hostname: record.hostname.clone(),
            port: record.port.clone(),
        }),
        _ => Err(CoordinatorError::Unavailable { cluster_id }),
    }
}

/// True when the current server of the client's cluster heartbeated within
/// `exists_window`. The missed-heartbeat flag plays no part here.
pub async fn check_availability(client_id: i32, handler_ctx: &HandlerContext) -> Result<bool, CoordinatorError> {
    let cluster_id = cluster_for_client(client_id, handler_ctx.registry.cluster_count());
    log::debug!(
        "Checking if server {} on cluster {} exists",
        ASSIGNED_SERVER_ID,
        cluster_id
    );

    let slots = handler_ctx.registry.lock().await;
    let now = handler_ctx.clock.now();
    Ok(slots
        .last_of(cluster_id)?
        .is_some_and(|record| record.elapsed(now) < handler_ctx.liveness.exists_window))
}
