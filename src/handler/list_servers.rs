use anyhow::Result;

use crate::common::cluster::ClusterView;
use crate::common::protocol::Response;
use crate::handler::context::HandlerContext;

pub async fn list_clusters(handler_ctx: &HandlerContext) -> Vec<ClusterView> {
    let slots = handler_ctx.registry.lock().await;
    let now = handler_ctx.clock.now();
    let recovery_window = handler_ctx.liveness.recovery_window;
    slots
        .iter()
        .map(|(cluster_id, records)| ClusterView {
            cluster_id,
            servers: records
                .iter()
                .map(|record| record.to_view(now, recovery_window))
                .collect(),
        })
        .collect()
}

pub async fn handle_list_servers_request(handler_ctx: &HandlerContext) -> Result<Response> {
    let clusters = list_clusters(handler_ctx).await;
    log::debug!("Listing {} clusters", clusters.len());
    Ok(Response::Servers { clusters })
}
