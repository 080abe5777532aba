use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;

use crate::client::coordinator_client::CoordinatorClient;
use crate::common::cluster::ServerInfo;

pub async fn send_heartbeat(client: &mut CoordinatorClient, info: &ServerInfo) -> Result<bool> {
    match client.heartbeat(info).await {
        Ok(registered) => {
            log::debug!("Heartbeat sent successfully (registered: {})", registered);
            Ok(registered)
        }
        Err(e) => {
            log::warn!("Failed to send heartbeat: {:?}", e);
            Err(e)
        }
    }
}

/// Worker side: heartbeat every `interval` until `shutdown` fires.
/// Failures drop the connection and the next tick reconnects.
pub async fn run_heartbeat_loop(
    coordinator_addr: String,
    info: ServerInfo,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut client: Option<CoordinatorClient> = None;
    let mut ticker = tokio::time::interval(interval);

    while !*shutdown.borrow() {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
        }

        if client.is_none() {
            match CoordinatorClient::connect(coordinator_addr.as_str()).await {
                Ok(c) => client = Some(c),
                Err(e) => {
                    log::warn!("Failed to connect to coordinator {}: {:?}", coordinator_addr, e);
                    continue;
                }
            }
        }

        if let Some(c) = client.as_mut() {
            if send_heartbeat(c, &info).await.is_err() {
                client = None;
            }
        }
    }
}
