#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use cluster_coordinator::common::cluster::ServerInfo;
use cluster_coordinator::common::config::LivenessConfig;
use cluster_coordinator::common::time::ManualClock;
use cluster_coordinator::handler::context::HandlerContext;
use cluster_coordinator::server::server::serve;
use cluster_coordinator::storage::cluster_registry::ClusterRegistry;
use tokio::net::TcpListener;
use tokio::sync::watch;

pub fn manual_context(cluster_count: usize) -> (HandlerContext, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let ctx = HandlerContext::new(
        Arc::new(ClusterRegistry::new(cluster_count)),
        clock.clone(),
        LivenessConfig::default(),
    );
    (ctx, clock)
}

pub fn server_info(server_id: i32, cluster_id: i32, hostname: &str, port: &str) -> ServerInfo {
    ServerInfo {
        server_id,
        cluster_id,
        hostname: hostname.to_string(),
        port: port.to_string(),
        server_type: String::new(),
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: watch::Sender<bool>,
    pub handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

pub async fn start_server(ctx: HandlerContext, max_frame_len: usize) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, rx) = watch::channel(false);
    let handle = tokio::spawn(serve(listener, ctx, max_frame_len, rx));
    TestServer { addr, shutdown, handle }
}
