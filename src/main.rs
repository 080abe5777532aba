use cluster_coordinator::common::config::parse_args;
use cluster_coordinator::server_start;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args)?;
    server_start(&cli).await
}
