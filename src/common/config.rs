use anyhow::{Result, bail};
use chrono::TimeDelta;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3010;
pub const DEFAULT_CLUSTER_COUNT: usize = 3;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cluster_count: usize,
    pub sweep_interval_ms: u64,
    pub stale_threshold_ms: u64,
    pub recovery_window_ms: u64,
    pub exists_window_ms: u64,
    pub max_frame_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cluster_count: DEFAULT_CLUSTER_COUNT,
            sweep_interval_ms: 3_000,
            stale_threshold_ms: 10_000,
            recovery_window_ms: 10_000,
            exists_window_ms: 1_000,
            max_frame_len: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn liveness(&self) -> LivenessConfig {
        LivenessConfig {
            sweep_interval: Duration::from_millis(self.sweep_interval_ms),
            stale_threshold: TimeDelta::milliseconds(self.stale_threshold_ms as i64),
            recovery_window: TimeDelta::milliseconds(self.recovery_window_ms as i64),
            exists_window: TimeDelta::milliseconds(self.exists_window_ms as i64),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cluster_count == 0 {
            bail!("cluster_count must be at least 1");
        }
        if self.sweep_interval_ms == 0
            || self.stale_threshold_ms == 0
            || self.recovery_window_ms == 0
            || self.exists_window_ms == 0
        {
            bail!("liveness intervals and thresholds must be non-zero");
        }
        if self.max_frame_len == 0 {
            bail!("max_frame_len must be non-zero");
        }
        Ok(())
    }
}

/// Timing knobs for the liveness checks. `recovery_window` drives
/// `GetServer`, `exists_window` drives `CheckExists`.
#[derive(Debug, Clone, Copy)]
pub struct LivenessConfig {
    pub sweep_interval: Duration,
    pub stale_threshold: TimeDelta,
    pub recovery_window: TimeDelta,
    pub exists_window: TimeDelta,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        ServerConfig::default().liveness()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<String>,
    pub port: Option<u16>,
}

pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-p" | "--port" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{} requires a value", arg))?;
                cli.port = Some(value.parse().map_err(|e| anyhow::anyhow!("invalid port {:?}: {}", value, e))?);
            }
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a value"))?;
                cli.config_path = Some(value.clone());
            }
            other => {
                log::warn!("Ignoring unknown argument {:?}", other);
            }
        }
    }
    Ok(cli)
}

/// Defaults, then the optional config file, then `COORDINATOR_*` env vars,
/// then the CLI port.
pub fn load_server_config(cli: &CliArgs) -> Result<ServerConfig> {
    dotenv::dotenv().ok();
    let defaults = ServerConfig::default();

    let mut builder = config::Config::builder()
        .set_default("host", defaults.host.clone())?
        .set_default("port", defaults.port as i64)?
        .set_default("cluster_count", defaults.cluster_count as i64)?
        .set_default("sweep_interval_ms", defaults.sweep_interval_ms as i64)?
        .set_default("stale_threshold_ms", defaults.stale_threshold_ms as i64)?
        .set_default("recovery_window_ms", defaults.recovery_window_ms as i64)?
        .set_default("exists_window_ms", defaults.exists_window_ms as i64)?
        .set_default("max_frame_len", defaults.max_frame_len as i64)?;

    if let Some(path) = &cli.config_path {
        builder = builder.add_source(config::File::with_name(path).required(true));
    }

    let config = builder
        .add_source(config::Environment::with_prefix("COORDINATOR").try_parsing(true))
        .set_override_option("port", cli.port.map(|p| p as i64))?
        .build()?;

    let server_config: ServerConfig = config.try_deserialize()?;
    server_config.validate()?;
    Ok(server_config)
}
