use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// What a worker reports about itself in a heartbeat.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub server_id: i32,
    pub cluster_id: i32,
    pub hostname: String,
    pub port: String,
    #[serde(default)]
    pub server_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRecord {
    pub server_id: i32,
    pub cluster_id: i32,
    pub hostname: String,
    pub port: String,
    pub server_type: String,
    /// Last heartbeat, or the moment the sweeper flagged the record.
    pub last_heartbeat_at: DateTime<Utc>,
    pub missed_heartbeat: bool,
}

impl ServerRecord {
    pub fn from_heartbeat(info: &ServerInfo, now: DateTime<Utc>) -> Self {
        Self {
            server_id: info.server_id,
            cluster_id: info.cluster_id,
            hostname: info.hostname.clone(),
            port: info.port.clone(),
            server_type: info.server_type.clone(),
            last_heartbeat_at: now,
            missed_heartbeat: false,
        }
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.last_heartbeat_at
    }

    /// Unflagged records are always active. Flagged ones stay active until
    /// `recovery_window` has passed since `last_heartbeat_at`.
    pub fn is_active(&self, now: DateTime<Utc>, recovery_window: TimeDelta) -> bool {
        !self.missed_heartbeat || self.elapsed(now) < recovery_window
    }

    pub fn to_view(&self, now: DateTime<Utc>, recovery_window: TimeDelta) -> ServerView {
        ServerView {
            server_id: self.server_id,
            cluster_id: self.cluster_id,
            hostname: self.hostname.clone(),
            port: self.port.clone(),
            server_type: self.server_type.clone(),
            heartbeat_time: self.last_heartbeat_at.timestamp_millis(),
            missed_heartbeat: self.missed_heartbeat,
            active: self.is_active(now, recovery_window),
        }
    }
}

/// Address handed to clients by `GetServer`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerAssignment {
    pub server_id: i32,
    pub cluster_id: i32,
    pub hostname: String,
    pub port: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerView {
    pub server_id: i32,
    pub cluster_id: i32,
    pub hostname: String,
    pub port: String,
    pub server_type: String,
    pub heartbeat_time: i64, // milliseconds since UNIX_EPOCH
    pub missed_heartbeat: bool,
    pub active: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ClusterView {
    pub cluster_id: i32,
    /// Oldest first; the last entry is the current server.
    pub servers: Vec<ServerView>,
}

impl ClusterView {
    pub fn current(&self) -> Option<&ServerView> {
        self.servers.last()
    }
}
