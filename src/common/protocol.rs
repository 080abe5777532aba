use serde::{Deserialize, Serialize};

use crate::common::cluster::{ClusterView, ServerAssignment, ServerInfo};
use crate::common::error::{CoordinatorError, ErrorCode};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Heartbeat(ServerInfo),
    GetServer { client_id: i32 },
    CheckExists { client_id: i32 },
    ListServers,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Heartbeat(_) => "Heartbeat",
            Request::GetServer { .. } => "GetServer",
            Request::CheckExists { .. } => "CheckExists",
            Request::ListServers => "ListServers",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    /// `registered` is false for a first registration, true for a refresh.
    Heartbeat { registered: bool },
    Server(ServerAssignment),
    Exists { active: bool },
    Servers { clusters: Vec<ClusterView> },
    Error { code: ErrorCode, message: String },
}

impl From<CoordinatorError> for Response {
    fn from(err: CoordinatorError) -> Self {
        Response::Error {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RequestEnvelope {
    pub correlation_id: i32,
    pub request: Request,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ResponseEnvelope {
    pub correlation_id: i32,
    pub response: Response,
}
