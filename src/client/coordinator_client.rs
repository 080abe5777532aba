use anyhow::{Result, anyhow, bail};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::common::cluster::{ClusterView, ServerAssignment, ServerInfo};
use crate::common::config::ServerConfig;
use crate::common::error::CoordinatorError;
use crate::common::frame::{read_frame, write_frame};
use crate::common::protocol::{Request, RequestEnvelope, Response, ResponseEnvelope};

/// One connection to a coordinator; requests are issued one at a time.
///
/// Error responses surface as `CoordinatorError::Remote` inside the
/// returned `anyhow::Error`.
pub struct CoordinatorClient {
    stream: TcpStream,
    next_correlation_id: i32,
    max_frame_len: usize,
}

impl CoordinatorClient {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream,
            next_correlation_id: 0,
            max_frame_len: ServerConfig::default().max_frame_len,
        })
    }

    pub async fn call(&mut self, request: Request) -> Result<Response> {
        let correlation_id = self.next_correlation_id;
        self.next_correlation_id = self.next_correlation_id.wrapping_add(1);

        write_frame(&mut self.stream, &RequestEnvelope { correlation_id, request }).await?;
        let frame = read_frame(&mut self.stream, self.max_frame_len)
            .await?
            .ok_or_else(|| anyhow!("coordinator closed the connection"))?;
        let envelope: ResponseEnvelope = serde_json::from_slice(&frame)?;
        if envelope.correlation_id != correlation_id {
            bail!(
                "correlation id mismatch: sent {}, received {}",
                correlation_id,
                envelope.correlation_id
            );
        }

        match envelope.response {
            Response::Error { code, message } => Err(CoordinatorError::Remote { code, message }.into()),
            response => Ok(response),
        }
    }

    /// Returns `false` on first registration and `true` on a refresh.
    pub async fn heartbeat(&mut self, info: &ServerInfo) -> Result<bool> {
        match self.call(Request::Heartbeat(info.clone())).await? {
            Response::Heartbeat { registered } => Ok(registered),
            other => Err(unexpected("Heartbeat", &other)),
        }
    }

    pub async fn get_server(&mut self, client_id: i32) -> Result<ServerAssignment> {
        match self.call(Request::GetServer { client_id }).await? {
            Response::Server(assignment) => Ok(assignment),
            other => Err(unexpected("GetServer", &other)),
        }
    }

    pub async fn check_exists(&mut self, client_id: i32) -> Result<bool> {
        match self.call(Request::CheckExists { client_id }).await? {
            Response::Exists { active } => Ok(active),
            other => Err(unexpected("CheckExists", &other)),
        }
    }

    pub async fn list_servers(&mut self) -> Result<Vec<ClusterView>> {
        match self.call(Request::ListServers).await? {
            Response::Servers { clusters } => Ok(clusters),
            other => Err(unexpected("ListServers", &other)),
        }
    }
}

fn unexpected(request: &str, response: &Response) -> anyhow::Error {
    anyhow!("unexpected response to {}: {:?}", request, response)
}
