use anyhow::Result;

use crate::common::error::{CoordinatorError, ErrorCode};
use crate::common::frame::encode_frame;
use crate::common::protocol::{Request, RequestEnvelope, Response, ResponseEnvelope};
use crate::handler::{
    check_exists::handle_check_exists_request, context::HandlerContext,
    get_server::handle_get_server_request, heartbeat::handle_heartbeat_request,
    list_servers::handle_list_servers_request,
};

/// Best-effort read of the correlation id from a frame that failed to
/// decode as a request. Must never panic.
pub fn peek_correlation_id(frame: &[u8]) -> Option<i32> {
    let value: serde_json::Value = serde_json::from_slice(frame).ok()?;
    value
        .get("correlation_id")?
        .as_i64()
        .and_then(|id| i32::try_from(id).ok())
}

pub async fn dispatch_request(request: &Request, handler_ctx: &HandlerContext) -> Result<Response> {
    log::debug!("{} Request", request.name());
    match request {
        Request::Heartbeat(info) => handle_heartbeat_request(info, handler_ctx).await,
        Request::GetServer { client_id } => handle_get_server_request(*client_id, handler_ctx).await,
        Request::CheckExists { client_id } => handle_check_exists_request(*client_id, handler_ctx).await,
        Request::ListServers => handle_list_servers_request(handler_ctx).await,
    }
}

/// Decodes one frame body, runs its handler and returns the encoded
/// response frame. Undecodable frames get an `invalid_request` response.
pub async fn dispatch_frame(frame: &[u8], handler_ctx: &HandlerContext) -> Result<Vec<u8>> {
    let (correlation_id, response) = match serde_json::from_slice::<RequestEnvelope>(frame) {
        Ok(envelope) => {
            let response = match dispatch_request(&envelope.request, handler_ctx).await {
                Ok(response) => response,
                Err(e) => {
                    log::error!("Failed to handle {} request: {:?}", envelope.request.name(), e);
                    Response::Error {
                        code: ErrorCode::Internal,
                        message: e.to_string(),
                    }
                }
            };
            (envelope.correlation_id, response)
        }
        Err(e) => {
            log::warn!("Failed to decode request: {}", e);
            let err = CoordinatorError::InvalidRequest { message: e.to_string() };
            (peek_correlation_id(frame).unwrap_or(-1), err.into())
        }
    };

    encode_frame(&ResponseEnvelope {
        correlation_id,
        response,
    })
}
