use anyhow::Result;

use crate::common::protocol::Response;
use crate::handler::context::HandlerContext;
use crate::handler::router::resolve;

pub async fn handle_get_server_request(client_id: i32, handler_ctx: &HandlerContext) -> Result<Response> {
    let response = match resolve(client_id, handler_ctx).await {
        Ok(assignment) => Response::Server(assignment),
        Err(e) => {
            log::info!("No server for client {}: {}", client_id, e);
            e.into()
        }
    };
    Ok(response)
}
