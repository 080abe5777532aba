use anyhow::Result;

use crate::common::protocol::Response;
use crate::handler::context::HandlerContext;
use crate::handler::router::check_availability;

pub async fn handle_check_exists_request(client_id: i32, handler_ctx: &HandlerContext) -> Result<Response> {
    let response = match check_availability(client_id, handler_ctx).await {
        Ok(active) => Response::Exists { active },
        Err(e) => e.into(),
    };
    Ok(response)
}
