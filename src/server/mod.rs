pub mod dispatch;
pub mod liveness_sweeper;
pub mod server;
