pub mod check_exists;
pub mod context;
pub mod get_server;
pub mod heartbeat;
pub mod list_servers;
pub mod router;
