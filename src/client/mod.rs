pub mod coordinator_client;
pub mod heartbeat;
