pub mod client;
pub mod common;
pub mod handler;
pub mod server;
pub mod storage;

pub use server::server::server_start;
