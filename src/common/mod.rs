pub mod cluster;
pub mod config;
pub mod error;
pub mod frame;
pub mod protocol;
pub mod time;
