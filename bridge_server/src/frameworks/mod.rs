// Frameworks layer: configuration and process bootstrap.

pub mod config;
pub mod server;
