// Network adapter for client websocket sessions.

pub mod client;

pub use client::ws_handler;
