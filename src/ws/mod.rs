//! WebSocket layer: endpoint derivation, the per-session read loop and
//! the reconnect policy.

pub mod connection;
pub mod endpoint;
pub mod reconnect;

pub use connection::{MessageHandler, SessionEnd, WsStream, connect, run_session};
pub use endpoint::derive_ws_url;
pub use reconnect::ReconnectPolicy;
