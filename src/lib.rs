//! # live-event-log
//!
//! Live event log client: keeps one WebSocket connection to the host the
//! client is served from and renders every text frame it receives as a
//! new line at the bottom of a scrolling log view.
//!
//! ## Architecture
//!
//! ```text
//! Server (ws://<page-host>/ws)
//!     │  text frames
//!     ├── ws/        connect, read loop, reconnect policy
//!     │
//!     ├── client     LiveEventLog: state, on_message, teardown
//!     │
//!     ├── domain/    ConnectionState, EventMessage, LogView
//!     │
//!     └── render/    Surface (plain / html / json)
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod render;
pub mod ws;

pub use client::{LiveEventLog, RunOutcome};
pub use config::ClientConfig;
pub use error::ClientError;
