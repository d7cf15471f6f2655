//! Domain layer: connection lifecycle, event messages and the log view.
//!
//! These types carry no I/O. The WebSocket layer feeds them and the
//! render layer draws them.

pub mod connection_state;
pub mod event_message;
pub mod log_view;

pub use connection_state::ConnectionState;
pub use event_message::EventMessage;
pub use log_view::LogView;
