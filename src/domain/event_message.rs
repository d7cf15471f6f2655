//! A single payload received from the event stream.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One opaque text payload pushed by the server.
///
/// No schema is assumed. `text` is the frame content verbatim; `seq`
/// counts messages in arrival order starting at 1 for the lifetime of the
/// client, across reconnects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventMessage {
    /// Arrival sequence number.
    pub seq: u64,
    /// When the frame was read off the socket.
    pub received_at: DateTime<Utc>,
    /// Raw frame text.
    pub text: String,
}

impl EventMessage {
    /// Wraps a payload received now.
    #[must_use]
    pub fn new(seq: u64, text: impl Into<String>) -> Self {
        Self {
            seq,
            received_at: Utc::now(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_text_verbatim() {
        let msg = EventMessage::new(7, "  <b>tab\there</b>\n");
        assert_eq!(msg.seq, 7);
        assert_eq!(msg.text, "  <b>tab\there</b>\n");
    }

    #[test]
    fn serializes_all_fields() {
        let msg = EventMessage::new(1, "hello");
        let value = serde_json::to_value(&msg).unwrap_or_default();
        assert_eq!(value.get("seq").and_then(|v| v.as_u64()), Some(1));
        assert_eq!(value.get("text").and_then(|v| v.as_str()), Some("hello"));
        assert!(value.get("received_at").is_some());
    }
}
