//! Lifecycle state of the single live connection.

use std::fmt;

use serde::Serialize;

/// Lifecycle state of the connection to the event stream.
///
/// The connection starts in [`ConnectionState::Connecting`], becomes
/// [`ConnectionState::Open`] once the handshake completes and ends in
/// either [`ConnectionState::Closed`] or [`ConnectionState::Errored`].
/// A terminal state only moves back to `Connecting` when a reconnect is
/// attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Handshake in progress.
    Connecting,
    /// Frames are flowing.
    Open,
    /// The stream ended normally or the client tore it down.
    Closed,
    /// Establishment failed or the stream broke.
    Errored,
}

impl ConnectionState {
    /// Whether the connection has ended, one way or another.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Open)
                | (Self::Connecting, Self::Closed)
                | (Self::Connecting, Self::Errored)
                | (Self::Open, Self::Closed)
                | (Self::Open, Self::Errored)
                | (Self::Closed, Self::Connecting)
                | (Self::Errored, Self::Connecting)
        )
    }

    /// Lowercase label used in logs and status lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Errored => "errored",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!ConnectionState::Connecting.is_terminal());
        assert!(!ConnectionState::Open.is_terminal());
        assert!(ConnectionState::Closed.is_terminal());
        assert!(ConnectionState::Errored.is_terminal());
    }

    #[test]
    fn open_only_from_connecting() {
        assert!(ConnectionState::Connecting.can_transition_to(ConnectionState::Open));
        assert!(!ConnectionState::Closed.can_transition_to(ConnectionState::Open));
        assert!(!ConnectionState::Errored.can_transition_to(ConnectionState::Open));
    }

    #[test]
    fn retry_restarts_from_terminal() {
        assert!(ConnectionState::Errored.can_transition_to(ConnectionState::Connecting));
        assert!(!ConnectionState::Open.can_transition_to(ConnectionState::Connecting));
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&ConnectionState::Errored).unwrap_or_default();
        assert_eq!(json, "\"errored\"");
    }
}
