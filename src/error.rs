//! Client error types with stable numeric codes.
//!
//! [`ClientError`] is the central error type for the client. Connection
//! problems are reported through it internally but never escape
//! [`LiveEventLog::run_until`](crate::client::LiveEventLog::run_until):
//! the log view simply stops updating. Configuration and rendering
//! failures do propagate.

use tokio_tungstenite::tungstenite;

/// Client-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category      |
/// |-----------|---------------|
/// | 1000–1999 | Configuration |
/// | 2000–2999 | Transport     |
/// | 3000–3999 | Rendering     |
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A configuration value could not be parsed.
    #[error("invalid configuration for {key}: {message}")]
    InvalidConfig {
        /// Environment variable that carried the bad value.
        key: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The page URL could not be parsed.
    #[error("invalid page url: {0}")]
    InvalidPageUrl(#[from] url::ParseError),

    /// The page URL uses a scheme with no WebSocket counterpart.
    #[error("unsupported page scheme: {0}")]
    UnsupportedScheme(String),

    /// The page URL has no host to connect back to.
    #[error("page url has no host: {0}")]
    MissingHost(String),

    /// Connection establishment failed.
    #[error("connect failed: {0}")]
    Connect(#[source] tungstenite::Error),

    /// The connection broke while reading the stream.
    #[error("connection lost: {0}")]
    Transport(#[source] tungstenite::Error),

    /// Writing to the output surface failed.
    #[error("render failed: {0}")]
    Render(#[from] std::io::Error),

    /// Serializing a rendered line failed.
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ClientError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidConfig { .. } => 1001,
            Self::InvalidPageUrl(_) => 1002,
            Self::UnsupportedScheme(_) => 1003,
            Self::MissingHost(_) => 1004,
            Self::Connect(_) => 2001,
            Self::Transport(_) => 2002,
            Self::Render(_) => 3001,
            Self::Encode(_) => 3002,
        }
    }

    /// Whether this error belongs to the connection (as opposed to the
    /// local configuration or output).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Transport(_))
    }
}
