//! Render layer: turns log lines into output.
//!
//! A [`Surface`] is where appended lines become visible. The binary uses a
//! [`WriterSurface`] over stdout; tests use one over a `Vec<u8>`.

pub mod escape;
pub mod writer;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::{ConnectionState, EventMessage, LogView};
use crate::error::ClientError;

pub use escape::{escape_html, sanitize_terminal};
pub use writer::WriterSurface;

/// Output encoding of each rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineFormat {
    /// One terminal line per message.
    Plain,
    /// One `<p>` element per message inside a container `<div>`.
    Html,
    /// One JSON object per message.
    Json,
    /// Full redraw of the visible window of the log view on every message.
    Screen,
}

impl FromStr for LineFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "screen" => Ok(Self::Screen),
            other => Err(format!("unknown format `{other}`")),
        }
    }
}

impl fmt::Display for LineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Html => "html",
            Self::Json => "json",
            Self::Screen => "screen",
        })
    }
}

/// Destination the log view is drawn onto.
///
/// Calls arrive one at a time from the client task, in arrival order.
pub trait Surface {
    /// Makes a newly appended line visible.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Render`] or [`ClientError::Encode`] when the
    /// line cannot be written.
    fn append_line(&mut self, message: &EventMessage) -> Result<(), ClientError>;

    /// Reports a connection state change.
    ///
    /// # Errors
    ///
    /// Same as [`Surface::append_line`].
    fn status(&mut self, state: ConnectionState) -> Result<(), ClientError>;

    /// Redraws after `view` changed. Surfaces that only ever append lines
    /// have nothing to do here.
    ///
    /// # Errors
    ///
    /// Same as [`Surface::append_line`].
    fn refresh(&mut self, view: &LogView) -> Result<(), ClientError> {
        let _ = view;
        Ok(())
    }

    /// Flushes and closes any open markup. Called once on teardown.
    ///
    /// # Errors
    ///
    /// Same as [`Surface::append_line`].
    fn finish(&mut self) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("plain".parse::<LineFormat>(), Ok(LineFormat::Plain));
        assert_eq!(" Json ".parse::<LineFormat>(), Ok(LineFormat::Json));
        assert_eq!("HTML".parse::<LineFormat>(), Ok(LineFormat::Html));
        assert_eq!("screen".parse::<LineFormat>(), Ok(LineFormat::Screen));
        assert!("xml".parse::<LineFormat>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for format in [
            LineFormat::Plain,
            LineFormat::Html,
            LineFormat::Json,
            LineFormat::Screen,
        ] {
            assert_eq!(format.to_string().parse::<LineFormat>(), Ok(format));
        }
    }
}
