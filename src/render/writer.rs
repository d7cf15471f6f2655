//! [`Surface`] over any [`std::io::Write`].

use std::io::Write;

use serde::Serialize;

use super::escape::{escape_html, sanitize_terminal};
use super::{LineFormat, Surface};
use crate::domain::{ConnectionState, EventMessage, LogView};
use crate::error::ClientError;

/// Writes each line to `W` in one [`LineFormat`], flushing after every
/// line so the newest output is visible immediately.
#[derive(Debug)]
pub struct WriterSurface<W: Write> {
    writer: W,
    format: LineFormat,
    raw: bool,
    show_status: bool,
    element_id: String,
    opened: bool,
}

/// Clear the screen and move the cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Serialize)]
struct StatusRecord {
    status: ConnectionState,
}

impl<W: Write> WriterSurface<W> {
    /// Creates a surface writing `format` to `writer`.
    pub fn new(writer: W, format: LineFormat) -> Self {
        Self {
            writer,
            format,
            raw: false,
            show_status: false,
            element_id: "events".to_string(),
            opened: false,
        }
    }

    /// Skips escaping and sanitizing of message text.
    #[must_use]
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Writes connection state changes as well as messages.
    #[must_use]
    pub fn show_status(mut self, show: bool) -> Self {
        self.show_status = show;
        self
    }

    /// Sets the `id` of the HTML container element.
    #[must_use]
    pub fn element_id(mut self, id: impl Into<String>) -> Self {
        self.element_id = id.into();
        self
    }

    /// Consumes the surface, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_plain(&mut self, text: &str) -> Result<(), ClientError> {
        if self.raw {
            writeln!(self.writer, "{text}")?;
        } else {
            writeln!(self.writer, "{}", sanitize_terminal(text))?;
        }
        Ok(())
    }

    fn open_container(&mut self) -> Result<(), ClientError> {
        if self.format == LineFormat::Html && !self.opened {
            writeln!(self.writer, "<div id=\"{}\">", escape_html(&self.element_id))?;
        }
        self.opened = true;
        Ok(())
    }
}

impl<W: Write> Surface for WriterSurface<W> {
    fn append_line(&mut self, message: &EventMessage) -> Result<(), ClientError> {
        self.open_container()?;
        match self.format {
            LineFormat::Plain => self.write_plain(&message.text)?,
            // Drawn by `refresh` together with the rest of the window.
            LineFormat::Screen => return Ok(()),
            LineFormat::Html if self.raw => writeln!(self.writer, "<p>{}</p>", message.text)?,
            LineFormat::Html => writeln!(self.writer, "<p>{}</p>", escape_html(&message.text))?,
            LineFormat::Json => {
                serde_json::to_writer(&mut self.writer, message)?;
                self.writer.write_all(b"\n")?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    fn status(&mut self, state: ConnectionState) -> Result<(), ClientError> {
        if !self.show_status {
            return Ok(());
        }
        self.open_container()?;
        match self.format {
            LineFormat::Plain | LineFormat::Screen => {
                writeln!(self.writer, "-- connection {state} --")?;
            }
            LineFormat::Html => {
                writeln!(self.writer, "<p class=\"status\">connection {state}</p>")?;
            }
            LineFormat::Json => {
                serde_json::to_writer(&mut self.writer, &StatusRecord { status: state })?;
                self.writer.write_all(b"\n")?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    fn refresh(&mut self, view: &LogView) -> Result<(), ClientError> {
        if self.format != LineFormat::Screen {
            return Ok(());
        }
        self.writer.write_all(CLEAR_SCREEN.as_bytes())?;
        for line in view.visible() {
            self.write_plain(&line.text)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ClientError> {
        if self.format == LineFormat::Html && self.opened {
            writeln!(self.writer, "</div>")?;
            self.opened = false;
        }
        self.writer.flush()?;
        Ok(())
    }
}
