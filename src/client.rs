//! The live event log client.
//!
//! [`LiveEventLog`] owns the connection state, the [`LogView`] and the
//! output [`Surface`]. It is built once at startup, driven by
//! [`LiveEventLog::run_until`] on a single task, and torn down with
//! [`LiveEventLog::teardown`]. Inbound messages are handled strictly one
//! at a time in arrival order, so no locking is involved anywhere.
//!
//! Connection failures are never returned to the caller. They are logged,
//! the state becomes [`ConnectionState::Errored`] and the view stops
//! updating, unless a [`ReconnectPolicy`] allows another attempt.

use std::future::Future;

use url::Url;

use crate::config::ClientConfig;
use crate::domain::{ConnectionState, EventMessage, LogView};
use crate::error::ClientError;
use crate::render::Surface;
use crate::ws::{self, MessageHandler, ReconnectPolicy, SessionEnd};

/// Why [`LiveEventLog::run_until`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The feed ended and no further attempt is allowed.
    Ended,
    /// The shutdown future resolved; the client has been torn down.
    Shutdown,
}

/// Keeps a log view synchronized with the server's event stream.
#[derive(Debug)]
pub struct LiveEventLog<S: Surface> {
    endpoint: Url,
    state: ConnectionState,
    view: LogView,
    surface: S,
    reconnect: ReconnectPolicy,
    received: u64,
}

impl<S: Surface> LiveEventLog<S> {
    /// Builds the client for `config`, rendering onto `surface`.
    ///
    /// # Errors
    ///
    /// Returns an error if no socket URL can be derived from the page URL.
    pub fn new(config: &ClientConfig, surface: S) -> Result<Self, ClientError> {
        let endpoint = ws::derive_ws_url(&config.page_url, &config.ws_path)?;
        Ok(Self {
            endpoint,
            state: ConnectionState::Connecting,
            view: LogView::new(config.viewport_rows).with_max_lines(config.max_lines),
            surface,
            reconnect: config.reconnect,
            received: 0,
        })
    }

    /// Socket URL the client connects to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Current connection state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// The log view.
    #[must_use]
    pub const fn view(&self) -> &LogView {
        &self.view
    }

    /// Consumes the client, returning the output surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Total messages received, including any evicted from the view.
    #[must_use]
    pub const fn received(&self) -> u64 {
        self.received
    }

    /// Runs until the feed ends for good.
    ///
    /// # Errors
    ///
    /// See [`LiveEventLog::run_until`].
    pub async fn run(&mut self) -> Result<RunOutcome, ClientError> {
        self.run_until(std::future::pending()).await
    }

    /// Connects and renders the feed until it ends for good or `shutdown`
    /// resolves.
    ///
    /// # Errors
    ///
    /// Only rendering failures are returned. Connection failures end the
    /// run with [`RunOutcome::Ended`] and state
    /// [`ConnectionState::Errored`].
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<RunOutcome, ClientError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!(endpoint = %self.endpoint, "starting live event log");
        self.surface.status(self.state)?;

        let mut attempt = 0u32;
        loop {
            self.set_state(ConnectionState::Connecting)?;

            let connected = tokio::select! {
                biased;
                () = &mut shutdown => {
                    self.teardown()?;
                    return Ok(RunOutcome::Shutdown);
                }
                res = ws::connect(&self.endpoint) => res,
            };

            match connected {
                Ok(mut stream) => {
                    self.set_state(ConnectionState::Open)?;
                    let received_before = self.received;
                    let end = ws::run_session(&mut stream, shutdown.as_mut(), self).await?;
                    // A session only refills the retry budget once it delivered something.
                    if self.received > received_before {
                        attempt = 0;
                    }
                    match end {
                        SessionEnd::Closed => self.on_closed()?,
                        SessionEnd::Lost(err) => self.on_error(&err)?,
                        SessionEnd::Shutdown => {
                            self.teardown()?;
                            return Ok(RunOutcome::Shutdown);
                        }
                    }
                }
                Err(err) => self.on_error(&err)?,
            }

            attempt = attempt.saturating_add(1);
            let Some(delay) = self.reconnect.delay_for(attempt) else {
                if self.reconnect.is_enabled() {
                    tracing::warn!(attempts = attempt - 1, "giving up on event stream");
                }
                return Ok(RunOutcome::Ended);
            };
            tracing::info!(
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "reconnecting to event stream"
            );
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    self.teardown()?;
                    return Ok(RunOutcome::Shutdown);
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Records that the server closed the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the status line cannot be rendered.
    pub fn on_closed(&mut self) -> Result<(), ClientError> {
        tracing::info!(received = self.received, "event stream closed");
        self.set_state(ConnectionState::Closed)
    }

    /// Records a connection failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the status line cannot be rendered.
    pub fn on_error(&mut self, err: &ClientError) -> Result<(), ClientError> {
        if err.is_transport() {
            tracing::warn!(error = %err, code = err.error_code(), "event stream failed");
        } else {
            tracing::error!(error = %err, code = err.error_code(), "event stream unusable");
        }
        self.set_state(ConnectionState::Errored)
    }

    /// Ends the client: marks the connection closed and finishes the
    /// surface. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be flushed.
    pub fn teardown(&mut self) -> Result<(), ClientError> {
        if !self.state.is_terminal() {
            self.set_state(ConnectionState::Closed)?;
        }
        tracing::debug!(
            received = self.received,
            retained = self.view.len(),
            evicted = self.view.evicted(),
            "live event log torn down"
        );
        self.surface.finish()
    }

    fn set_state(&mut self, next: ConnectionState) -> Result<(), ClientError> {
        if self.state == next {
            return Ok(());
        }
        if !self.state.can_transition_to(next) {
            tracing::warn!(from = %self.state, to = %next, "ignoring illegal state change");
            return Ok(());
        }
        tracing::debug!(from = %self.state, to = %next, "connection state changed");
        self.state = next;
        self.surface.status(next)
    }
}

impl<S: Surface> MessageHandler for LiveEventLog<S> {
    /// Appends the payload verbatim as the newest line and scrolls the
    /// view to the bottom.
    fn on_message(&mut self, text: String) -> Result<(), ClientError> {
        self.received += 1;
        tracing::debug!(seq = self.received, payload = %text, "event received");
        self.view.append(EventMessage::new(self.received, text));
        if let Some(line) = self.view.last() {
            self.surface.append_line(line)?;
        }
        self.surface.refresh(&self.view)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::render::{LineFormat, WriterSurface};

    fn client(config: &ClientConfig) -> LiveEventLog<WriterSurface<Vec<u8>>> {
        let surface = WriterSurface::new(Vec::new(), LineFormat::Plain).show_status(true);
        let Ok(client) = LiveEventLog::new(config, surface) else {
            panic!("default config must build a client");
        };
        client
    }

    fn output(client: LiveEventLog<WriterSurface<Vec<u8>>>) -> String {
        String::from_utf8(client.into_surface().into_inner()).unwrap_or_default()
    }

    #[test]
    fn endpoint_follows_page() {
        let client = client(&ClientConfig::default());
        assert_eq!(client.endpoint().as_str(), "ws://localhost:3000/ws");
        assert_eq!(client.state(), ConnectionState::Connecting);
        assert!(client.view().is_empty());
    }

    #[test]
    fn each_message_is_one_line_at_the_bottom() {
        let config = ClientConfig {
            viewport_rows: 1,
            ..ClientConfig::default()
        };
        let mut client = client(&config);
        assert!(client.on_message("hello".to_string()).is_ok());
        assert!(client.view().is_at_bottom());
        assert!(client.on_message("world".to_string()).is_ok());
        assert!(client.view().is_at_bottom());
        assert_eq!(client.view().scroll_top(), 1);

        let texts: Vec<_> = client.view().lines().map(|m| m.text.clone()).collect();
        assert_eq!(texts, vec!["hello", "world"]);
        assert_eq!(client.received(), 2);
        assert_eq!(output(client), "hello\nworld\n");
    }

    #[test]
    fn viewport_rows_bound_the_screen_redraw() {
        let config = ClientConfig {
            viewport_rows: 2,
            output: LineFormat::Screen,
            ..ClientConfig::default()
        };
        let surface = WriterSurface::new(Vec::new(), config.output);
        let Ok(mut client) = LiveEventLog::new(&config, surface) else {
            panic!("screen config must build a client");
        };
        for text in ["a", "b", "c"] {
            assert!(client.on_message(text.to_string()).is_ok());
        }
        assert_eq!(client.view().scroll_top(), 1);
        let text = output(client);
        assert_eq!(text.rsplit("\x1b[2J\x1b[H").next(), Some("b\nc\n"));
    }

    #[test]
    fn cap_bounds_view_not_count() {
        let config = ClientConfig {
            max_lines: Some(1),
            ..ClientConfig::default()
        };
        let mut client = client(&config);
        for text in ["a", "b", "c"] {
            assert!(client.on_message(text.to_string()).is_ok());
        }
        assert_eq!(client.view().len(), 1);
        assert_eq!(client.received(), 3);
        assert_eq!(client.view().last().map(|m| m.seq), Some(3));
    }

    #[test]
    fn error_then_teardown_keeps_errored() {
        let mut client = client(&ClientConfig::default());
        let err = ClientError::Transport(tokio_tungstenite::tungstenite::Error::ConnectionClosed);
        assert!(client.on_error(&err).is_ok());
        assert_eq!(client.state(), ConnectionState::Errored);
        assert!(client.teardown().is_ok());
        assert!(client.teardown().is_ok());
        assert_eq!(client.state(), ConnectionState::Errored);
        assert_eq!(output(client), "-- connection errored --\n");
    }

    #[test]
    fn teardown_while_connecting_closes() {
        let mut client = client(&ClientConfig::default());
        assert!(client.teardown().is_ok());
        assert_eq!(client.state(), ConnectionState::Closed);
    }

    #[test]
    fn closed_after_error_is_ignored() {
        let mut client = client(&ClientConfig::default());
        assert!(client.on_error(&ClientError::MissingHost(String::new())).is_ok());
        // Errored -> Closed is not a legal move.
        assert!(client.on_closed().is_ok());
        assert_eq!(client.state(), ConnectionState::Errored);
    }
}
