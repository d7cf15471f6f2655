//! Client configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Unset variables fall back to the
//! behavior of the plain browser client: unbounded log, no reconnect,
//! no status output.

use std::time::Duration;

use url::Url;

use crate::error::ClientError;
use crate::render::LineFormat;
use crate::ws::reconnect::ReconnectPolicy;

/// Top-level client configuration.
///
/// Loaded once at startup via [`ClientConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the page the client is served from. Its host and scheme
    /// decide where the socket connects.
    pub page_url: Url,

    /// Path of the event stream on the page's host.
    pub ws_path: String,

    /// Identifier of the log container (used by HTML output).
    pub element_id: String,

    /// How each line is written to the output surface.
    pub output: LineFormat,

    /// Append message text without escaping or sanitizing.
    pub raw: bool,

    /// Keep at most this many lines in the log view (`None` = unbounded).
    pub max_lines: Option<usize>,

    /// Number of rows visible at once in the log view.
    pub viewport_rows: usize,

    /// Write connection status changes to the output surface.
    pub show_status: bool,

    /// Reconnect behavior after the connection drops.
    pub reconnect: ReconnectPolicy,

    /// Exit once the feed dies instead of staying open until interrupted.
    pub exit_on_close: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
            ws_path: "/ws".to_string(),
            element_id: "events".to_string(),
            output: LineFormat::Plain,
            raw: false,
            max_lines: None,
            viewport_rows: 24,
            show_status: false,
            reconnect: ReconnectPolicy::disabled(),
            exit_on_close: false,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `EVENTS_PAGE_URL` or `EVENTS_OUTPUT` is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let page_url = match lookup("EVENTS_PAGE_URL") {
            Some(raw) => Url::parse(&raw)?,
            None => defaults.page_url,
        };

        let output = match lookup("EVENTS_OUTPUT") {
            Some(raw) => raw.parse::<LineFormat>().map_err(|message| ClientError::InvalidConfig {
                key: "EVENTS_OUTPUT",
                message,
            })?,
            None => defaults.output,
        };

        let ws_path = lookup("EVENTS_WS_PATH").unwrap_or(defaults.ws_path);
        let element_id = lookup("EVENTS_ELEMENT_ID").unwrap_or(defaults.element_id);

        let max_lines = match parse_env(&lookup, "EVENTS_MAX_LINES", 0usize) {
            0 => None,
            n => Some(n),
        };
        let viewport_rows = parse_env(&lookup, "EVENTS_VIEWPORT_ROWS", defaults.viewport_rows);

        let reconnect = if parse_env_bool(&lookup, "EVENTS_RECONNECT", false) {
            ReconnectPolicy::bounded(
                parse_env(&lookup, "EVENTS_RECONNECT_MAX_ATTEMPTS", 5),
                Duration::from_millis(parse_env(&lookup, "EVENTS_RECONNECT_BASE_MS", 500)),
                Duration::from_millis(parse_env(&lookup, "EVENTS_RECONNECT_MAX_MS", 30_000)),
            )
        } else {
            ReconnectPolicy::disabled()
        };

        Ok(Self {
            page_url,
            ws_path,
            element_id,
            output,
            raw: parse_env_bool(&lookup, "EVENTS_RAW", defaults.raw),
            max_lines,
            viewport_rows,
            show_status: parse_env_bool(&lookup, "EVENTS_SHOW_STATUS", defaults.show_status),
            reconnect,
            exit_on_close: parse_env_bool(&lookup, "EVENTS_EXIT_ON_CLOSE", defaults.exit_on_close),
        })
    }
}

#[allow(clippy::expect_used)]
fn default_page_url() -> Url {
    Url::parse("http://localhost:3000/").expect("static url is valid")
}

/// Parses a variable as `T`, returning `default` on missing or invalid
/// values.
fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses a variable as a boolean. Accepts `"true"`, `"1"`, `"false"`,
/// `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ClientConfig, ClientError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_plain_client() {
        let Ok(cfg) = load(&[]) else {
            panic!("defaults must load");
        };
        assert_eq!(cfg.page_url.as_str(), "http://localhost:3000/");
        assert_eq!(cfg.ws_path, "/ws");
        assert_eq!(cfg.element_id, "events");
        assert_eq!(cfg.output, LineFormat::Plain);
        assert_eq!(cfg.max_lines, None);
        assert!(!cfg.raw);
        assert!(!cfg.show_status);
        assert!(!cfg.reconnect.is_enabled());
        assert!(!cfg.exit_on_close);
    }

    #[test]
    fn reads_overrides() {
        let Ok(cfg) = load(&[
            ("EVENTS_PAGE_URL", "https://studio.example.org:8443/index.html"),
            ("EVENTS_OUTPUT", "HTML"),
            ("EVENTS_MAX_LINES", "500"),
            ("EVENTS_RAW", "TRUE"),
            ("EVENTS_RECONNECT", "1"),
            ("EVENTS_RECONNECT_MAX_ATTEMPTS", "3"),
        ]) else {
            panic!("overrides must load");
        };
        assert_eq!(cfg.page_url.host_str(), Some("studio.example.org"));
        assert_eq!(cfg.output, LineFormat::Html);
        assert_eq!(cfg.max_lines, Some(500));
        assert!(cfg.raw);
        assert!(cfg.reconnect.is_enabled());
        assert_eq!(cfg.reconnect.max_attempts(), 3);
    }

    #[test]
    fn zero_cap_means_unbounded() {
        let Ok(cfg) = load(&[("EVENTS_MAX_LINES", "0")]) else {
            panic!("must load");
        };
        assert_eq!(cfg.max_lines, None);
    }

    #[test]
    fn garbage_numbers_fall_back() {
        let Ok(cfg) = load(&[("EVENTS_VIEWPORT_ROWS", "tall")]) else {
            panic!("must load");
        };
        assert_eq!(cfg.viewport_rows, 24);
    }

    #[test]
    fn bad_page_url_is_rejected() {
        let err = load(&[("EVENTS_PAGE_URL", "not a url")]);
        assert!(matches!(err, Err(ClientError::InvalidPageUrl(_))));
    }

    #[test]
    fn bad_output_is_rejected() {
        let err = load(&[("EVENTS_OUTPUT", "xml")]);
        assert!(matches!(
            err,
            Err(ClientError::InvalidConfig {
                key: "EVENTS_OUTPUT",
                ..
            })
        ));
    }
}
