//! Socket URL derivation from the page URL.

use url::Url;

use crate::error::ClientError;

/// Derives the event stream URL from the page the client is served from.
///
/// The socket connects back to the page's own host and port. `http`
/// pages get `ws`, `https` pages get `wss`; `ws`/`wss` page URLs are
/// taken as-is. The page path, query and fragment are replaced by `path`.
///
/// # Errors
///
/// Returns [`ClientError::UnsupportedScheme`] for any other scheme and
/// [`ClientError::MissingHost`] if the page URL has no host.
pub fn derive_ws_url(page: &Url, path: &str) -> Result<Url, ClientError> {
    let scheme = match page.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(ClientError::UnsupportedScheme(other.to_string())),
    };
    let host = page
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ClientError::MissingHost(page.to_string()))?;

    let authority = match page.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let path = path.trim();
    let separator = if path.starts_with('/') { "" } else { "/" };

    Ok(Url::parse(&format!("{scheme}://{authority}{separator}{path}"))?)
}
