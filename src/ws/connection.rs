//! Read loop for a single WebSocket session.
//!
//! Connects to the event stream and forwards every text frame, in arrival
//! order, to one [`MessageHandler`]. Nothing is ever sent to the server
//! apart from automatic pong replies and a close frame on shutdown.

use std::future::Future;
use std::pin::Pin;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::error::ClientError;

/// Client-side socket stream, plain or TLS.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Receiver of inbound text payloads.
///
/// `on_message` takes `&mut self`, so invocations never overlap: the next
/// frame is not read until the previous one has been handled.
pub trait MessageHandler {
    /// Handles one payload.
    ///
    /// # Errors
    ///
    /// An error aborts the session and is returned from [`run_session`].
    fn on_message(&mut self, text: String) -> Result<(), ClientError>;
}

/// How a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// The server closed the stream.
    Closed,
    /// The stream broke.
    Lost(ClientError),
    /// The shutdown future resolved; a close frame was sent.
    Shutdown,
}

/// Opens a socket to `url`.
///
/// # Errors
///
/// Returns [`ClientError::Connect`] if the TCP, TLS or WebSocket handshake
/// fails.
pub async fn connect(url: &Url) -> Result<WsStream, ClientError> {
    tracing::debug!(url = %url, "connecting");
    let (stream, response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(ClientError::Connect)?;
    tracing::debug!(url = %url, status = %response.status(), "handshake complete");
    Ok(stream)
}

/// Reads frames from `stream` until the server closes it, the transport
/// fails, or `shutdown` resolves.
///
/// # Errors
///
/// Only errors returned by `handler` propagate; transport failures are
/// reported as [`SessionEnd::Lost`].
pub async fn run_session<F, H>(
    stream: &mut WsStream,
    mut shutdown: Pin<&mut F>,
    handler: &mut H,
) -> Result<SessionEnd, ClientError>
where
    F: Future<Output = ()>,
    H: MessageHandler + ?Sized,
{
    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                if let Err(err) = stream.close(None).await {
                    tracing::debug!(error = %err, "close frame not delivered");
                }
                return Ok(SessionEnd::Shutdown);
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handler.on_message(text.as_str().to_owned())?;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::debug!(?frame, "server closed stream");
                        return Ok(SessionEnd::Closed);
                    }
                    Some(Ok(Message::Binary(data))) => {
                        tracing::debug!(len = data.len(), "ignoring binary frame");
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Ok(SessionEnd::Lost(ClientError::Transport(err))),
                    None => return Ok(SessionEnd::Closed),
                }
            }
        }
    }
}
