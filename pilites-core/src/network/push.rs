use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};
use url::Url;

use crate::error::{PilitesError, TransportError};

// ── Traits ───────────────────────────────────────────────────────

/// One open push channel delivering text messages in arrival order.
#[async_trait]
pub trait PushChannel: Send {
    /// The next text message, an error, or `None` once the channel closed.
    async fn next_message(&mut self) -> Option<Result<String, TransportError>>;

    /// Close the channel. Errors while closing are ignored.
    async fn close(&mut self);
}

/// Opens push channels for a stream path such as `/api/live/stream`.
#[async_trait]
pub trait PushConnector: Send + Sync + 'static {
    async fn connect(&self, path: &str) -> Result<Box<dyn PushChannel>, TransportError>;
}

// ── URL mapping ──────────────────────────────────────────────────

/// Map the controller's HTTP base URL to its WebSocket base.
///
/// `http` becomes `ws` and `https` becomes `wss`; WebSocket URLs are
/// returned unchanged.
pub fn stream_base_url(base_url: &str) -> Result<Url, PilitesError> {
    let mut url = Url::parse(base_url)?;
    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        "ws" | "wss" => return Ok(url),
        other => {
            return Err(PilitesError::Url(format!(
                "unsupported scheme `{other}` in {base_url}"
            )));
        }
    };
    url.set_scheme(scheme)
        .map_err(|()| PilitesError::Url(format!("cannot map {base_url} to {scheme}")))?;
    Ok(url)
}

// ── WebSocket implementation ─────────────────────────────────────

/// Opens WebSocket push channels below a fixed base URL.
#[derive(Debug, Clone)]
pub struct WsConnector {
    base: Url,
}

impl WsConnector {
    /// `base_url` is the controller's HTTP or WebSocket root.
    pub fn new(base_url: &str) -> Result<Self, PilitesError> {
        Ok(Self {
            base: stream_base_url(base_url)?,
        })
    }

    /// Full URL for `path`, keeping any path prefix of the base.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url
    }
}

#[async_trait]
impl PushConnector for WsConnector {
    async fn connect(&self, path: &str) -> Result<Box<dyn PushChannel>, TransportError> {
        let url = self.endpoint(path);
        debug!(%url, "opening push channel");
        let (stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;
        Ok(Box::new(WsChannel { stream }))
    }
}

/// A WebSocket push channel.
pub struct WsChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl PushChannel for WsChannel {
    async fn next_message(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "push channel closed by controller");
                    return None;
                }
                // Pings are answered by tungstenite; binary frames are not
                // part of the protocol.
                Ok(other) => trace!(?other, "skipping non-text frame"),
                Err(e) => return Some(Err(TransportError::new(e.to_string()))),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            trace!("close on push channel: {e}");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_maps_to_ws() {
        let url = stream_base_url("http://pilites.local:8000").unwrap();
        assert_eq!(url.as_str(), "ws://pilites.local:8000/");
        let url = stream_base_url("https://pilites.example").unwrap();
        assert_eq!(url.scheme(), "wss");
        let url = stream_base_url("ws://10.0.0.2:8000").unwrap();
        assert_eq!(url.scheme(), "ws");
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            stream_base_url("ftp://pilites.local"),
            Err(PilitesError::Url(_))
        ));
        assert!(stream_base_url("not a url").is_err());
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let connector = WsConnector::new("http://pilites.local:8000").unwrap();
        assert_eq!(
            connector.endpoint("/api/live/stream").as_str(),
            "ws://pilites.local:8000/api/live/stream"
        );

        let connector = WsConnector::new("http://proxy.local/pilites/").unwrap();
        assert_eq!(
            connector.endpoint("/api/preview/stream").as_str(),
            "ws://proxy.local/pilites/api/preview/stream"
        );
    }

    #[tokio::test]
    async fn wss_reaches_the_tls_handshake() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            // Accept and hang up before any TLS bytes are exchanged.
            let _ = listener.accept().await;
        });

        let connector = WsConnector::new(&format!("https://127.0.0.1:{port}")).unwrap();
        let err = connector
            .connect("/api/live/stream")
            .await
            .err()
            .expect("handshake against a bare socket must fail");
        assert!(!err.0.starts_with("URL error"), "{err}");
    }
}
