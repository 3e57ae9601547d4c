use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::PilitesError;
use crate::protocol::{LiveStatus, PreviewStatus, StartRequest};
use crate::rpc::detail::decode_error_message;
use crate::rpc::transport::{HttpRequest, HttpTransport, Method};
use crate::show::{Channel, Play, PlaySummary};

/// Path prefix of every controller endpoint.
pub const API_BASE: &str = "/api";

/// Typed access to the controller's request/response endpoints.
///
/// Calls are one-shot: a failure is returned to the caller and never
/// retried.
#[derive(Debug, Clone)]
pub struct RpcGateway<T> {
    transport: T,
}

impl<T: HttpTransport> RpcGateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Core request path ────────────────────────────────────────

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, PilitesError> {
        let request = HttpRequest {
            method,
            path: format!("{API_BASE}{path}"),
            body,
        };
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, path, "request failed: {e}");
                return Err(e.into());
            }
        };

        if !response.is_success() {
            let message = decode_error_message(response.status, &response.body);
            debug!(%method, path, status = response.status, %message, "request rejected");
            return Err(PilitesError::Request {
                status: response.status,
                message,
            });
        }
        Ok(response.body)
    }

    async fn fetch<R: DeserializeOwned>(&self, path: &str) -> Result<R, PilitesError> {
        let body = self.call(Method::Get, path, None).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fire a request whose success body carries nothing the client needs.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<(), PilitesError> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.call(method, path, body).await.map(drop)
    }

    async fn post(&self, path: &str) -> Result<(), PilitesError> {
        self.send(Method::Post, path, None::<&()>).await
    }

    // ── Channels ─────────────────────────────────────────────────

    pub async fn list_channels(&self) -> Result<Vec<Channel>, PilitesError> {
        self.fetch("/channels").await
    }

    /// Create or replace a channel by id.
    pub async fn upsert_channel(&self, channel: &Channel) -> Result<(), PilitesError> {
        channel.validate()?;
        self.send(Method::Post, "/channels", Some(channel)).await
    }

    pub async fn test_channel_white(&self, channel_id: &str) -> Result<(), PilitesError> {
        self.post(&format!("/channels/{channel_id}/test/white")).await
    }

    pub async fn test_channel_off(&self, channel_id: &str) -> Result<(), PilitesError> {
        self.post(&format!("/channels/{channel_id}/test/off")).await
    }

    // ── Plays ────────────────────────────────────────────────────

    pub async fn list_plays(&self) -> Result<Vec<PlaySummary>, PilitesError> {
        self.fetch("/plays").await
    }

    pub async fn get_play(&self, play_id: &str) -> Result<Play, PilitesError> {
        self.fetch(&format!("/plays/{play_id}")).await
    }

    pub async fn create_play(&self, play: &Play) -> Result<(), PilitesError> {
        self.send(Method::Post, "/plays", Some(play)).await
    }

    pub async fn update_play(&self, play: &Play) -> Result<(), PilitesError> {
        self.send(Method::Put, &format!("/plays/{}", play.id), Some(play))
            .await
    }

    pub async fn delete_play(&self, play_id: &str) -> Result<(), PilitesError> {
        self.send(Method::Delete, &format!("/plays/{play_id}"), None::<&()>)
            .await
    }

    /// Light one region of a play on the hardware.
    pub async fn test_region(&self, play_id: &str, region_id: &str) -> Result<(), PilitesError> {
        self.post(&format!("/plays/{play_id}/regions/{region_id}/test"))
            .await
    }

    // ── Preview ──────────────────────────────────────────────────

    pub async fn preview_status(&self) -> Result<PreviewStatus, PilitesError> {
        self.fetch("/preview/status").await
    }

    pub async fn start_preview(&self, play_id: &str) -> Result<(), PilitesError> {
        let body = StartRequest {
            play_id: play_id.to_string(),
        };
        self.send(Method::Post, "/preview", Some(&body)).await
    }

    pub async fn preview_next(&self) -> Result<(), PilitesError> {
        self.post("/preview/next").await
    }

    pub async fn stop_preview(&self) -> Result<(), PilitesError> {
        self.post("/preview/stop").await
    }

    // ── Live ─────────────────────────────────────────────────────

    pub async fn live_status(&self) -> Result<LiveStatus, PilitesError> {
        self.fetch("/live/status").await
    }

    pub async fn start_live(&self, play_id: &str) -> Result<(), PilitesError> {
        let body = StartRequest {
            play_id: play_id.to_string(),
        };
        self.send(Method::Post, "/live/start", Some(&body)).await
    }

    pub async fn live_next(&self) -> Result<(), PilitesError> {
        self.post("/live/next").await
    }

    pub async fn live_blackout(&self) -> Result<(), PilitesError> {
        self.post("/live/blackout").await
    }

    pub async fn stop_live(&self) -> Result<(), PilitesError> {
        self.post("/live/stop").await
    }
}
