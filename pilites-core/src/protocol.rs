//! Wire types exchanged with the controller.
//!
//! # Push channel
//!
//! Each realtime mode has its own stream endpoint delivering JSON text
//! messages tagged by `type`:
//!
//! ```text
//! Controller ──[frame]───► Client   { timestamp, channels: {id: ["#rrggbb", ...]} }
//! Controller ──[status]──► Client   { isRunning, playId, cueId, cueName, cueIndex, isBlackout }
//! Controller ──[done]────► Client   {}                      (preview only)
//! Controller ──[error]───► Client   { message }
//! ```
//!
//! Messages are processed in arrival order. Malformed messages are
//! dropped by the session without ending it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PilitesError;

// ── Push messages ────────────────────────────────────────────────

/// One message received on a push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PushMessage {
    /// A rendered snapshot of every channel.
    Frame(FrameMessage),
    /// Authoritative session status.
    Status(SessionStatus),
    /// The preview run reached its end.
    Done,
    /// The controller reported a failure.
    Error(ErrorMessage),
}

impl PushMessage {
    /// Parse a text frame from the push channel.
    pub fn parse(text: &str) -> Result<Self, PilitesError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Frame(_) => "frame",
            Self::Status(_) => "status",
            Self::Done => "done",
            Self::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMessage {
    /// Controller clock, seconds. Not used for ordering.
    pub timestamp: f64,
    /// Channel id → pixel colors in strand order.
    pub channels: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

// ── Status ───────────────────────────────────────────────────────

/// Session status as reported by the controller.
///
/// Used both for pushed `status` messages and for `GET /live/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub is_running: bool,
    #[serde(default)]
    pub play_id: Option<String>,
    #[serde(default)]
    pub cue_id: Option<String>,
    #[serde(default)]
    pub cue_name: Option<String>,
    #[serde(default)]
    pub cue_index: Option<usize>,
    #[serde(default)]
    pub is_blackout: bool,
}

/// `GET /live/status` response.
pub type LiveStatus = SessionStatus;

/// `GET /preview/status` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewStatus {
    pub is_running: bool,
    #[serde(default)]
    pub play_id: Option<String>,
}

// ── Request bodies ───────────────────────────────────────────────

/// Body of `POST /preview` and `POST /live/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub play_id: String,
}

// ── Tests ────────────────────────────────────────────────────────
