//! Realtime session state.
//!
//! A [`SessionSnapshot`] is the client-side picture of one Preview or Live
//! session: connection phase, the last authoritative status, and the most
//! recent frame. It is mutated only through the reducer methods here and
//! published by the session client over a `watch` channel.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::protocol::{FrameMessage, PushMessage, SessionStatus};
use crate::show::Channel;
use crate::state::ConnectionPhase;

/// Color drawn for pixels a frame does not cover.
pub const BLACK: &str = "#000000";

// ── SessionKind ──────────────────────────────────────────────────

/// Which controller session a client follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Rendering-only dry run of a play.
    Preview,
    /// The session driving the physical strands.
    Live,
}

impl SessionKind {
    /// Push-channel path under the API base.
    pub fn stream_path(self) -> &'static str {
        match self {
            Self::Preview => "/preview/stream",
            Self::Live => "/live/stream",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Preview => "Preview",
            Self::Live => "Live",
        }
    }

    /// Whether stopping needs an out-of-band confirmation first.
    pub fn stop_needs_confirmation(self) -> bool {
        matches!(self, Self::Live)
    }

    /// Reconnect policy, evaluated after the reconnect delay.
    ///
    /// Live always reconnects; its status corrects itself once pushed.
    /// Preview only reconnects while it still believes a run is active.
    pub fn should_reconnect(self, status: &SessionStatus) -> bool {
        match self {
            Self::Live => true,
            Self::Preview => status.is_running,
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── FrameBuffer ──────────────────────────────────────────────────

/// The latest pixel colors per channel.
///
/// Frames replace each other wholesale; timestamps are kept for display
/// only and never used to reject a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameBuffer {
    timestamp: Option<f64>,
    channels: HashMap<String, Vec<String>>,
}

impl FrameBuffer {
    pub fn replace(&mut self, frame: FrameMessage) {
        self.timestamp = Some(frame.timestamp);
        self.channels = frame.channels;
    }

    pub fn clear(&mut self) {
        self.timestamp = None;
        self.channels.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn timestamp(&self) -> Option<f64> {
        self.timestamp
    }

    /// Raw colors for `channel_id`, if the last frame carried it.
    pub fn colors(&self, channel_id: &str) -> Option<&[String]> {
        self.channels.get(channel_id).map(Vec::as_slice)
    }

    /// Exactly `led_count` colors for `channel`.
    ///
    /// Missing channels and short frames are padded with black; long
    /// frames are truncated.
    pub fn pixels_for(&self, channel: &Channel) -> Cow<'_, [String]> {
        let wanted = channel.led_count as usize;
        match self.channels.get(&channel.id) {
            Some(colors) if colors.len() == wanted => Cow::Borrowed(colors.as_slice()),
            Some(colors) if colors.len() > wanted => Cow::Borrowed(&colors[..wanted]),
            Some(colors) => {
                let mut padded = colors.clone();
                padded.resize(wanted, BLACK.to_string());
                Cow::Owned(padded)
            }
            None => Cow::Owned(vec![BLACK.to_string(); wanted]),
        }
    }
}

// ── Notices ──────────────────────────────────────────────────────

/// Something the user should be told about, raised by a push message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    /// The controller reported an error.
    Failure(String),
    /// A preview run reached its last cue.
    Completed,
}

impl fmt::Display for SessionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failure(message) => f.write_str(message),
            Self::Completed => f.write_str("Preview finished"),
        }
    }
}

// ── SessionSnapshot ──────────────────────────────────────────────

/// Client-side view of one session.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub kind: SessionKind,
    pub phase: ConnectionPhase,
    pub status: SessionStatus,
    pub frame: FrameBuffer,
    /// Frames received since the client was created.
    pub frames_received: u64,
}

impl SessionSnapshot {
    pub fn new(kind: SessionKind) -> Self {
        Self {
            kind,
            phase: ConnectionPhase::default(),
            status: SessionStatus::default(),
            frame: FrameBuffer::default(),
            frames_received: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status.is_running
    }

    /// Zero-based cue position, `0` when unknown.
    pub fn cue_position(&self) -> usize {
        self.status.cue_index.unwrap_or(0)
    }

    pub fn should_reconnect(&self) -> bool {
        self.kind.should_reconnect(&self.status)
    }

    /// Apply one push message in arrival order.
    ///
    /// Returns a notice when the message is something the user should see.
    pub fn apply(&mut self, message: PushMessage) -> Option<SessionNotice> {
        match message {
            PushMessage::Frame(frame) => {
                self.frame.replace(frame);
                self.frames_received += 1;
                None
            }
            PushMessage::Status(status) => {
                self.apply_status(status);
                None
            }
            PushMessage::Done => match self.kind {
                SessionKind::Preview => {
                    self.reset_cue();
                    Some(SessionNotice::Completed)
                }
                SessionKind::Live => {
                    debug!("ignoring done on live channel");
                    None
                }
            },
            PushMessage::Error(error) => {
                if self.kind == SessionKind::Preview {
                    self.status.is_running = false;
                }
                Some(SessionNotice::Failure(format!(
                    "{} error: {}",
                    self.kind, error.message
                )))
            }
        }
    }

    /// Replace the status wholesale. A stopped session drops its frame.
    pub fn apply_status(&mut self, status: SessionStatus) {
        let running = status.is_running;
        self.status = status;
        if !running {
            self.frame.clear();
        }
    }

    // ── Local transitions after a successful RPC ────────────────

    /// A start request for `play_id` succeeded.
    pub fn mark_started(&mut self, play_id: &str) {
        self.status = SessionStatus {
            is_running: true,
            play_id: Some(play_id.to_string()),
            cue_index: Some(0),
            ..SessionStatus::default()
        };
    }

    /// A preview advance succeeded. Live waits for the pushed status.
    pub fn mark_advanced(&mut self) {
        if self.kind == SessionKind::Preview {
            self.status.cue_index = Some(self.cue_position() + 1);
            self.status.cue_name = None;
        }
    }

    /// A preview stop succeeded.
    pub fn mark_stopped(&mut self) {
        self.reset_cue();
        self.frame.clear();
    }

    fn reset_cue(&mut self) {
        self.status.is_running = false;
        self.status.cue_index = Some(0);
        self.status.cue_id = None;
        self.status.cue_name = None;
    }
}

// ── Tests ────────────────────────────────────────────────────────
