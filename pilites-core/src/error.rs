//! Domain-specific error types for the PiLites client core.
//!
//! All fallible operations return `Result<T, PilitesError>`.
//! Validation failures are kept in their own enum so editors can surface
//! them inline without ever reaching the controller.

use thiserror::Error;

/// The canonical error type for the PiLites client core.
#[derive(Debug, Error)]
pub enum PilitesError {
    // ── Client-side validation ───────────────────────────────────
    /// An edit was rejected locally and never sent to the controller.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Request / transport ──────────────────────────────────────
    /// The controller answered with a non-success status.
    ///
    /// Displays the decoded message verbatim.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// No response was received at all.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A success response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    // ── Session ──────────────────────────────────────────────────
    /// A session state transition was requested from the wrong state.
    #[error("invalid transition: {0}")]
    InvalidTransition(&'static str),

    /// The session has been torn down.
    #[error("session closed")]
    SessionClosed,

    // ── Configuration ────────────────────────────────────────────
    /// A URL could not be parsed or mapped to a push endpoint.
    #[error("invalid url: {0}")]
    Url(String),

    /// A client option was unusable (e.g. an HTTP client could not be built).
    #[error("config error: {0}")]
    Config(String),

    /// Local I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

impl PilitesError {
    /// HTTP-style status code, when the controller produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for errors raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// ── TransportError ────────────────────────────────────────────────

/// A request that produced no response.
///
/// Carries the underlying transport's own error text unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

// ── ValidationError ───────────────────────────────────────────────

/// Edits blocked on the client before any RPC.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Name is required.")]
    MissingName,

    #[error("Channel is required.")]
    MissingChannel,

    #[error("LED count must be at least 1.")]
    ZeroLedCount,

    #[error("At least one range is required.")]
    EmptyRanges,

    #[error("A region needs at least one range.")]
    LastRange,

    #[error("Start must be ≤ end for all ranges (got {start}..{end}).")]
    InvalidRange { start: u32, end: u32 },

    #[error("Ranges overlap: [{a_start},{a_end}] and [{b_start},{b_end}].")]
    OverlappingRanges {
        a_start: u32,
        a_end: u32,
        b_start: u32,
        b_end: u32,
    },

    #[error("Range index {0} does not exist.")]
    NoSuchRange(usize),

    #[error("The first cue cannot track a previous cue.")]
    TrackOnFirstCue,

    #[error("Unknown region '{0}'.")]
    UnknownRegion(String),

    #[error("Unknown cue '{0}'.")]
    UnknownCue(String),

    #[error("Region '{0}' has no effect in this cue.")]
    NoEffect(String),

    #[error("No draft is open.")]
    NoDraft,

    #[error("Draft has not been applied yet.")]
    DraftNotCommitted,

    #[error("Unknown parameter '{key}' for {kind}.")]
    UnknownParam { kind: &'static str, key: String },

    #[error("Parameter '{key}' must be between {min} and {max}.")]
    ParamOutOfBounds { key: String, min: f64, max: f64 },

    #[error("Parameter '{key}' must be a color like #a1b2c3.")]
    InvalidColor { key: String },

    #[error("Parameter '{key}' must be one of: {options}.")]
    NotAnOption { key: String, options: String },

    #[error("Parameter '{key}' has the wrong type.")]
    WrongParamType { key: String },
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for PilitesError {
    fn from(s: String) -> Self {
        PilitesError::Other(s)
    }
}

impl From<&str> for PilitesError {
    fn from(s: &str) -> Self {
        PilitesError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for PilitesError {
    fn from(e: serde_json::Error) -> Self {
        PilitesError::Decode(e.to_string())
    }
}

impl From<url::ParseError> for PilitesError {
    fn from(e: url::ParseError) -> Self {
        PilitesError::Url(e.to_string())
    }
}
