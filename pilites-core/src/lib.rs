//! # pilites-core
//!
//! Client core for the PiLites LED show controller.
//!
//! This crate contains:
//! - **Effects**: `EffectKind` and the static parameter schema registry
//! - **Show model**: `Channel`, `Region`, `Cue`, `Effect`, `Play`
//! - **Segmentation**: laying a channel's regions out as display segments
//! - **Resolution**: per-region off / track / effect modes within a cue
//! - **Editor**: `PlayEditor` with region and cue drafts
//! - **RPC**: `RpcGateway` over an `HttpTransport`, with exact error decoding
//! - **Realtime**: `SessionClient` for Preview and Live push channels
//! - **Error**: `PilitesError`, a typed `thiserror`-based error hierarchy

pub mod editor;
pub mod effects;
pub mod error;
pub mod network;
pub mod protocol;
pub mod realtime;
pub mod resolve;
pub mod rpc;
pub mod segment;
pub mod show;
pub mod state;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use editor::{Draft, PlayEditor};
pub use effects::{EffectKind, EffectSchema, ParamValue, Params, default_params_for};
pub use error::{PilitesError, TransportError, ValidationError};
pub use network::{PushChannel, PushConnector, WsConnector};
pub use protocol::{LiveStatus, PreviewStatus, PushMessage, SessionStatus};
pub use realtime::{SessionClient, SessionOptions};
pub use resolve::{ModeChoice, RegionMode, resolve_mode};
pub use rpc::{HttpTransport, ReqwestTransport, RpcGateway};
pub use segment::{Segment, SegmentOwner, segment_channel};
pub use show::{Channel, Cue, Effect, IdGenerator, PixelRange, Play, PlaySummary, Region};
pub use state::{ConnectionPhase, FrameBuffer, SessionKind, SessionNotice, SessionSnapshot};
