//! Push-channel plumbing.
//!
//! The session client only sees the [`PushConnector`] / [`PushChannel`]
//! traits; [`WsConnector`] is the WebSocket implementation used against a
//! real controller.

mod push;

pub use push::{PushChannel, PushConnector, WsChannel, WsConnector, stream_base_url};
