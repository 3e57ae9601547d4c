//! Realtime Preview / Live session client.
//!
//! # Lifecycle
//!
//! ```text
//!   attach / start ──► Connecting ──► Connected ──► (close / error)
//!                           ▲                              │
//!                           │        wait reconnect delay  │
//!                           └──── policy says reconnect ◄──┘
//!                                          │ otherwise
//!                                          ▼
//!                                     Disconnected
//! ```
//!
//! One [`SessionClient`] owns at most one push channel and its reconnect
//! timer. The channel is serviced by a driver task; every state write goes
//! through a `watch` channel and is skipped once the owning view's
//! cancellation token has fired.

mod client;
mod driver;

pub use client::{DEFAULT_RECONNECT_DELAY, LIVE_STOP_PROMPT, SessionClient, SessionOptions};
