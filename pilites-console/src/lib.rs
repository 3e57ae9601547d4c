//! # pilites-console: terminal client for the PiLites controller
//!
//! Lists channels and plays, draws a play's channel layout as text
//! strips, and follows Preview or Live sessions with single-key
//! controls read from stdin.

pub mod config;
pub mod dashboard;
pub mod input;
pub mod render;
