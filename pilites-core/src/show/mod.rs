//! Show model: channels, regions, cues, effects and plays.
//!
//! Entities serialize with the controller's camelCase field names so a
//! [`Play`] can be round-tripped through the RPC layer unchanged.

mod channel;
mod cue;
mod ids;
mod play;
mod region;

pub use channel::{Channel, ColorOrder, GpioPin};
pub use cue::{Cue, Effect};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use play::{OverlapConflict, Play, PlaySummary};
pub use region::{PixelRange, REGION_PALETTE, Region};
