pub mod connection;
mod session;

pub use connection::ConnectionPhase;
pub use session::{BLACK, FrameBuffer, SessionKind, SessionNotice, SessionSnapshot};
