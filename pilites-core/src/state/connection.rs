//! Push-channel connection phase.
//!
//! [`ConnectionPhase`] follows one push channel through open, close and
//! reconnect. Transitions are checked and return `Result`; the driver logs
//! a rejected transition rather than acting on it.

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::PilitesError;

/// Where a session's push channel currently is.
///
/// ```text
///  Disconnected ──open_requested──► Connecting ──opened──► Connected
///       ▲                               │                      │
///       └─────────── closed ────────────┴──────────────────────┘
/// ```
///
/// Failed opens are counted so a view can show that the controller is
/// unreachable instead of merely reconnecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionPhase {
    Disconnected {
        /// Opens that failed since the channel was last connected.
        failed_attempts: u32,
    },
    Connecting {
        /// 1 for a first try, higher while the controller keeps refusing.
        attempt: u32,
    },
    Connected {
        since: Instant,
    },
}

impl Default for ConnectionPhase {
    fn default() -> Self {
        Self::Disconnected { failed_attempts: 0 }
    }
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { .. } => f.write_str("Disconnected"),
            Self::Connecting { attempt: 1 } => f.write_str("Connecting"),
            Self::Connecting { attempt } => write!(f, "Connecting (attempt {attempt})"),
            Self::Connected { .. } => f.write_str("Connected"),
        }
    }
}

impl ConnectionPhase {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting { .. })
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }

    /// Consecutive failed opens; `0` once a channel was established.
    pub fn failed_attempts(&self) -> u32 {
        match self {
            Self::Disconnected { failed_attempts } => *failed_attempts,
            Self::Connecting { attempt } => attempt.saturating_sub(1),
            Self::Connected { .. } => 0,
        }
    }

    /// Time since the channel opened.
    pub fn open_for(&self) -> Option<Duration> {
        match self {
            Self::Connected { since } => Some(since.elapsed()),
            _ => None,
        }
    }

    // ── Transitions ──────────────────────────────────────────────

    /// A connect attempt is starting. Only valid while disconnected.
    pub fn open_requested(&mut self) -> Result<(), PilitesError> {
        let Self::Disconnected { failed_attempts } = *self else {
            return Err(PilitesError::InvalidTransition(
                "push channel is already open or opening",
            ));
        };
        *self = Self::Connecting {
            attempt: failed_attempts + 1,
        };
        Ok(())
    }

    /// The connect attempt succeeded.
    pub fn opened(&mut self) -> Result<(), PilitesError> {
        if !self.is_connecting() {
            return Err(PilitesError::InvalidTransition(
                "push channel opened without a pending connect",
            ));
        }
        *self = Self::Connected {
            since: Instant::now(),
        };
        Ok(())
    }

    /// The channel closed, failed, or never opened.
    ///
    /// A failed open keeps counting; a close after a successful open
    /// starts over.
    pub fn closed(&mut self) -> Result<(), PilitesError> {
        let failed_attempts = match *self {
            Self::Connecting { attempt } => attempt,
            Self::Connected { .. } => 0,
            Self::Disconnected { .. } => {
                return Err(PilitesError::InvalidTransition(
                    "push channel is already closed",
                ));
            }
        };
        *self = Self::Disconnected { failed_attempts };
        Ok(())
    }

    /// Drop to a clean `Disconnected`, whatever the current phase.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_and_close() {
        let mut phase = ConnectionPhase::default();
        phase.open_requested().unwrap();
        assert!(phase.is_connecting());
        assert_eq!(phase.to_string(), "Connecting");

        phase.opened().unwrap();
        assert!(phase.is_connected());
        assert!(phase.open_for().is_some());

        phase.closed().unwrap();
        assert_eq!(phase, ConnectionPhase::Disconnected { failed_attempts: 0 });
    }

    #[test]
    fn refused_opens_are_counted() {
        let mut phase = ConnectionPhase::default();
        for _ in 0..3 {
            phase.open_requested().unwrap();
            phase.closed().unwrap();
        }
        assert_eq!(phase.failed_attempts(), 3);

        phase.open_requested().unwrap();
        assert_eq!(phase.to_string(), "Connecting (attempt 4)");

        phase.opened().unwrap();
        assert_eq!(phase.failed_attempts(), 0);
        phase.closed().unwrap();
        assert_eq!(phase.failed_attempts(), 0);
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut phase = ConnectionPhase::default();
        assert!(phase.opened().is_err());
        assert!(phase.closed().is_err());

        phase.open_requested().unwrap();
        assert!(phase.open_requested().is_err());
        phase.opened().unwrap();
        assert!(phase.opened().is_err());
        assert!(phase.is_connected());
    }

    #[test]
    fn reset_clears_the_count() {
        let mut phase = ConnectionPhase::Connecting { attempt: 5 };
        phase.reset();
        assert!(phase.is_disconnected());
        assert_eq!(phase.failed_attempts(), 0);
        assert_eq!(phase.to_string(), "Disconnected");
    }

    #[test]
    fn zero_attempt_does_not_underflow() {
        let phase = ConnectionPhase::Connecting { attempt: 0 };
        assert_eq!(phase.failed_attempts(), 0);
    }
}
