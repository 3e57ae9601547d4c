use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::error::PilitesError;
use crate::network::{PushChannel, PushConnector};
use crate::protocol::PushMessage;
use crate::state::{ConnectionPhase, SessionKind, SessionNotice, SessionSnapshot};

/// Why the message pump returned.
enum PumpEnd {
    /// The channel closed or failed; the reconnect policy decides next.
    Closed,
    /// A preview run ended; the channel is no longer needed.
    Finished,
    /// The channel or the whole view was cancelled.
    Cancelled,
}

/// Services one session's push channel until cancelled or the reconnect
/// policy gives up.
pub(super) struct ChannelDriver<C> {
    pub kind: SessionKind,
    /// Stream path including the API base.
    pub path: String,
    pub connector: Arc<C>,
    pub state: Arc<watch::Sender<SessionSnapshot>>,
    pub notices: mpsc::UnboundedSender<SessionNotice>,
    /// Child of the view token; cancelled on stop or teardown.
    pub token: CancellationToken,
    pub reconnect_delay: Duration,
}

impl<C: PushConnector> ChannelDriver<C> {
    pub async fn run(self) {
        loop {
            if !self.set_phase(ConnectionPhase::open_requested) {
                return;
            }

            let opened = tokio::select! {
                _ = self.token.cancelled() => return,
                opened = self.connector.connect(&self.path) => opened,
            };

            match opened {
                Ok(mut channel) => {
                    info!(kind = %self.kind, path = %self.path, "push channel open");
                    let live = self.update(|s| {
                        s.frame.clear();
                        log_transition(self.kind, s.phase.opened());
                    });
                    let ended = if live {
                        self.pump(channel.as_mut()).await
                    } else {
                        PumpEnd::Cancelled
                    };
                    // A finished driver has already given up its slot, so a
                    // new run can open its own channel while this one closes.
                    channel.close().await;

                    match ended {
                        PumpEnd::Cancelled => return,
                        PumpEnd::Finished => {
                            info!(kind = %self.kind, "session no longer running, channel closed");
                            return;
                        }
                        PumpEnd::Closed => {}
                    }
                }
                Err(e) => warn!(kind = %self.kind, "push channel failed to open: {e}"),
            }

            if !self.set_phase(ConnectionPhase::closed) {
                return;
            }

            let failed_attempts = self.state.borrow().phase.failed_attempts();
            debug!(
                kind = %self.kind,
                failed_attempts,
                delay_ms = self.reconnect_delay.as_millis() as u64,
                "reconnect scheduled"
            );
            tokio::select! {
                _ = self.token.cancelled() => return,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }

            if self.token.is_cancelled() {
                return;
            }
            if !self.reconnect_or_retire() {
                info!(kind = %self.kind, "no session running, not reconnecting");
                return;
            }
            info!(kind = %self.kind, "reconnecting push channel");
        }
    }

    async fn pump(&self, channel: &mut dyn PushChannel) -> PumpEnd {
        loop {
            let next = tokio::select! {
                _ = self.token.cancelled() => return PumpEnd::Cancelled,
                next = channel.next_message() => next,
            };

            match next {
                Some(Ok(text)) => {
                    if let Some(end) = self.dispatch(&text) {
                        return end;
                    }
                }
                Some(Err(e)) => {
                    warn!(kind = %self.kind, "push channel error: {e}");
                    return PumpEnd::Closed;
                }
                None => {
                    info!(kind = %self.kind, "push channel closed");
                    return PumpEnd::Closed;
                }
            }
        }
    }

    /// Apply one raw message. `None` keeps the pump going.
    ///
    /// A preview that stops running retires the driver while the state is
    /// still locked, so a `start` racing with the final message either sees
    /// the driver gone or has its run observed here.
    fn dispatch(&self, text: &str) -> Option<PumpEnd> {
        let message = match PushMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                debug!(kind = %self.kind, "dropping malformed push message: {e}");
                return self.token.is_cancelled().then_some(PumpEnd::Cancelled);
            }
        };
        trace!(kind = %self.kind, message = message.kind(), "push message");

        let mut notice = None;
        let mut finished = false;
        let applied = self.update(|s| {
            notice = s.apply(message);
            if self.kind == SessionKind::Preview && !s.is_running() {
                log_transition(self.kind, s.phase.closed());
                self.token.cancel();
                finished = true;
            }
        });
        if !applied {
            return Some(PumpEnd::Cancelled);
        }
        if let Some(notice) = notice {
            if let SessionNotice::Failure(message) = &notice {
                warn!(kind = %self.kind, "{message}");
            }
            // Nobody listening is fine; the snapshot still carries the state.
            let _ = self.notices.send(notice);
        }
        finished.then_some(PumpEnd::Finished)
    }

    /// Decide, under the state lock, whether to reopen the channel. A
    /// driver that gives up cancels its own token first.
    fn reconnect_or_retire(&self) -> bool {
        let mut reconnect = false;
        self.state.send_if_modified(|s| {
            reconnect = s.should_reconnect();
            if !reconnect {
                self.token.cancel();
            }
            false
        });
        reconnect
    }

    /// Write through the watch channel unless cancelled.
    fn update(&self, f: impl FnOnce(&mut SessionSnapshot)) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.state.send_modify(f);
        true
    }

    fn set_phase(&self, step: fn(&mut ConnectionPhase) -> Result<(), PilitesError>) -> bool {
        self.update(|s| log_transition(self.kind, step(&mut s.phase)))
    }
}

fn log_transition(kind: SessionKind, result: Result<(), PilitesError>) {
    if let Err(e) = result {
        warn!(%kind, "{e}");
    }
}
