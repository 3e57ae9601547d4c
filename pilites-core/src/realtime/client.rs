use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::PilitesError;
use crate::network::PushConnector;
use crate::realtime::driver::ChannelDriver;
use crate::rpc::{API_BASE, HttpTransport, RpcGateway};
use crate::state::{SessionKind, SessionNotice, SessionSnapshot};

/// Delay between a channel closing and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Question put to the operator before a live session is stopped.
pub const LIVE_STOP_PROMPT: &str = "Stop the live session? All lights will turn off.";

// ── SessionOptions ───────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Wait before reopening a closed push channel.
    pub reconnect_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

// ── SessionClient ────────────────────────────────────────────────

struct ChannelHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Follows one Preview or Live session for the lifetime of a view.
///
/// The latest [`SessionSnapshot`] is published over a `watch` channel;
/// user-visible [`SessionNotice`]s go to the sender given at construction.
/// Control actions are one-shot RPCs and only change local state after
/// the controller accepted them.
pub struct SessionClient<T, C> {
    kind: SessionKind,
    gateway: Arc<RpcGateway<T>>,
    connector: Arc<C>,
    options: SessionOptions,
    state: Arc<watch::Sender<SessionSnapshot>>,
    notices: mpsc::UnboundedSender<SessionNotice>,
    /// Liveness of the owning view.
    view: CancellationToken,
    channel: Option<ChannelHandle>,
}

impl<T: HttpTransport, C: PushConnector> SessionClient<T, C> {
    pub fn new(
        kind: SessionKind,
        gateway: Arc<RpcGateway<T>>,
        connector: Arc<C>,
        options: SessionOptions,
        notices: mpsc::UnboundedSender<SessionNotice>,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::new(kind));
        Self {
            kind,
            gateway,
            connector,
            options,
            state: Arc::new(state),
            notices,
            view: CancellationToken::new(),
            channel: None,
        }
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    /// A receiver that observes every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Whether a driver task currently services the push channel.
    ///
    /// A driver that has decided to finish cancels its own token before it
    /// closes the channel, so it no longer counts here.
    pub fn has_channel(&self) -> bool {
        self.channel
            .as_ref()
            .is_some_and(|handle| !handle.token.is_cancelled() && !handle.task.is_finished())
    }

    pub fn is_torn_down(&self) -> bool {
        self.view.is_cancelled()
    }

    // ── View lifecycle ───────────────────────────────────────────

    /// Pick up whatever the controller is already doing.
    ///
    /// Live fetches its status and always opens the channel, even when the
    /// status fetch fails (the error is still returned). Preview only opens
    /// the channel when a run is already in progress.
    pub async fn attach(&mut self) -> Result<(), PilitesError> {
        self.ensure_open()?;
        match self.kind {
            SessionKind::Live => {
                let fetched = self.gateway.live_status().await;
                let result = match fetched {
                    Ok(status) => {
                        self.update(|s| s.apply_status(status));
                        Ok(())
                    }
                    Err(e) => Err(e),
                };
                self.open_channel()?;
                result
            }
            SessionKind::Preview => {
                let status = self.gateway.preview_status().await?;
                if status.is_running {
                    info!(play_id = ?status.play_id, "adopting running preview");
                    self.update(|s| {
                        s.status.is_running = true;
                        s.status.play_id = status.play_id;
                    });
                    self.open_channel()?;
                }
                Ok(())
            }
        }
    }

    /// Tear the view down: cancel the reconnect timer, close the channel
    /// and stop all further state writes.
    pub async fn teardown(&mut self) {
        self.view.cancel();
        self.close_channel().await;
        debug!(kind = %self.kind, "session client torn down");
    }

    // ── Control actions ──────────────────────────────────────────

    /// Start a run of `play_id` and open the push channel.
    pub async fn start(&mut self, play_id: &str) -> Result<(), PilitesError> {
        self.ensure_open()?;
        match self.kind {
            SessionKind::Preview => self.gateway.start_preview(play_id).await?,
            SessionKind::Live => self.gateway.start_live(play_id).await?,
        }
        info!(kind = %self.kind, play_id, "session started");
        self.update(|s| s.mark_started(play_id));
        self.open_channel()
    }

    /// Advance to the next cue.
    pub async fn advance(&self) -> Result<(), PilitesError> {
        self.ensure_open()?;
        match self.kind {
            SessionKind::Preview => {
                self.gateway.preview_next().await?;
                self.update(|s| s.mark_advanced());
            }
            SessionKind::Live => self.gateway.live_next().await?,
        }
        Ok(())
    }

    /// Toggle blackout on the live output.
    pub async fn toggle_blackout(&self) -> Result<(), PilitesError> {
        self.ensure_open()?;
        match self.kind {
            SessionKind::Live => self.gateway.live_blackout().await,
            SessionKind::Preview => Err(PilitesError::InvalidTransition(
                "blackout is only available in live sessions",
            )),
        }
    }

    /// Stop the session.
    ///
    /// Live asks `confirm` with [`LIVE_STOP_PROMPT`] first and returns
    /// `Ok(false)` when declined. Live keeps its state until the controller
    /// pushes a new status; Preview resets and closes its channel once the
    /// stop was accepted.
    pub async fn stop(&mut self, confirm: impl FnOnce(&str) -> bool) -> Result<bool, PilitesError> {
        self.ensure_open()?;
        if self.kind.stop_needs_confirmation() && !confirm(LIVE_STOP_PROMPT) {
            debug!(kind = %self.kind, "stop declined");
            return Ok(false);
        }

        match self.kind {
            SessionKind::Live => self.gateway.stop_live().await?,
            SessionKind::Preview => {
                self.gateway.stop_preview().await?;
                self.close_channel().await;
                self.update(|s| {
                    s.mark_stopped();
                    s.phase.reset();
                });
            }
        }
        info!(kind = %self.kind, "session stopped");
        Ok(true)
    }

    // ── Internals ────────────────────────────────────────────────

    fn ensure_open(&self) -> Result<(), PilitesError> {
        if self.view.is_cancelled() {
            return Err(PilitesError::SessionClosed);
        }
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut SessionSnapshot)) {
        if !self.view.is_cancelled() {
            self.state.send_modify(f);
        }
    }

    /// Spawn a driver unless one is still running.
    fn open_channel(&mut self) -> Result<(), PilitesError> {
        self.ensure_open()?;
        if self.has_channel() {
            return Ok(());
        }

        // A retired driver may still be closing its channel; it no longer
        // writes state, so let it finish on its own.
        if let Some(retired) = self.channel.take() {
            debug!(
                kind = %self.kind,
                closing = !retired.task.is_finished(),
                "replacing retired driver"
            );
        }
        self.update(|s| s.phase.reset());

        let token = self.view.child_token();
        let driver = ChannelDriver {
            kind: self.kind,
            path: format!("{API_BASE}{}", self.kind.stream_path()),
            connector: Arc::clone(&self.connector),
            state: Arc::clone(&self.state),
            notices: self.notices.clone(),
            token: token.clone(),
            reconnect_delay: self.options.reconnect_delay,
        };
        let task = tokio::spawn(driver.run());
        self.channel = Some(ChannelHandle { token, task });
        Ok(())
    }

    async fn close_channel(&mut self) {
        if let Some(handle) = self.channel.take() {
            handle.token.cancel();
            // The driver only fails to join if it panicked.
            let _ = handle.task.await;
        }
    }
}

impl<T, C> Drop for SessionClient<T, C> {
    fn drop(&mut self) {
        self.view.cancel();
    }
}
