//! In-memory transports shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pilites_core::TransportError;
use pilites_core::network::{PushChannel, PushConnector};
use pilites_core::rpc::{HttpRequest, HttpResponse, HttpTransport};
use tokio::sync::mpsc;

// ── HTTP ─────────────────────────────────────────────────────────

/// Scripted controller: replies by `"METHOD /path"`, `200 {"ok": true}`
/// for anything unscripted, and records every request.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<String, Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, route: &str, status: u16, body: &str) -> Self {
        self.set_reply(route, status, body);
        self
    }

    pub fn fail(self, route: &str, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(route.to_string(), Err(TransportError::new(message)));
        self
    }

    pub fn set_reply(&self, route: &str, status: u16, body: &str) {
        self.replies.lock().unwrap().insert(
            route.to_string(),
            Ok(HttpResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
        );
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `"METHOD /path"` for every request, in order.
    pub fn routes(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let route = format!("{} {}", request.method, request.path);
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .get(&route)
            .cloned()
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 200,
                    body: br#"{"ok": true}"#.to_vec(),
                })
            })
    }
}

// ── Push channel ─────────────────────────────────────────────────

/// Hands the test the controller end of every channel it opens.
///
/// Sending on the controller end delivers a message; dropping it closes
/// the channel.
pub struct FakeConnector {
    attempts: AtomicUsize,
    refuse: AtomicBool,
    close_delay: Mutex<Duration>,
    paths: Mutex<Vec<String>>,
    servers: mpsc::UnboundedSender<mpsc::UnboundedSender<String>>,
}

impl FakeConnector {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<mpsc::UnboundedSender<String>>) {
        let (servers, accepted) = mpsc::unbounded_channel();
        let connector = Arc::new(Self {
            attempts: AtomicUsize::new(0),
            refuse: AtomicBool::new(false),
            close_delay: Mutex::new(Duration::ZERO),
            paths: Mutex::new(Vec::new()),
            servers,
        });
        (connector, accepted)
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// Make every channel opened from now on take `delay` to close.
    pub fn slow_close(&self, delay: Duration) {
        *self.close_delay.lock().unwrap() = delay;
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushConnector for FakeConnector {
    async fn connect(&self, path: &str) -> Result<Box<dyn PushChannel>, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(path.to_string());
        if self.refuse.load(Ordering::SeqCst) {
            return Err(TransportError::new("connection refused"));
        }
        let (server, rx) = mpsc::unbounded_channel();
        let _ = self.servers.send(server);
        let close_delay = *self.close_delay.lock().unwrap();
        Ok(Box::new(FakeChannel { rx, close_delay }))
    }
}

struct FakeChannel {
    rx: mpsc::UnboundedReceiver<String>,
    close_delay: Duration,
}

#[async_trait]
impl PushChannel for FakeChannel {
    async fn next_message(&mut self) -> Option<Result<String, TransportError>> {
        self.rx.recv().await.map(Ok)
    }

    async fn close(&mut self) {
        if !self.close_delay.is_zero() {
            tokio::time::sleep(self.close_delay).await;
        }
        self.rx.close();
    }
}
