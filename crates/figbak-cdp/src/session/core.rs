//! Core session struct, CDP command dispatch, and the event pump.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use futures::SinkExt;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace};

use crate::client::{PendingRequest, WsSink};
use crate::error::CdpError;
use crate::protocol::{CdpRequest, CdpResponse};

/// Page-level signals distilled from the CDP event stream.
pub(crate) struct PageEvents {
    /// Bumped on every committed main-frame navigation.
    nav_tx: watch::Sender<u64>,
    /// Requests currently in flight.
    inflight: AtomicI64,
    /// Instant of the last observed network activity.
    last_activity: Mutex<Instant>,
}

impl PageEvents {
    pub(crate) fn new() -> Self {
        let (nav_tx, _) = watch::channel(0u64);
        Self {
            nav_tx,
            inflight: AtomicI64::new(0),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    pub(crate) fn subscribe_navigation(&self) -> watch::Receiver<u64> {
        self.nav_tx.subscribe()
    }

    pub(crate) fn is_quiet_for(&self, quiet: Duration) -> bool {
        self.inflight.load(Ordering::SeqCst) <= 0 && self.last_activity.lock().elapsed() >= quiet
    }

    fn touch(&self) {
        *self.last_activity.lock() = Instant::now();
    }

    pub(crate) fn apply(&self, method: &str, params: &Value) {
        match method {
            "Page.frameNavigated" => {
                // Only the main frame counts as a navigation of the page.
                if params["frame"]["parentId"].is_null() {
                    self.nav_tx.send_modify(|n| *n += 1);
                }
            }
            "Network.requestWillBeSent" => {
                self.inflight.fetch_add(1, Ordering::SeqCst);
                self.touch();
            }
            "Network.loadingFinished" | "Network.loadingFailed" => {
                let _ = self
                    .inflight
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some((n - 1).max(0)));
                self.touch();
            }
            _ => {}
        }
    }
}

/// A session attached to a single page/target.
pub struct PageSession {
    /// Target ID.
    pub(super) target_id: String,
    /// Session ID for this target.
    pub(super) session_id: String,
    /// WebSocket sender (shared with the client).
    pub(super) ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    /// Pending requests (shared with the client).
    pub(super) pending: Arc<Mutex<HashMap<u64, PendingRequest>>>,
    /// Request ID counter (shared with the client).
    pub(super) request_id: Arc<AtomicU64>,
    /// Distilled event state, fed by the pump task.
    pub(super) events: Arc<PageEvents>,
    /// Event pump task handle.
    pump: tokio::task::JoinHandle<()>,
}

impl PageSession {
    /// Create a new page session and start its event pump.
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
        pending: Arc<Mutex<HashMap<u64, PendingRequest>>>,
        request_id: Arc<AtomicU64>,
        mut event_rx: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        let events = Arc::new(PageEvents::new());
        let pump = {
            let events = events.clone();
            tokio::spawn(async move {
                while let Some(event) = event_rx.recv().await {
                    if let Some(method) = event.method.as_deref() {
                        trace!("CDP event: {}", method);
                        let params = event.params.unwrap_or(Value::Null);
                        events.apply(method, &params);
                    }
                }
            })
        };
        Self {
            target_id,
            session_id,
            ws_tx,
            pending,
            request_id,
            events,
            pump,
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Get session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: Some(self.session_id.clone()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP session send: {}", json);

        let (tx, rx) = tokio::sync::oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            ws.send(Message::Text(json.into())).await?;
        }

        match tokio::time::timeout(std::time::Duration::from_secs(30), rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    /// Enable the CDP domains the bot relies on.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        self.call("Network.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Close this page.
    pub async fn close(&self) -> Result<(), CdpError> {
        self.call("Page.close", None).await?;
        Ok(())
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
