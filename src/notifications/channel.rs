//! Live notification channel
//!
//! Maintains a persistent, reconnecting WebSocket subscription scoped to an
//! authenticated session and keeps the local notification mirror current.
//! All cache mutations funnel through this module so the unread-count
//! invariant is enforced in one place; read and delete operations apply
//! optimistically and reconcile with the server in the background.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use rand::Rng;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use super::alerts::Alert;
use super::cache::NotificationCache;
use super::model::{Notification, ServerEvent};
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Buffered alerts before the consumer falls behind
const ALERT_BUFFER: usize = 32;

/// Connection state of the live channel
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

/// State shared between the channel handle and its run loop
struct Shared {
    cache: RwLock<NotificationCache>,
    connection: watch::Sender<ConnectionState>,
    alerts: mpsc::Sender<Alert>,
    /// Cleared on shutdown; a reconnect timer that fires afterwards must
    /// observe this and do nothing
    alive: AtomicBool,
}

impl Shared {
    fn set_connection(&self, state: ConnectionState) {
        // send_replace stores the value even when nobody is watching yet
        self.connection.send_replace(state);
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Apply a pushed event to the mirror
    async fn apply_event(&self, event: ServerEvent) {
        match event {
            ServerEvent::NewNotification { notification } => {
                let mut cache = self.cache.write().await;
                if cache.push(notification.clone()) {
                    drop(cache);
                    tracing::info!(
                        id = %notification.id,
                        kind = %notification.kind,
                        "Notification received"
                    );
                    if self
                        .alerts
                        .try_send(Alert::for_notification(&notification))
                        .is_err()
                    {
                        tracing::debug!("Alert consumer not keeping up; alert dropped");
                    }
                } else {
                    tracing::debug!(id = %notification.id, "Duplicate notification delivery ignored");
                }
            }
            ServerEvent::NotificationRead { id } => {
                self.cache.write().await.mark_read(id);
            }
            ServerEvent::AllNotificationsRead => {
                self.cache.write().await.mark_all_read();
            }
        }
    }
}

/// Live, reconnecting notification channel for one authenticated session.
///
/// Constructed explicitly per session and torn down with [`shutdown`];
/// consumers read the mirror through the accessors and never mutate it
/// directly.
///
/// [`shutdown`]: NotificationChannel::shutdown
pub struct NotificationChannel {
    config: ClientConfig,
    api: Option<ApiClient>,
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationChannel {
    /// Build a channel for the session in `config`. Returns the channel and
    /// the stream of transient alerts derived from pushed notifications.
    pub fn new(config: ClientConfig) -> ClientResult<(Self, mpsc::Receiver<Alert>)> {
        let api = match &config.session_token {
            Some(token) => Some(ApiClient::new(&config, token.clone())?),
            None => None,
        };

        let (alert_tx, alert_rx) = mpsc::channel(ALERT_BUFFER);
        let (connection_tx, _) = watch::channel(ConnectionState::Disconnected);

        let channel = Self {
            config,
            api,
            shared: Arc::new(Shared {
                cache: RwLock::new(NotificationCache::new()),
                connection: connection_tx,
                alerts: alert_tx,
                alive: AtomicBool::new(false),
            }),
            task: Mutex::new(None),
        };

        Ok((channel, alert_rx))
    }

    /// Open the live subscription. A session without a token gets no live
    /// notifications; calling this while already connected is a no-op.
    pub async fn connect(&self) -> ClientResult<()> {
        let (Some(token), Some(api)) = (self.config.session_token.clone(), self.api.clone())
        else {
            tracing::info!("No session token; notification channel not opened");
            return Ok(());
        };

        let mut task = self.task.lock().await;
        if let Some(handle) = task.as_ref() {
            if !handle.is_finished() {
                tracing::debug!("Notification channel already running");
                return Ok(());
            }
        }

        self.shared.alive.store(true, Ordering::SeqCst);
        let shared = self.shared.clone();
        let config = self.config.clone();
        *task = Some(tokio::spawn(async move {
            run_channel(shared, api, config, token).await;
        }));

        Ok(())
    }

    /// Tear the channel down: cancel pending reconnects, close the
    /// transport, and leave the state disconnected.
    pub async fn shutdown(&self) {
        self.shared.alive.store(false, Ordering::SeqCst);
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
        }
        self.shared.set_connection(ConnectionState::Disconnected);
        tracing::info!("Notification channel shut down");
    }

    /// Current connection state
    pub fn connection_state(&self) -> ConnectionState {
        *self.shared.connection.subscribe().borrow()
    }

    /// Watch connection state changes (for a connectivity indicator)
    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.shared.connection.subscribe()
    }

    /// Snapshot of the cached notifications, newest first
    pub async fn notifications(&self) -> Vec<Notification> {
        self.shared.cache.read().await.entries().to_vec()
    }

    pub async fn unread_count(&self) -> usize {
        self.shared.cache.read().await.unread_count()
    }

    /// Apply a pushed event to the local mirror. The run loop feeds decoded
    /// frames through here; it is public so alternative transports can drive
    /// the same cache.
    pub async fn handle_event(&self, event: ServerEvent) {
        self.shared.apply_event(event).await;
    }

    /// Replace the mirror with the server's recent notifications and
    /// authoritative unread count. On failure the previous cache is left
    /// untouched.
    pub async fn fetch_backlog(&self) -> ClientResult<()> {
        let Some(api) = &self.api else {
            return Ok(());
        };

        reconcile_backlog(&self.shared, api, self.config.backlog_limit).await
    }

    /// Mark one notification read: the mirror flips immediately, the server
    /// call follows. A failed server call is logged and the optimistic state
    /// kept; the next backlog fetch reconciles.
    pub async fn mark_as_read(&self, id: Uuid) {
        self.shared.cache.write().await.mark_read(id);

        if let Some(api) = &self.api {
            if let Err(e) = api.mark_notification_read(id).await {
                tracing::warn!(id = %id, error = %e, "Failed to mark notification read on server");
            }
        }
    }

    /// Bulk version of [`mark_as_read`](NotificationChannel::mark_as_read)
    pub async fn mark_all_as_read(&self) {
        self.shared.cache.write().await.mark_all_read();

        if let Some(api) = &self.api {
            if let Err(e) = api.mark_all_notifications_read().await {
                tracing::warn!(error = %e, "Failed to mark all notifications read on server");
            }
        }
    }

    /// Remove a notification locally and on the server
    pub async fn delete_notification(&self, id: Uuid) {
        self.shared.cache.write().await.remove(id);

        if let Some(api) = &self.api {
            if let Err(e) = api.delete_notification(id).await {
                tracing::warn!(id = %id, error = %e, "Failed to delete notification on server");
            }
        }
    }
}

/// Connection run loop: dial, reconcile, read until drop, retry with capped
/// exponential backoff while attempts remain.
async fn run_channel(shared: Arc<Shared>, api: ApiClient, config: ClientConfig, token: String) {
    let mut attempt: u32 = 0;

    loop {
        if !shared.is_alive() {
            break;
        }

        shared.set_connection(ConnectionState::Connecting);

        match dial(&config, &token).await {
            Ok(stream) => {
                attempt = 0;
                shared.set_connection(ConnectionState::Connected);
                tracing::info!(url = %config.ws_url, "Notification channel connected");

                // Reconciliation point: corrects drift from pushes missed
                // while disconnected
                if let Err(e) = reconcile_backlog(&shared, &api, config.backlog_limit).await {
                    tracing::warn!(error = %e, "Backlog fetch failed; keeping previous cache");
                }

                read_frames(stream, &shared).await;
                tracing::warn!("Notification channel lost connection");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Notification channel connect failed");
            }
        }

        if !shared.is_alive() {
            break;
        }

        attempt += 1;
        if attempt > config.reconnect_attempts {
            tracing::error!(
                attempts = config.reconnect_attempts,
                "Reconnect budget exhausted; notification channel staying disconnected"
            );
            break;
        }

        let delay = with_jitter(backoff_delay(
            attempt,
            config.reconnect_delay,
            config.reconnect_delay_max,
        ));
        tracing::info!(attempt = attempt, delay_ms = %delay.as_millis(), "Reconnecting notification channel");
        tokio::time::sleep(delay).await;
    }

    shared.set_connection(ConnectionState::Disconnected);
}

/// Establish the WebSocket connection with the session credential attached
async fn dial(config: &ClientConfig, token: &str) -> ClientResult<WsStream> {
    let mut request = config.ws_url.as_str().into_client_request()?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| ClientError::Transport(tungstenite::Error::HttpFormat(e.into())))?;
    request.headers_mut().insert(AUTHORIZATION, bearer);

    let connect = connect_async(request);
    match tokio::time::timeout(config.connect_timeout, connect).await {
        Ok(Ok((stream, _response))) => Ok(stream),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(ClientError::Transport(tungstenite::Error::Io(
            std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out"),
        ))),
    }
}

async fn reconcile_backlog(shared: &Arc<Shared>, api: &ApiClient, limit: u32) -> ClientResult<()> {
    let page = api.list_notifications(limit).await?;
    let mut cache = shared.cache.write().await;
    cache.replace_all(page.notifications, page.unread_count);
    tracing::debug!(
        count = cache.len(),
        unread = cache.unread_count(),
        "Notification backlog reconciled"
    );
    Ok(())
}

/// Consume frames until the transport drops
async fn read_frames(mut stream: WsStream, shared: &Arc<Shared>) {
    while let Some(frame) = stream.next().await {
        if !shared.is_alive() {
            break;
        }
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                Ok(event) => shared.apply_event(event).await,
                Err(e) => {
                    tracing::warn!(error = %e, "Unrecognized notification channel payload")
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Notification channel read error");
                break;
            }
        }
    }
}

/// Exponential backoff schedule: base * 2^(attempt-1), capped
fn backoff_delay(attempt: u32, base: Duration, cap: Duration) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    base.saturating_mul(1u32 << exponent).min(cap)
}

fn with_jitter(delay: Duration) -> Duration {
    let factor = rand::thread_rng().gen_range(0.85..1.15);
    delay.mul_f64(factor)
}
