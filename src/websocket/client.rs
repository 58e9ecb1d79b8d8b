//! WebSocket client implementation

use chrono::{DateTime, Utc};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, Mutex, RwLock};
use tokio::time::Instant;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};

use super::subscription::{
    decode_frame, ServerFrame, Subscription, SubscriptionManager, SubscriptionRequest, WsEvent,
};
use crate::client::ApiEnvironment;
use crate::error::{Error, Result};

/// Connection state of the WebSocket client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection, either never opened or dropped by `disconnect`
    Disconnected,
    /// Opening the connection
    Connecting,
    /// Connected and reading frames
    Connected,
    /// Connection lost, attempting to reconnect
    Reconnecting,
    /// Closed for good; `connect` is refused
    Closed,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Reconnecting => write!(f, "Reconnecting"),
            ConnectionState::Closed => write!(f, "Closed"),
        }
    }
}

/// Configuration for automatic reconnection
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Whether a lost connection is reopened at all
    pub enabled: bool,
    /// Delay before the first reconnect attempt
    pub initial_delay: Duration,
    /// Upper bound for the backoff delay
    pub max_delay: Duration,
    /// Factor applied to the delay after each failed attempt
    pub backoff_multiplier: f64,
    /// `None` retries forever
    pub max_attempts: Option<u32>,
    /// A connection with no frames for this long counts as lost.
    /// The exchange pings every 5 seconds.
    pub idle_timeout: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            max_attempts: None,
            idle_timeout: Duration::from_secs(30),
        }
    }
}

impl ReconnectConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Delay for a 0-indexed attempt, capped at `max_delay`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.initial_delay;
        }

        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = (self.initial_delay.as_millis() as f64 * multiplier) as u64;
        std::cmp::min(Duration::from_millis(delay_ms), self.max_delay)
    }

    pub fn should_attempt(&self, attempt: u32) -> bool {
        if !self.enabled {
            return false;
        }
        match self.max_attempts {
            Some(max) => attempt < max,
            None => true,
        }
    }
}

const EVENT_BUFFER: usize = 1024;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// State shared between the client handle and its reader task
struct Shared {
    url: String,
    state: RwLock<ConnectionState>,
    state_tx: watch::Sender<ConnectionState>,
    sink: Mutex<Option<WsSink>>,
    events_tx: mpsc::Sender<WsEvent>,
    subscriptions: SubscriptionManager,
    reconnect_config: ReconnectConfig,
    reconnect_attempts: AtomicU64,
    next_id: AtomicU64,
    last_ping: RwLock<Option<Instant>>,
    shutdown_tx: watch::Sender<bool>,
    /// Bumped by every `connect` and `disconnect`; a reader task only runs
    /// while its connection is the current one
    generation_tx: watch::Sender<u64>,
}

/// Client for the Huobi market data feed
///
/// Frames arrive gzip-compressed; heartbeats are answered internally and
/// everything else is delivered as [`WsEvent`]s through [`WsClient::recv`].
///
/// # Example
///
/// ```ignore
/// use huobi_sdk::websocket::{Subscription, WsClient, WsEvent};
/// use huobi_sdk::{Kline, KlinePeriod};
///
/// let client = WsClient::new();
/// client.connect().await?;
/// client.subscribe(Subscription::kline("btcusdt", KlinePeriod::OneMinute)).await?;
///
/// while let Some(event) = client.recv().await {
///     if let WsEvent::Data { .. } = event {
///         let kline: Kline = event.parse_tick()?;
///     }
/// }
/// ```
pub struct WsClient {
    shared: Arc<Shared>,
    state_rx: watch::Receiver<ConnectionState>,
    events_rx: Mutex<mpsc::Receiver<WsEvent>>,
}

impl std::fmt::Debug for WsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsClient")
            .field("url", &self.shared.url)
            .field("reconnect_config", &self.shared.reconnect_config)
            .finish_non_exhaustive()
    }
}

impl Default for WsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WsClient {
    /// Client for the default market feed
    pub fn new() -> Self {
        Self::for_environment(ApiEnvironment::Default)
    }

    pub fn for_environment(environment: ApiEnvironment) -> Self {
        Self::with_url(environment.ws_url(), ReconnectConfig::default())
    }

    pub fn with_url(url: impl Into<String>, reconnect_config: ReconnectConfig) -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (shutdown_tx, _) = watch::channel(false);
        let (generation_tx, _) = watch::channel(0);

        Self {
            shared: Arc::new(Shared {
                url: url.into(),
                state: RwLock::new(ConnectionState::Disconnected),
                state_tx,
                sink: Mutex::new(None),
                events_tx,
                subscriptions: SubscriptionManager::new(),
                reconnect_config,
                reconnect_attempts: AtomicU64::new(0),
                next_id: AtomicU64::new(1),
                last_ping: RwLock::new(None),
                shutdown_tx,
                generation_tx,
            }),
            state_rx,
            events_rx: Mutex::new(events_rx),
        }
    }

    pub fn url(&self) -> &str {
        &self.shared.url
    }

    pub async fn state(&self) -> ConnectionState {
        *self.shared.state.read().await
    }

    pub async fn is_connected(&self) -> bool {
        self.state().await == ConnectionState::Connected
    }

    /// Watch connection state changes
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// When the last server heartbeat arrived
    pub async fn last_ping_time(&self) -> Option<Instant> {
        *self.shared.last_ping.read().await
    }

    pub fn reconnect_attempts(&self) -> u64 {
        self.shared.reconnect_attempts.load(Ordering::Relaxed)
    }

    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.shared.subscriptions
    }

    /// Connect to the feed
    ///
    /// Connecting an already connected client is a no-op.
    pub async fn connect(&self) -> Result<()> {
        match self.state().await {
            ConnectionState::Connected => return Ok(()),
            ConnectionState::Closed => {
                return Err(Error::WebSocket("Client has been closed".to_string()))
            }
            _ => {}
        }

        self.shared.set_state(ConnectionState::Connecting).await;
        let generation = self.shared.next_generation();

        match self.shared.open(generation).await {
            Ok(stream) => {
                self.shared.reconnect_attempts.store(0, Ordering::Relaxed);
                self.shared.set_state(ConnectionState::Connected).await;
                info!(url = %self.shared.url, "market feed connected");
                tokio::spawn(Arc::clone(&self.shared).read_loop(stream, generation));
                Ok(())
            }
            Err(e) => {
                self.shared.set_state(ConnectionState::Disconnected).await;
                Err(e)
            }
        }
    }

    /// Subscribe to a topic
    ///
    /// The subscription stays pending until the exchange acknowledges it, which
    /// surfaces as [`WsEvent::Subscribed`].
    pub async fn subscribe(&self, subscription: Subscription) -> Result<()> {
        self.shared.subscribe(subscription).await
    }

    /// Unsubscribe from an active topic
    pub async fn unsubscribe(&self, subscription: Subscription) -> Result<()> {
        if !self.shared.subscriptions.mark_unsubscribing(&subscription).await {
            return Err(Error::InvalidParameter(format!(
                "{subscription} is not an active subscription"
            )));
        }
        let id = self.shared.next_request_id();
        let request = SubscriptionRequest::unsubscribe(subscription, id);
        self.shared.send_json(&request).await
    }

    pub async fn send_text(&self, text: &str) -> Result<()> {
        self.shared.send_text(text).await
    }

    /// Next event from the feed; `None` once the client is dropped
    pub async fn recv(&self) -> Option<WsEvent> {
        self.events_rx.lock().await.recv().await
    }

    pub async fn try_recv(&self) -> Option<WsEvent> {
        self.events_rx.lock().await.try_recv().ok()
    }

    /// Drop the current connection; subscriptions are kept for the next `connect`
    pub async fn disconnect(&self) -> Result<()> {
        self.shared.set_state(ConnectionState::Disconnected).await;
        self.shared.next_generation();
        self.shared.drop_sink().await;
        Ok(())
    }

    /// Close the client permanently
    pub async fn close(&self) -> Result<()> {
        self.shared.shutdown_tx.send_replace(true);
        self.shared.drop_sink().await;
        self.shared.subscriptions.clear().await;
        self.shared.set_state(ConnectionState::Closed).await;
        Ok(())
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        self.shared.shutdown_tx.send_replace(true);
    }
}

impl Shared {
    async fn set_state(&self, state: ConnectionState) {
        let mut current = self.state.write().await;
        if *current != state {
            *current = state;
            let _ = self.state_tx.send(state);
        }
    }

    fn next_request_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    fn next_generation(&self) -> u64 {
        let mut next = 0;
        self.generation_tx.send_modify(|generation| {
            *generation += 1;
            next = *generation;
        });
        next
    }

    /// Whether the reader task for `generation` should stop
    fn is_stale(&self, generation: u64) -> bool {
        *self.shutdown_tx.borrow()
            || *self.generation_tx.borrow() != generation
            || self.events_tx.is_closed()
    }

    /// Open a connection and install its sink, unless `generation` was
    /// superseded while connecting
    async fn open(&self, generation: u64) -> Result<WsStream> {
        let (ws_stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| match e {
                WsError::Io(io_err) => Error::WebSocket(format!("IO error: {io_err}")),
                WsError::Tls(tls_err) => Error::WebSocket(format!("TLS error: {tls_err}")),
                WsError::Url(u) => Error::WebSocket(format!("URL error: {u}")),
                WsError::Http(resp) => {
                    Error::WebSocket(format!("HTTP error: status {}", resp.status()))
                }
                _ => Error::WebSocket(format!("WebSocket error: {e}")),
            })?;

        let (sink, stream) = ws_stream.split();
        let mut guard = self.sink.lock().await;
        if self.is_stale(generation) {
            return Err(Error::WebSocket("connection superseded".to_string()));
        }
        *guard = Some(sink);
        Ok(stream)
    }

    async fn drop_sink(&self) {
        let mut guard = self.sink.lock().await;
        if let Some(ref mut sink) = *guard {
            let _ = sink.send(Message::Close(None)).await;
            let _ = sink.close().await;
        }
        *guard = None;
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        let mut guard = self.sink.lock().await;
        match *guard {
            Some(ref mut sink) => sink
                .send(Message::Text(text.to_string()))
                .await
                .map_err(|e| Error::WebSocket(format!("Failed to send: {e}"))),
            None => Err(Error::WebSocket("Not connected".to_string())),
        }
    }

    async fn send_json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        self.send_text(&serde_json::to_string(value)?).await
    }

    async fn subscribe(&self, subscription: Subscription) -> Result<()> {
        let id = self.next_request_id();
        let result = self.request_subscription(subscription, id.clone()).await;
        if result.is_err() {
            self.subscriptions.remove_by_id(&id).await;
        }
        result
    }

    /// Track the topic as pending, then send the request. The ack can only
    /// arrive after the entry exists.
    async fn request_subscription(&self, subscription: Subscription, id: String) -> Result<()> {
        self.subscriptions.add_pending(subscription.clone(), id.clone()).await;
        self.send_json(&SubscriptionRequest::subscribe(subscription, id)).await
    }

    async fn emit(&self, event: WsEvent) {
        if self.events_tx.send(event).await.is_err() {
            debug!("market feed event dropped, receiver gone");
        }
    }

    async fn read_loop(self: Arc<Self>, mut stream: WsStream, generation: u64) {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut generation_rx = self.generation_tx.subscribe();
        let idle_timeout = self.reconnect_config.idle_timeout;

        loop {
            if self.is_stale(generation) {
                debug!(generation, "market feed reader stopped");
                break;
            }

            let message = tokio::select! {
                _ = shutdown_rx.changed() => continue,
                _ = generation_rx.changed() => continue,
                _ = self.events_tx.closed() => continue,
                message = tokio::time::timeout(idle_timeout, stream.next()) => message,
            };

            let frame = match message {
                Ok(Some(Ok(Message::Binary(data)))) => decode_frame(&data),
                Ok(Some(Ok(Message::Text(text)))) => Ok(text),
                Ok(Some(Ok(Message::Close(_)))) | Ok(None) => {
                    match self.recover("closed by server", generation).await {
                        Some(next) => {
                            stream = next;
                            continue;
                        }
                        None => break,
                    }
                }
                Ok(Some(Ok(_))) => continue,
                Ok(Some(Err(e))) => match self.recover(&e.to_string(), generation).await {
                    Some(next) => {
                        stream = next;
                        continue;
                    }
                    None => break,
                },
                Err(_) => match self.recover("heartbeat timeout", generation).await {
                    Some(next) => {
                        stream = next;
                        continue;
                    }
                    None => break,
                },
            };

            match frame.and_then(|text| ServerFrame::parse(&text)) {
                Ok(frame) => self.handle_frame(frame).await,
                Err(e) => warn!(error = %e, "unreadable market feed frame"),
            }
        }
    }

    async fn handle_frame(&self, frame: ServerFrame) {
        match frame {
            ServerFrame::Ping(ping) => {
                *self.last_ping.write().await = Some(Instant::now());
                if let Err(e) = self.send_json(&serde_json::json!({ "pong": ping })).await {
                    warn!(error = %e, "failed to answer heartbeat");
                }
            }
            ServerFrame::Subscribed { topic, .. } => match Subscription::from_topic(&topic) {
                Some(sub) => {
                    self.subscriptions.mark_active(&sub).await;
                    self.emit(WsEvent::Subscribed(sub)).await;
                }
                None => warn!(%topic, "acknowledged unknown topic"),
            },
            ServerFrame::Unsubscribed { topic, .. } => {
                if let Some(sub) = Subscription::from_topic(&topic) {
                    self.subscriptions.remove(&sub).await;
                    self.emit(WsEvent::Unsubscribed(sub)).await;
                }
            }
            ServerFrame::Error { id, code, message } => {
                warn!(%code, %message, "market feed error");
                if let Some(id) = id {
                    self.subscriptions.remove_by_id(&id).await;
                }
                self.emit(WsEvent::Error { code, message }).await;
            }
            ServerFrame::Data { channel, ts, tick } => {
                let ts = DateTime::<Utc>::from_timestamp_millis(ts).unwrap_or_default();
                self.emit(WsEvent::Data { channel, ts, tick }).await;
            }
        }
    }

    /// Reconnect after the connection dropped
    ///
    /// Returns the new stream once every remembered topic has been requested
    /// again, or `None` when the client should stop reading.
    async fn recover(&self, reason: &str, generation: u64) -> Option<WsStream> {
        {
            let mut sink = self.sink.lock().await;
            if self.is_stale(generation) {
                return None;
            }
            *sink = None;
        }

        warn!(reason, "market feed disconnected");
        self.emit(WsEvent::Closed).await;
        if *self.state.read().await == ConnectionState::Disconnected {
            return None;
        }

        loop {
            let attempt = self.reconnect_attempts.fetch_add(1, Ordering::Relaxed) as u32;
            if !self.reconnect_config.should_attempt(attempt) {
                self.set_state(ConnectionState::Disconnected).await;
                return None;
            }

            self.set_state(ConnectionState::Reconnecting).await;
            tokio::time::sleep(self.reconnect_config.delay_for_attempt(attempt)).await;
            if self.is_stale(generation) {
                return None;
            }

            match self.open(generation).await {
                Ok(stream) => {
                    self.reconnect_attempts.store(0, Ordering::Relaxed);
                    self.set_state(ConnectionState::Connected).await;
                    info!(attempt, "market feed reconnected");
                    self.resubscribe().await;
                    return Some(stream);
                }
                Err(_) if self.is_stale(generation) => return None,
                Err(e) => warn!(attempt, error = %e, "reconnect failed"),
            }
        }
    }

    /// Topics whose request fails stay pending for the next reconnect
    async fn resubscribe(&self) {
        for sub in self.subscriptions.resubscribe_set().await {
            let id = self.next_request_id();
            if let Err(e) = self.request_subscription(sub.clone(), id).await {
                warn!(topic = %sub, error = %e, "resubscribe failed");
            }
        }
    }
}
