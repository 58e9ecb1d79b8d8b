//! Topics, request framing and subscription bookkeeping for the market feed
//!
//! Huobi topics are plain strings such as `market.btcusdt.kline.1min`. A
//! [`Subscription`] is the typed form of a topic and converts both ways.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use tokio::sync::RwLock;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};
use crate::types::KlinePeriod;

// ============================================================================
// Subscription Types
// ============================================================================

/// Market data topic
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subscription {
    /// Candlesticks, `market.{symbol}.kline.{period}`
    Kline { symbol: String, period: KlinePeriod },
    /// Aggregated order book, `market.{symbol}.depth.step{n}`
    Depth { symbol: String, step: u8 },
    /// Trade stream, `market.{symbol}.trade.detail`
    TradeDetail { symbol: String },
    /// Rolling 24h statistics, `market.{symbol}.detail`
    Detail { symbol: String },
    /// Best bid/offer, `market.{symbol}.bbo`
    Bbo { symbol: String },
}

/// Highest merge step the depth topic accepts
pub const MAX_DEPTH_STEP: u8 = 5;

impl Subscription {
    pub fn kline(symbol: impl Into<String>, period: KlinePeriod) -> Self {
        Subscription::Kline {
            symbol: normalize(symbol),
            period,
        }
    }

    /// Order book merged to `step` (0 = no merging, up to [`MAX_DEPTH_STEP`])
    pub fn depth(symbol: impl Into<String>, step: u8) -> Result<Self> {
        if step > MAX_DEPTH_STEP {
            return Err(Error::InvalidParameter(format!(
                "depth step must be between 0 and {MAX_DEPTH_STEP}, got {step}"
            )));
        }
        Ok(Subscription::Depth {
            symbol: normalize(symbol),
            step,
        })
    }

    pub fn trade_detail(symbol: impl Into<String>) -> Self {
        Subscription::TradeDetail {
            symbol: normalize(symbol),
        }
    }

    pub fn detail(symbol: impl Into<String>) -> Self {
        Subscription::Detail {
            symbol: normalize(symbol),
        }
    }

    pub fn bbo(symbol: impl Into<String>) -> Self {
        Subscription::Bbo {
            symbol: normalize(symbol),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Subscription::Kline { symbol, .. }
            | Subscription::Depth { symbol, .. }
            | Subscription::TradeDetail { symbol }
            | Subscription::Detail { symbol }
            | Subscription::Bbo { symbol } => symbol,
        }
    }

    /// Topic string sent to the exchange
    pub fn topic(&self) -> String {
        match self {
            Subscription::Kline { symbol, period } => format!("market.{symbol}.kline.{period}"),
            Subscription::Depth { symbol, step } => format!("market.{symbol}.depth.step{step}"),
            Subscription::TradeDetail { symbol } => format!("market.{symbol}.trade.detail"),
            Subscription::Detail { symbol } => format!("market.{symbol}.detail"),
            Subscription::Bbo { symbol } => format!("market.{symbol}.bbo"),
        }
    }

    /// Parse a topic string back into a subscription
    pub fn from_topic(topic: &str) -> Option<Self> {
        let rest = topic.strip_prefix("market.")?;
        let (symbol, channel) = rest.split_once('.')?;
        if symbol.is_empty() {
            return None;
        }

        match channel.split('.').collect::<Vec<_>>().as_slice() {
            ["kline", period] => {
                let period = serde_json::Value::String(period.to_string());
                Some(Subscription::kline(symbol, serde_json::from_value(period).ok()?))
            }
            ["depth", step] => {
                let step = step.strip_prefix("step")?.parse().ok()?;
                Subscription::depth(symbol, step).ok()
            }
            ["trade", "detail"] => Some(Subscription::trade_detail(symbol)),
            ["detail"] => Some(Subscription::detail(symbol)),
            ["bbo"] => Some(Subscription::bbo(symbol)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.topic())
    }
}

fn normalize(symbol: impl Into<String>) -> String {
    symbol.into().to_lowercase()
}

// ============================================================================
// Client Requests
// ============================================================================

/// Method for subscription messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionMethod {
    Subscribe,
    Unsubscribe,
}

impl SubscriptionMethod {
    fn key(&self) -> &'static str {
        match self {
            SubscriptionMethod::Subscribe => "sub",
            SubscriptionMethod::Unsubscribe => "unsub",
        }
    }
}

/// `{"sub": topic, "id": id}` or `{"unsub": topic, "id": id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub method: SubscriptionMethod,
    pub subscription: Subscription,
    pub id: String,
}

impl SubscriptionRequest {
    pub fn subscribe(subscription: Subscription, id: impl Into<String>) -> Self {
        Self {
            method: SubscriptionMethod::Subscribe,
            subscription,
            id: id.into(),
        }
    }

    pub fn unsubscribe(subscription: Subscription, id: impl Into<String>) -> Self {
        Self {
            method: SubscriptionMethod::Unsubscribe,
            subscription,
            id: id.into(),
        }
    }
}

impl Serialize for SubscriptionRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.method.key(), &self.subscription.topic())?;
        map.serialize_entry("id", &self.id)?;
        map.end()
    }
}

// ============================================================================
// Server Frames
// ============================================================================

/// Gunzip a binary frame from the market feed
pub fn decode_frame(data: &[u8]) -> Result<String> {
    let mut text = String::new();
    GzDecoder::new(data)
        .read_to_string(&mut text)
        .map_err(|e| Error::WebSocket(format!("failed to decompress frame: {e}")))?;
    Ok(text)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawFrame {
    ping: Option<i64>,
    ch: Option<String>,
    ts: Option<i64>,
    tick: Option<serde_json::Value>,
    status: Option<String>,
    subbed: Option<String>,
    unsubbed: Option<String>,
    id: Option<serde_json::Value>,
    err_code: Option<String>,
    err_msg: Option<String>,
}

/// A decoded frame from the market feed
#[derive(Debug, Clone, PartialEq)]
pub enum ServerFrame {
    /// Heartbeat that must be answered with the same value
    Ping(i64),
    Subscribed {
        id: Option<String>,
        topic: String,
    },
    Unsubscribed {
        id: Option<String>,
        topic: String,
    },
    Error {
        id: Option<String>,
        code: String,
        message: String,
    },
    Data {
        channel: String,
        ts: i64,
        tick: serde_json::Value,
    },
}

impl ServerFrame {
    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawFrame = serde_json::from_str(text)?;
        let id = raw.id.map(|id| match id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

        if let Some(ping) = raw.ping {
            return Ok(ServerFrame::Ping(ping));
        }
        if raw.status.as_deref() == Some("error") {
            return Ok(ServerFrame::Error {
                id,
                code: raw.err_code.unwrap_or_default(),
                message: raw.err_msg.unwrap_or_default(),
            });
        }
        if let Some(topic) = raw.subbed {
            return Ok(ServerFrame::Subscribed { id, topic });
        }
        if let Some(topic) = raw.unsubbed {
            return Ok(ServerFrame::Unsubscribed { id, topic });
        }
        match (raw.ch, raw.tick) {
            (Some(channel), Some(tick)) => Ok(ServerFrame::Data {
                channel,
                ts: raw.ts.unwrap_or_default(),
                tick,
            }),
            _ => Err(Error::InvalidResponse(format!(
                "unrecognized market feed frame: {text}"
            ))),
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// Event delivered to the consumer of a [`WsClient`](super::WsClient)
#[derive(Debug, Clone, PartialEq)]
pub enum WsEvent {
    /// Market data pushed on a subscribed topic
    Data {
        channel: String,
        ts: DateTime<Utc>,
        tick: serde_json::Value,
    },
    Subscribed(Subscription),
    Unsubscribed(Subscription),
    /// Error reply from the exchange, usually a rejected subscription
    Error { code: String, message: String },
    /// Connection dropped
    Closed,
}

impl WsEvent {
    /// The subscription a data event belongs to
    pub fn subscription(&self) -> Option<Subscription> {
        match self {
            WsEvent::Data { channel, .. } => Subscription::from_topic(channel),
            WsEvent::Subscribed(sub) | WsEvent::Unsubscribed(sub) => Some(sub.clone()),
            _ => None,
        }
    }

    /// Deserialize the tick of a data event, e.g. into [`Kline`](crate::Kline)
    pub fn parse_tick<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            WsEvent::Data { tick, .. } => Ok(T::deserialize(tick)?),
            other => Err(Error::InvalidResponse(format!(
                "event carries no tick: {other:?}"
            ))),
        }
    }
}

// ============================================================================
// Subscription Manager
// ============================================================================

/// Status of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    /// Request sent, waiting for `subbed`
    Pending,
    Active,
    /// Unsubscribe sent, waiting for `unsubbed`
    Unsubscribing,
}

/// Tracks the topics of one connection and their request ids
#[derive(Debug, Clone, Default)]
pub struct SubscriptionManager {
    subscriptions: Arc<RwLock<HashMap<Subscription, (SubscriptionStatus, String)>>>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a subscribe request as pending under `id`
    pub async fn add_pending(&self, subscription: Subscription, id: impl Into<String>) {
        self.subscriptions
            .write()
            .await
            .insert(subscription, (SubscriptionStatus::Pending, id.into()));
    }

    pub async fn mark_active(&self, subscription: &Subscription) -> bool {
        self.transition(subscription, SubscriptionStatus::Pending, SubscriptionStatus::Active)
            .await
    }

    pub async fn mark_unsubscribing(&self, subscription: &Subscription) -> bool {
        self.transition(
            subscription,
            SubscriptionStatus::Active,
            SubscriptionStatus::Unsubscribing,
        )
        .await
    }

    async fn transition(
        &self,
        subscription: &Subscription,
        from: SubscriptionStatus,
        to: SubscriptionStatus,
    ) -> bool {
        let mut subs = self.subscriptions.write().await;
        match subs.get_mut(subscription) {
            Some((status, _)) if *status == from => {
                *status = to;
                true
            }
            _ => false,
        }
    }

    pub async fn remove(&self, subscription: &Subscription) -> bool {
        self.subscriptions.write().await.remove(subscription).is_some()
    }

    /// Drop whichever subscription was requested under `id`
    pub async fn remove_by_id(&self, id: &str) -> Option<Subscription> {
        let mut subs = self.subscriptions.write().await;
        let found = subs
            .iter()
            .find(|(_, (_, request_id))| request_id == id)
            .map(|(sub, _)| sub.clone())?;
        subs.remove(&found);
        Some(found)
    }

    pub async fn status(&self, subscription: &Subscription) -> Option<SubscriptionStatus> {
        self.subscriptions
            .read()
            .await
            .get(subscription)
            .map(|(status, _)| *status)
    }

    pub async fn is_active(&self, subscription: &Subscription) -> bool {
        self.status(subscription).await == Some(SubscriptionStatus::Active)
    }

    pub async fn active_subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions
            .read()
            .await
            .iter()
            .filter(|(_, (status, _))| *status == SubscriptionStatus::Active)
            .map(|(sub, _)| sub.clone())
            .collect()
    }

    /// Topics to request again on a fresh connection: active and pending ones
    pub async fn resubscribe_set(&self) -> Vec<Subscription> {
        self.subscriptions
            .read()
            .await
            .iter()
            .filter(|(_, (status, _))| *status != SubscriptionStatus::Unsubscribing)
            .map(|(sub, _)| sub.clone())
            .collect()
    }

    pub async fn total_count(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    pub async fn clear(&self) {
        self.subscriptions.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kline;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_topics() {
        assert_eq!(
            Subscription::kline("BTCUSDT", KlinePeriod::OneMinute).topic(),
            "market.btcusdt.kline.1min"
        );
        assert_eq!(
            Subscription::depth("ethusdt", 2).unwrap().topic(),
            "market.ethusdt.depth.step2"
        );
        assert_eq!(
            Subscription::trade_detail("htusdt").topic(),
            "market.htusdt.trade.detail"
        );
        assert_eq!(Subscription::detail("htusdt").topic(), "market.htusdt.detail");
        assert_eq!(Subscription::bbo("htusdt").to_string(), "market.htusdt.bbo");
    }

    #[test]
    fn test_depth_step_range() {
        assert!(Subscription::depth("btcusdt", MAX_DEPTH_STEP).is_ok());
        assert!(matches!(
            Subscription::depth("btcusdt", 6),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_topic() {
        for sub in [
            Subscription::kline("btcusdt", KlinePeriod::OneMonth),
            Subscription::depth("btcusdt", 0).unwrap(),
            Subscription::trade_detail("btcusdt"),
            Subscription::detail("btcusdt"),
            Subscription::bbo("btcusdt"),
        ] {
            assert_eq!(Subscription::from_topic(&sub.topic()), Some(sub));
        }
        assert_eq!(Subscription::from_topic("market.btcusdt.kline.7min"), None);
        assert_eq!(Subscription::from_topic("market.btcusdt.mbp.150"), None);
        assert_eq!(Subscription::from_topic("accounts.update"), None);
    }

    #[test]
    fn test_request_serialization() {
        let sub = SubscriptionRequest::subscribe(Subscription::detail("btcusdt"), "7");
        assert_eq!(
            serde_json::to_value(&sub).unwrap(),
            serde_json::json!({"sub": "market.btcusdt.detail", "id": "7"})
        );

        let unsub = SubscriptionRequest::unsubscribe(Subscription::bbo("btcusdt"), "8");
        assert_eq!(
            serde_json::to_value(&unsub).unwrap(),
            serde_json::json!({"unsub": "market.btcusdt.bbo", "id": "8"})
        );
    }

    #[test]
    fn test_decode_frame() {
        let frame = gzip(r#"{"ping":1492420473027}"#);
        let text = decode_frame(&frame).unwrap();
        assert_eq!(ServerFrame::parse(&text).unwrap(), ServerFrame::Ping(1492420473027));

        assert!(matches!(decode_frame(b"not gzip"), Err(Error::WebSocket(_))));
    }

    #[test]
    fn test_parse_acks() {
        let frame = ServerFrame::parse(
            r#"{"id":"1","status":"ok","subbed":"market.btcusdt.kline.1min","ts":1489474081631}"#,
        )
        .unwrap();
        assert_eq!(
            frame,
            ServerFrame::Subscribed {
                id: Some("1".to_string()),
                topic: "market.btcusdt.kline.1min".to_string()
            }
        );

        let frame = ServerFrame::parse(
            r#"{"id":2,"status":"ok","unsubbed":"market.btcusdt.bbo","ts":1494326028889}"#,
        )
        .unwrap();
        assert!(matches!(frame, ServerFrame::Unsubscribed { id: Some(ref id), .. } if id == "2"));

        let frame = ServerFrame::parse(
            r#"{"id":"3","status":"error","err-code":"bad-request",
                "err-msg":"invalid topic market.invalidsymbol.kline.1min","ts":1494301904959}"#,
        )
        .unwrap();
        assert!(matches!(frame, ServerFrame::Error { ref code, .. } if code == "bad-request"));
    }

    #[test]
    fn test_parse_data_and_tick() {
        let text = r#"{"ch":"market.btcusdt.kline.1min","ts":1489474082831,
            "tick":{"id":1489464480,"amount":0.0,"count":0,"open":7962.62,
                    "close":7962.62,"low":7962.62,"high":7962.62,"vol":0.0}}"#;
        let ServerFrame::Data { channel, ts, tick } = ServerFrame::parse(text).unwrap() else {
            panic!("expected data frame");
        };
        assert_eq!(ts, 1489474082831);

        let event = WsEvent::Data {
            channel,
            ts: DateTime::from_timestamp_millis(ts).unwrap(),
            tick,
        };
        assert_eq!(
            event.subscription(),
            Some(Subscription::kline("btcusdt", KlinePeriod::OneMinute))
        );
        let kline: Kline = event.parse_tick().unwrap();
        assert_eq!(kline.open, dec!(7962.62));
        assert_eq!(kline.open_time.timestamp(), 1489464480);

        assert!(WsEvent::Closed.parse_tick::<Kline>().is_err());
    }

    #[test]
    fn test_parse_unknown_frame() {
        assert!(matches!(
            ServerFrame::parse(r#"{"status":"ok"}"#),
            Err(Error::InvalidResponse(_))
        ));
        assert!(matches!(ServerFrame::parse("nope"), Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_subscription_lifecycle() {
        let manager = SubscriptionManager::new();
        let sub = Subscription::trade_detail("btcusdt");

        manager.add_pending(sub.clone(), "1").await;
        assert_eq!(manager.status(&sub).await, Some(SubscriptionStatus::Pending));
        assert!(!manager.mark_unsubscribing(&sub).await);

        assert!(manager.mark_active(&sub).await);
        assert!(manager.is_active(&sub).await);
        assert!(!manager.mark_active(&sub).await);

        assert!(manager.mark_unsubscribing(&sub).await);
        assert!(manager.resubscribe_set().await.is_empty());
        assert!(manager.remove(&sub).await);
        assert_eq!(manager.total_count().await, 0);
    }

    #[tokio::test]
    async fn test_resubscribe_set_and_remove_by_id() {
        let manager = SubscriptionManager::new();
        let active = Subscription::detail("btcusdt");
        let pending = Subscription::bbo("ethusdt");

        manager.add_pending(active.clone(), "1").await;
        manager.mark_active(&active).await;
        manager.add_pending(pending.clone(), "2").await;

        let mut set = manager.resubscribe_set().await;
        set.sort_by_key(|s| s.topic());
        assert_eq!(set, vec![active.clone(), pending.clone()]);
        assert_eq!(manager.active_subscriptions().await, vec![active]);

        assert_eq!(manager.remove_by_id("2").await, Some(pending));
        assert_eq!(manager.remove_by_id("2").await, None);

        manager.clear().await;
        assert_eq!(manager.total_count().await, 0);
    }
}
