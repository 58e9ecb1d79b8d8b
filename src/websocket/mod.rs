//! WebSocket client for Huobi market data
//!
//! Connects to the public market feed, answers the server's heartbeats,
//! tracks subscriptions and re-subscribes after a reconnect.
//!
//! # Example
//!
//! ```ignore
//! use huobi_sdk::websocket::{Subscription, WsClient};
//!
//! let client = WsClient::new();
//! client.connect().await?;
//! client.subscribe(Subscription::trade_detail("btcusdt")).await?;
//!
//! while let Some(event) = client.recv().await {
//!     println!("{event:?}");
//! }
//! ```

mod client;
mod subscription;

pub use client::{ConnectionState, ReconnectConfig, WsClient};
pub use subscription::{
    decode_frame, ServerFrame, Subscription, SubscriptionManager, SubscriptionMethod,
    SubscriptionRequest, SubscriptionStatus, WsEvent, MAX_DEPTH_STEP,
};
