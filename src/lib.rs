//! Huobi Rust SDK
//!
//! A Rust SDK for the Huobi spot API, including:
//! - Market endpoints (public tickers, klines, order books, trades and reference data)
//! - Exchange endpoints (signed account, order, wallet and margin calls)
//! - WebSocket subscriptions (real-time market data streams)

pub mod auth;
pub mod client;
pub mod common;
pub mod error;
pub mod exchange;
pub mod market;
pub mod types;
pub mod websocket;

pub use auth::Credentials;
pub use client::{
    ApiEnvironment, Body, Client, ClientOptions, OrderEvent, Query, AWS_REST_URL,
    DEFAULT_REST_URL,
};
pub use common::{aggregate_balances, order_type, symbol_name, AssetBalance, OrderKind};
pub use error::{Error, Result};
pub use types::*;
