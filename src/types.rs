//! Request and response types for the Huobi API
//!
//! This module contains the exchange enums (with their wire strings), the two
//! response envelopes used by the REST API, and the domain objects returned by
//! each endpoint group.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Wire Enums
// ============================================================================

/// Declares a fieldless enum whose serde representation and `Display` output
/// are the exchange's wire strings.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// The exchange's string for this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Candlestick period
    pub enum KlinePeriod {
        OneMinute => "1min",
        FiveMinutes => "5min",
        FifteenMinutes => "15min",
        ThirtyMinutes => "30min",
        OneHour => "60min",
        FourHours => "4hour",
        OneDay => "1day",
        OneWeek => "1week",
        OneMonth => "1mon",
        OneYear => "1year",
    }
}

wire_enum! {
    /// Account type
    pub enum AccountType {
        Spot => "spot",
        Margin => "margin",
        Otc => "otc",
        Point => "point",
        SuperMargin => "super-margin",
        Investment => "investment",
        Borrow => "borrow",
        Minepool => "minepool",
        Etf => "etf",
        CryptoLoans => "crypto-loans",
        GridTrading => "grid-trading",
        DepositEarning => "deposit-earning",
        OtcOptions => "otc-options",
    }
}

wire_enum! {
    /// Account state
    pub enum AccountState {
        Working => "working",
        Lock => "lock",
    }
}

wire_enum! {
    /// Kind of a balance row
    pub enum BalanceType {
        /// Available for trading
        Trade => "trade",
        /// Held by open orders or withdrawals
        Frozen => "frozen",
        Loan => "loan",
        Interest => "interest",
        TransferOutAvailable => "transfer-out-available",
        LoanAvailable => "loan-available",
    }
}

wire_enum! {
    /// Order type (side and execution style combined)
    pub enum OrderType {
        MarketBuy => "buy-market",
        MarketSell => "sell-market",
        LimitBuy => "buy-limit",
        LimitSell => "sell-limit",
        IocBuy => "buy-ioc",
        IocSell => "sell-ioc",
        LimitMakerBuy => "buy-limit-maker",
        LimitMakerSell => "sell-limit-maker",
        StopLimitBuy => "buy-stop-limit",
        StopLimitSell => "sell-stop-limit",
        FokBuy => "buy-limit-fok",
        FokSell => "sell-limit-fok",
        StopLimitFokBuy => "buy-stop-limit-fok",
        StopLimitFokSell => "sell-stop-limit-fok",
    }
}

impl OrderType {
    /// Side implied by the order type
    pub fn side(&self) -> OrderSide {
        if self.as_str().starts_with("buy") {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }

    /// Whether this is a stop-limit variant, which cannot be placed through `place_order`
    pub fn is_stop_limit(&self) -> bool {
        matches!(self, OrderType::StopLimitBuy | OrderType::StopLimitSell)
    }
}

wire_enum! {
    /// Order state
    pub enum OrderState {
        /// Stop order created but not triggered
        Created => "created",
        PreSubmitted => "pre-submitted",
        Submitting => "submitting",
        Submitted => "submitted",
        PartiallyFilled => "partial-filled",
        PartiallyCanceled => "partial-canceled",
        Filled => "filled",
        Canceled => "canceled",
        Canceling => "canceling",
    }
}

wire_enum! {
    /// Order side
    pub enum OrderSide {
        Buy => "buy",
        Sell => "sell",
    }
}

wire_enum! {
    /// Liquidity role of a fill
    pub enum OrderRole {
        Maker => "maker",
        Taker => "taker",
    }
}

wire_enum! {
    /// Account the order is placed from
    pub enum SourceType {
        Spot => "spot-api",
        Margin => "margin-api",
        SuperMargin => "super-margin-api",
        C2CMargin => "c2c-margin-api",
    }
}

wire_enum! {
    /// Comparison used by stop orders
    pub enum StopOperator {
        GreaterThanOrEqual => "gte",
        LesserThanOrEqual => "lte",
    }
}

wire_enum! {
    /// Paging direction relative to a `from` id
    pub enum FilterDirection {
        Previous => "prev",
        Next => "next",
    }
}

wire_enum! {
    /// Result ordering
    pub enum SortingType {
        Ascending => "asc",
        Descending => "desc",
    }
}

wire_enum! {
    /// Transfer direction between parent and sub user
    pub enum TransferType {
        FromSubToParent => "master-transfer-in",
        FromParentToSub => "master-transfer-out",
        PointFromSubToParent => "master-point-transfer-in",
        PointFromParentToSub => "master-point-transfer-out",
    }
}

wire_enum! {
    /// Deposit/withdraw history filter
    pub enum WithdrawDepositType {
        Deposit => "deposit",
        Withdraw => "withdraw",
    }
}

wire_enum! {
    /// Margin loan order state
    pub enum LoanState {
        Created => "created",
        Accrual => "accrual",
        Cleared => "cleared",
        Invalid => "invalid",
    }
}

wire_enum! {
    /// Trading state of a symbol
    pub enum SymbolState {
        Online => "online",
        Offline => "offline",
        Suspend => "suspend",
        PreOnline => "pre-online",
    }
}

wire_enum! {
    /// Deposit/withdraw availability of a chain
    pub enum ChainStatus {
        Allowed => "allowed",
        Prohibited => "prohibited",
    }
}

wire_enum! {
    /// Listing status of a currency
    pub enum InstrumentStatus {
        Normal => "normal",
        Delisted => "delisted",
    }
}

wire_enum! {
    /// How a chain's withdraw fee is computed
    pub enum WithdrawFeeType {
        Fixed => "fixed",
        Circulated => "circulated",
        Ratio => "ratio",
    }
}

/// Account ledger transaction type
///
/// Types this SDK does not know yet are kept verbatim in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Trade,
    Etf,
    TransactionFee,
    FeeDeduction,
    Transfer,
    Credit,
    Liquidation,
    Interest,
    Deposit,
    Withdraw,
    WithdrawFee,
    Exchange,
    Other,
    Rebate,
    Unrecognized(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Trade => "trade",
            TransactionType::Etf => "etf",
            TransactionType::TransactionFee => "transact-fee",
            TransactionType::FeeDeduction => "fee-deduction",
            TransactionType::Transfer => "transfer",
            TransactionType::Credit => "credit",
            TransactionType::Liquidation => "liquidation",
            TransactionType::Interest => "interest",
            TransactionType::Deposit => "deposit",
            TransactionType::Withdraw => "withdraw",
            TransactionType::WithdrawFee => "withdraw-fee",
            TransactionType::Exchange => "exchange",
            TransactionType::Other => "other-types",
            TransactionType::Rebate => "rebate",
            TransactionType::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for TransactionType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "trade" => TransactionType::Trade,
            "etf" => TransactionType::Etf,
            "transact-fee" => TransactionType::TransactionFee,
            "fee-deduction" => TransactionType::FeeDeduction,
            "transfer" => TransactionType::Transfer,
            "credit" => TransactionType::Credit,
            "liquidation" => TransactionType::Liquidation,
            "interest" => TransactionType::Interest,
            "deposit" => TransactionType::Deposit,
            "withdraw" => TransactionType::Withdraw,
            "withdraw-fee" => TransactionType::WithdrawFee,
            "exchange" => TransactionType::Exchange,
            "other-types" => TransactionType::Other,
            "rebate" => TransactionType::Rebate,
            _ => TransactionType::Unrecognized(raw),
        }
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a deposit or withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WithdrawDepositState {
    // deposit states
    Unknown,
    Confirming,
    Confirmed,
    Safe,
    Orphan,
    // withdraw states
    Verifying,
    Failed,
    Submitted,
    Reexamine,
    Canceled,
    Pass,
    Reject,
    PreTransfer,
    WalletTransfer,
    WalletReject,
    ConfirmError,
    Repealed,
    /// State string not covered above
    #[serde(other)]
    Other,
}

/// Overall market state reported by `v2/market-status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MarketState {
    Normal,
    Halted,
    CancelOnly,
}

impl TryFrom<u8> for MarketState {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(MarketState::Normal),
            2 => Ok(MarketState::Halted),
            3 => Ok(MarketState::CancelOnly),
            other => Err(format!("unknown market status {other}")),
        }
    }
}

impl From<MarketState> for u8 {
    fn from(value: MarketState) -> Self {
        match value {
            MarketState::Normal => 1,
            MarketState::Halted => 2,
            MarketState::CancelOnly => 3,
        }
    }
}

/// Why the market was halted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HaltReason {
    Emergency,
    Scheduled,
}

impl TryFrom<u8> for HaltReason {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            2 => Ok(HaltReason::Emergency),
            3 => Ok(HaltReason::Scheduled),
            other => Err(format!("unknown halt reason {other}")),
        }
    }
}

impl From<HaltReason> for u8 {
    fn from(value: HaltReason) -> Self {
        match value {
            HaltReason::Emergency => 2,
            HaltReason::Scheduled => 3,
        }
    }
}

// ============================================================================
// Serde Helpers
// ============================================================================

/// Integer ids that the exchange sometimes sends as JSON strings
pub(crate) mod flexible_id {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*id)
    }

    pub mod option {
        use super::Raw;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S>(id: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            id.serialize(serializer)
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<Raw>::deserialize(deserializer)? {
                None => Ok(None),
                Some(Raw::Number(n)) => Ok(Some(n)),
                Some(Raw::Text(s)) if s.is_empty() => Ok(None),
                Some(Raw::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
            }
        }
    }
}

/// Id returned as the whole payload of create/cancel endpoints, as a number or a string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResponseId(pub i64);

impl<'de> Deserialize<'de> for ResponseId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        flexible_id::deserialize(deserializer).map(ResponseId)
    }
}

fn ids_as_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    let raw = Vec::<Raw>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|id| match id {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        })
        .collect())
}

// ============================================================================
// Response Envelopes
// ============================================================================

/// Envelope used by v1 and unversioned market endpoints
///
/// Market snapshots carry their payload in `tick`, everything else in `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct V1Response<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "err-code", default)]
    pub err_code: Option<String>,
    #[serde(rename = "err-msg", default)]
    pub err_msg: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub ts: Option<DateTime<Utc>>,
    #[serde(alias = "tick", default = "Option::default")]
    pub data: Option<T>,
    #[serde(rename = "next-time", default)]
    pub next_time: Option<i64>,
}

impl<T> V1Response<T> {
    /// Whether the exchange reported an error
    pub fn is_error(&self) -> bool {
        self.err_code.is_some() || self.status.as_deref() == Some("error")
    }

    /// Unwrap the payload together with the server timestamp
    pub fn into_parts(self) -> Result<(T, Option<DateTime<Utc>>)> {
        if self.is_error() {
            return Err(Error::api(
                self.err_code.unwrap_or_else(|| "error".to_string()),
                self.err_msg.unwrap_or_default(),
            ));
        }
        let data = self
            .data
            .ok_or_else(|| Error::InvalidResponse("response has no data".to_string()))?;
        Ok((data, self.ts))
    }

    /// Unwrap the payload
    pub fn into_data(self) -> Result<T> {
        self.into_parts().map(|(data, _)| data)
    }
}

/// Envelope used by v2 endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct V2Response<T> {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(rename = "nextId", default)]
    pub next_id: Option<i64>,
}

impl<T> V2Response<T> {
    /// Unwrap the payload, treating any code other than 200 as an error
    pub fn into_data(self) -> Result<T> {
        if self.code != 200 {
            return Err(Error::api(
                self.code.to_string(),
                self.message.unwrap_or_default(),
            ));
        }
        self.data
            .ok_or_else(|| Error::InvalidResponse("response has no data".to_string()))
    }
}

// ============================================================================
// Market Data Types
// ============================================================================

/// One price level of an order book, sent by the exchange as `[price, quantity]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    pub price: Decimal,
    pub quantity: Decimal,
}

/// 24h ticker for one symbol from `market/tickers`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTick {
    pub symbol: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Volume in base currency
    pub amount: Decimal,
    /// Volume in quote currency
    #[serde(rename = "vol")]
    pub volume: Decimal,
    pub count: i64,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub bid_size: Option<Decimal>,
    #[serde(default)]
    pub ask: Option<Decimal>,
    #[serde(default)]
    pub ask_size: Option<Decimal>,
}

/// All tickers plus the server time they were taken at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolTicks {
    pub ticks: Vec<SymbolTick>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Ticker with best bid/ask from `market/detail/merged`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedTick {
    pub id: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub amount: Decimal,
    #[serde(rename = "vol")]
    pub volume: Decimal,
    pub count: i64,
    #[serde(default)]
    pub version: Option<i64>,
    pub bid: OrderBookEntry,
    pub ask: OrderBookEntry,
    /// Server time of the snapshot, taken from the envelope
    #[serde(skip_deserializing)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Candlestick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kline {
    /// Open time of the candle; the exchange sends it as the `id` in epoch seconds
    #[serde(rename = "id", with = "chrono::serde::ts_seconds")]
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub amount: Decimal,
    #[serde(rename = "vol")]
    pub volume: Decimal,
    pub count: i64,
}

/// Order book snapshot from `market/depth`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub version: Option<i64>,
    pub bids: Vec<OrderBookEntry>,
    pub asks: Vec<OrderBookEntry>,
    #[serde(skip_deserializing)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<&OrderBookEntry> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&OrderBookEntry> {
        self.asks.first()
    }
}

/// A batch of public trades sharing one match id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolTrade {
    pub id: i64,
    #[serde(rename = "ts", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "data")]
    pub details: Vec<SymbolTradeDetail>,
}

/// A single public trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolTradeDetail {
    /// Unique trade id; wider than 64 bits on the exchange side
    pub id: u128,
    #[serde(rename = "trade-id", default)]
    pub trade_id: Option<i64>,
    pub price: Decimal,
    pub amount: Decimal,
    pub direction: OrderSide,
    #[serde(rename = "ts", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Rolling 24h statistics from `market/detail`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDetails {
    pub id: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub amount: Decimal,
    #[serde(rename = "vol")]
    pub volume: Decimal,
    pub count: i64,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(skip_deserializing)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Net asset value of a leveraged ETP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nav {
    pub symbol: String,
    pub nav: Decimal,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub nav_time: DateTime<Utc>,
    pub outstanding: Decimal,
    #[serde(default)]
    pub basket: Vec<Basket>,
    pub actual_leverage: Decimal,
}

/// One component of an ETP basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    pub currency: String,
    pub amount: Decimal,
}

/// Exchange-wide trading status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatus {
    pub market_status: MarketState,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub halt_start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub halt_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub halt_reason: Option<HaltReason>,
    /// Comma separated symbols, or `all`
    #[serde(default)]
    pub affected_symbols: Option<String>,
}

/// Trading pair definition from `v1/common/symbols`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Symbol {
    pub symbol: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub price_precision: u32,
    pub amount_precision: u32,
    pub value_precision: u32,
    #[serde(default)]
    pub symbol_partition: Option<String>,
    pub state: SymbolState,
    #[serde(default)]
    pub min_order_amt: Option<Decimal>,
    #[serde(default)]
    pub max_order_amt: Option<Decimal>,
    #[serde(default)]
    pub min_order_value: Option<Decimal>,
    #[serde(default)]
    pub limit_order_min_order_amt: Option<Decimal>,
    #[serde(default)]
    pub limit_order_max_order_amt: Option<Decimal>,
    #[serde(default)]
    pub sell_market_min_order_amt: Option<Decimal>,
    #[serde(default)]
    pub sell_market_max_order_amt: Option<Decimal>,
    #[serde(default)]
    pub buy_market_max_order_value: Option<Decimal>,
    #[serde(default)]
    pub leverage_ratio: Option<Decimal>,
    #[serde(default)]
    pub super_margin_leverage_ratio: Option<Decimal>,
    #[serde(default)]
    pub api_trading: Option<String>,
}

/// Currency with its deposit/withdraw chains from `v2/reference/currencies`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    pub currency: String,
    pub inst_status: InstrumentStatus,
    #[serde(default)]
    pub chains: Vec<ChainInfo>,
}

/// Deposit/withdraw parameters of a currency on one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub base_chain: Option<String>,
    #[serde(default)]
    pub base_chain_protocol: Option<String>,
    #[serde(default)]
    pub is_dynamic: Option<bool>,
    pub num_of_confirmations: u32,
    pub num_of_fast_confirmations: u32,
    pub deposit_status: ChainStatus,
    pub min_deposit_amt: Decimal,
    pub withdraw_status: ChainStatus,
    pub min_withdraw_amt: Decimal,
    pub withdraw_precision: u32,
    pub max_withdraw_amt: Decimal,
    #[serde(default)]
    pub withdraw_quota_per_day: Option<Decimal>,
    #[serde(default)]
    pub withdraw_quota_per_year: Option<Decimal>,
    #[serde(default)]
    pub withdraw_quota_total: Option<Decimal>,
    pub withdraw_fee_type: WithdrawFeeType,
    #[serde(default)]
    pub transact_fee_withdraw: Option<Decimal>,
    #[serde(default)]
    pub min_transact_fee_withdraw: Option<Decimal>,
    #[serde(default)]
    pub max_transact_fee_withdraw: Option<Decimal>,
    #[serde(default)]
    pub transact_fee_rate_withdraw: Option<Decimal>,
}

// ============================================================================
// Account Types
// ============================================================================

/// An account owned by the API key's user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Isolated margin symbol for margin accounts
    #[serde(default)]
    pub subtype: Option<String>,
    pub state: AccountState,
}

/// Balance rows of an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalances {
    pub id: i64,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default)]
    pub state: Option<AccountState>,
    #[serde(default)]
    pub list: Vec<Balance>,
}

/// One balance row; a currency has one row per [`BalanceType`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub currency: String,
    #[serde(rename = "type")]
    pub balance_type: BalanceType,
    pub balance: Decimal,
    #[serde(rename = "seq-num", default)]
    pub seq_num: Option<String>,
}

/// Estimated value of an account type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountValuation {
    pub balance: Decimal,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Result of an asset transfer between accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResult {
    #[serde(rename = "transact-id")]
    pub transaction_id: i64,
    #[serde(rename = "transact-time", with = "chrono::serde::ts_milliseconds")]
    pub transaction_time: DateTime<Utc>,
}

/// Balance change entry from `v1/account/history`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountHistory {
    #[serde(rename = "account-id")]
    pub account_id: i64,
    pub currency: String,
    #[serde(rename = "transact-amt")]
    pub transaction_amount: Decimal,
    #[serde(rename = "transact-type")]
    pub transaction_type: TransactionType,
    #[serde(rename = "avail-balance")]
    pub available_balance: Decimal,
    #[serde(rename = "acct-balance")]
    pub account_balance: Decimal,
    #[serde(rename = "transact-time", with = "chrono::serde::ts_milliseconds")]
    pub transaction_time: DateTime<Utc>,
    #[serde(rename = "record-id", with = "flexible_id")]
    pub record_id: i64,
}

/// Ledger entry from `v2/account/ledger`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub account_id: i64,
    pub currency: String,
    #[serde(rename = "transactAmt")]
    pub transaction_amount: Decimal,
    #[serde(rename = "transactType")]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub transfer_type: Option<String>,
    #[serde(rename = "transactId")]
    pub transaction_id: i64,
    #[serde(rename = "transactTime", with = "chrono::serde::ts_milliseconds")]
    pub transaction_time: DateTime<Utc>,
    #[serde(default)]
    pub transferer: Option<i64>,
    #[serde(default)]
    pub transferee: Option<i64>,
}

/// Fee rates of a symbol for the current user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolFees {
    pub symbol: String,
    pub maker_fee_rate: Decimal,
    pub taker_fee_rate: Decimal,
    pub actual_maker_rate: Decimal,
    pub actual_taker_rate: Decimal,
}

// ============================================================================
// Order Types
// ============================================================================

/// Open order from `v1/order/openOrders`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OpenOrder {
    pub id: i64,
    #[serde(default)]
    pub client_order_id: Option<String>,
    pub symbol: String,
    pub account_id: i64,
    pub amount: Decimal,
    #[serde(default)]
    pub price: Decimal,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub filled_amount: Decimal,
    #[serde(default)]
    pub filled_cash_amount: Decimal,
    #[serde(default)]
    pub filled_fees: Decimal,
    #[serde(default)]
    pub source: Option<String>,
    pub state: OrderState,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub operator: Option<StopOperator>,
}

/// Order details
///
/// The exchange spells the fill fields `field-*` on some endpoints and
/// `filled-*` on others; both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub client_order_id: Option<String>,
    pub symbol: String,
    pub account_id: i64,
    pub amount: Decimal,
    #[serde(default)]
    pub price: Decimal,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(rename = "field-amount", alias = "filled-amount", default)]
    pub filled_amount: Decimal,
    #[serde(rename = "field-cash-amount", alias = "filled-cash-amount", default)]
    pub filled_cash_amount: Decimal,
    #[serde(rename = "field-fees", alias = "filled-fees", default)]
    pub filled_fees: Decimal,
    #[serde(default)]
    pub source: Option<String>,
    pub state: OrderState,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub operator: Option<StopOperator>,
}

impl Order {
    pub fn side(&self) -> OrderSide {
        self.order_type.side()
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            OrderState::Filled | OrderState::Canceled | OrderState::PartiallyCanceled
        )
    }
}

/// Orders from `v1/order/history` with the cursor for the next page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryOrders {
    pub orders: Vec<Order>,
    pub next_time: Option<DateTime<Utc>>,
}

/// A fill of one of the user's orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OrderTrade {
    pub id: i64,
    pub order_id: i64,
    pub match_id: i64,
    #[serde(default)]
    pub trade_id: Option<i64>,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub source: Option<String>,
    pub price: Decimal,
    pub filled_amount: Decimal,
    pub filled_fees: Decimal,
    #[serde(default)]
    pub fee_currency: Option<String>,
    #[serde(default)]
    pub filled_points: Option<Decimal>,
    #[serde(default)]
    pub fee_deduct_currency: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub role: OrderRole,
}

/// Result of `v1/order/orders/batchcancel`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCancelResult {
    /// Canceled orders, as order ids or client order ids depending on what was sent
    #[serde(deserialize_with = "ids_as_strings", default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub failed: Vec<FailedCancel>,
}

/// An order that could not be canceled in a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FailedCancel {
    #[serde(default, with = "flexible_id::option")]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub err_code: Option<String>,
    #[serde(default)]
    pub err_msg: Option<String>,
    #[serde(default)]
    pub order_state: Option<i32>,
}

/// Result of `v1/order/orders/batchCancelOpenOrders`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ByCriteriaCancelResult {
    pub success_count: u32,
    pub failed_count: u32,
    /// Id of the next order still matching the criteria, if any remain
    #[serde(default)]
    pub next_id: Option<i64>,
}

/// Result of arming or disarming the dead man's switch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrdersAfterResult {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub current_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub trigger_time: DateTime<Utc>,
}

// ============================================================================
// Wallet Types
// ============================================================================

/// Deposit address of a currency on one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddress {
    pub currency: String,
    pub address: String,
    #[serde(default)]
    pub address_tag: String,
    pub chain: String,
}

/// Whitelisted withdraw address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawAddress {
    pub currency: String,
    pub chain: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub address_tag: String,
    pub address: String,
}

/// Deposit or withdrawal record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WithdrawDeposit {
    pub id: i64,
    #[serde(rename = "type")]
    pub transfer_type: WithdrawDepositType,
    pub currency: String,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub tx_hash: String,
    pub amount: Decimal,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address_tag: String,
    #[serde(default)]
    pub fee: Decimal,
    pub state: WithdrawDepositState,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_msg: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// Withdraw limits of a currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawQuota {
    pub currency: String,
    #[serde(default)]
    pub chains: Vec<ChainWithdrawQuota>,
}

/// Withdraw limits of a currency on one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainWithdrawQuota {
    pub chain: String,
    pub max_withdraw_amt: Decimal,
    pub withdraw_quota_per_day: Decimal,
    pub remain_withdraw_quota_per_day: Decimal,
    pub withdraw_quota_per_year: Decimal,
    pub remain_withdraw_quota_per_year: Decimal,
    pub withdraw_quota_total: Decimal,
    pub remain_withdraw_quota_total: Decimal,
}

// ============================================================================
// Margin Types
// ============================================================================

/// Loan terms for the currencies of an isolated margin symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolLoanInfo {
    pub symbol: String,
    #[serde(default)]
    pub currencies: Vec<LoanInterestRates>,
}

/// Loan terms of one currency
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoanInterestRates {
    pub currency: String,
    pub interest_rate: Decimal,
    #[serde(rename = "min-loan-amt")]
    pub min_loan_amount: Decimal,
    #[serde(rename = "max-loan-amt")]
    pub max_loan_amount: Decimal,
    #[serde(rename = "loanable-amt")]
    pub loanable_amount: Decimal,
    pub actual_rate: Decimal,
}

/// Isolated margin loan order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoanOrder {
    #[serde(with = "flexible_id")]
    pub id: i64,
    #[serde(with = "flexible_id")]
    pub account_id: i64,
    #[serde(with = "flexible_id")]
    pub user_id: i64,
    #[serde(default)]
    pub symbol: Option<String>,
    pub currency: String,
    #[serde(default)]
    pub filled_points: Decimal,
    #[serde(rename = "filled-ht", default)]
    pub filled_ht: Decimal,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub accrued_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub loan_amount: Decimal,
    pub loan_balance: Decimal,
    pub interest_amount: Decimal,
    pub interest_balance: Decimal,
    pub state: LoanState,
}

/// Balances of a margin account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MarginAccountBalance {
    pub id: i64,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default)]
    pub symbol: Option<String>,
    pub state: String,
    #[serde(default)]
    pub risk_rate: Option<Decimal>,
    #[serde(default)]
    pub fl_price: Option<Decimal>,
    #[serde(rename = "acct-balance-sum", default)]
    pub total_account_balance: Option<Decimal>,
    #[serde(rename = "debt-balance-sum", default)]
    pub total_account_debt: Option<Decimal>,
    #[serde(default)]
    pub list: Vec<Balance>,
}

/// Repayment record from `v2/account/repayment`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRepayment {
    #[serde(with = "flexible_id")]
    pub repay_id: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub repay_time: DateTime<Utc>,
}

// ============================================================================
// Request Types
// ============================================================================

/// Parameters for placing an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub account_id: i64,
    pub symbol: String,
    pub order_type: OrderType,
    /// Base currency quantity, or quote currency value for market buys
    pub amount: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub source: Option<SourceType>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub operator: Option<StopOperator>,
}

impl PlaceOrderRequest {
    pub fn new(account_id: i64, symbol: &str, order_type: OrderType, amount: Decimal) -> Self {
        Self {
            account_id,
            symbol: symbol.to_string(),
            order_type,
            amount,
            price: None,
            client_order_id: None,
            source: None,
            stop_price: None,
            operator: None,
        }
    }

    /// Limit buy order
    pub fn limit_buy(account_id: i64, symbol: &str, amount: Decimal, price: Decimal) -> Self {
        Self::new(account_id, symbol, OrderType::LimitBuy, amount).with_price(price)
    }

    /// Limit sell order
    pub fn limit_sell(account_id: i64, symbol: &str, amount: Decimal, price: Decimal) -> Self {
        Self::new(account_id, symbol, OrderType::LimitSell, amount).with_price(price)
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }

    pub fn with_source(mut self, source: SourceType) -> Self {
        self.source = Some(source);
        self
    }

    /// Trigger condition for stop orders
    pub fn with_stop(mut self, stop_price: Decimal, operator: StopOperator) -> Self {
        self.stop_price = Some(stop_price);
        self.operator = Some(operator);
        self
    }
}

/// Transfer between two accounts, possibly of different users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferAssetRequest {
    pub from_user_id: i64,
    pub from_account_type: AccountType,
    pub from_account_id: i64,
    pub to_user_id: i64,
    pub to_account_type: AccountType,
    pub to_account_id: i64,
    pub currency: String,
    pub amount: Decimal,
}

/// Filter for the account history and ledger queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountHistoryFilter {
    pub currency: Option<String>,
    #[serde(default)]
    pub transaction_types: Vec<TransactionType>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub sort: Option<SortingType>,
    /// Page size, 1 to 500
    pub size: Option<u32>,
    /// Ledger only: first transaction id of the page
    pub from_id: Option<i64>,
}

impl AccountHistoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = Some(currency.to_string());
        self
    }

    pub fn with_transaction_types(mut self, types: Vec<TransactionType>) -> Self {
        self.transaction_types = types;
        self
    }

    pub fn with_time_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn with_sort(mut self, sort: SortingType) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_from_id(mut self, from_id: i64) -> Self {
        self.from_id = Some(from_id);
        self
    }
}

/// Filter for open orders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenOrdersFilter {
    /// Requires `symbol` to be set as well
    pub account_id: Option<i64>,
    pub symbol: Option<String>,
    pub side: Option<OrderSide>,
    pub limit: Option<u32>,
}

impl OpenOrdersFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_symbol(account_id: i64, symbol: &str) -> Self {
        Self {
            account_id: Some(account_id),
            symbol: Some(symbol.to_string()),
            ..Default::default()
        }
    }

    pub fn with_side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Filter for the order and user trade searches
///
/// Dates are sent at day granularity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdersFilter {
    #[serde(default)]
    pub states: Vec<OrderState>,
    pub symbol: Option<String>,
    #[serde(default)]
    pub types: Vec<OrderType>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub from_id: Option<i64>,
    pub direction: Option<FilterDirection>,
    pub limit: Option<u32>,
}

impl OrdersFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_states(mut self, states: Vec<OrderState>) -> Self {
        self.states = states;
        self
    }

    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.symbol = Some(symbol.to_string());
        self
    }

    pub fn with_types(mut self, types: Vec<OrderType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_time_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn with_from(mut self, from_id: i64, direction: FilterDirection) -> Self {
        self.from_id = Some(from_id);
        self.direction = Some(direction);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Filter for recent (48h) order history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryOrdersFilter {
    pub symbol: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub direction: Option<FilterDirection>,
    pub limit: Option<u32>,
}

/// Criteria for canceling open orders in bulk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CancelCriteria {
    pub account_id: Option<i64>,
    #[serde(default)]
    pub symbols: Vec<String>,
    pub side: Option<OrderSide>,
    pub limit: Option<u32>,
}

/// Parameters for a withdrawal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub address: String,
    pub currency: String,
    pub amount: Decimal,
    pub fee: Decimal,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub address_tag: Option<String>,
}

impl WithdrawRequest {
    pub fn new(address: &str, currency: &str, amount: Decimal, fee: Decimal) -> Self {
        Self {
            address: address.to_string(),
            currency: currency.to_string(),
            amount,
            fee,
            chain: None,
            address_tag: None,
        }
    }

    pub fn with_chain(mut self, chain: &str) -> Self {
        self.chain = Some(chain.to_string());
        self
    }

    pub fn with_address_tag(mut self, tag: &str) -> Self {
        self.address_tag = Some(tag.to_string());
        self
    }
}

/// Filter for deposit/withdraw history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawDepositFilter {
    pub transfer_type: WithdrawDepositType,
    pub currency: Option<String>,
    pub from_id: Option<i64>,
    pub size: Option<u32>,
    pub direction: Option<FilterDirection>,
}

impl WithdrawDepositFilter {
    pub fn new(transfer_type: WithdrawDepositType) -> Self {
        Self {
            transfer_type,
            currency: None,
            from_id: None,
            size: None,
            direction: None,
        }
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = Some(currency.to_string());
        self
    }

    pub fn with_from(mut self, from_id: i64, direction: FilterDirection) -> Self {
        self.from_id = Some(from_id);
        self.direction = Some(direction);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// Filter for isolated margin loan orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOrdersFilter {
    pub symbol: String,
    #[serde(default)]
    pub states: Vec<LoanState>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub from_id: Option<i64>,
    pub direction: Option<FilterDirection>,
    pub size: Option<u32>,
}

impl LoanOrdersFilter {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            states: Vec::new(),
            start_time: None,
            end_time: None,
            from_id: None,
            direction: None,
            size: None,
        }
    }

    pub fn with_states(mut self, states: Vec<LoanState>) -> Self {
        self.states = states;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}
