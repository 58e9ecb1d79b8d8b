//! Exchange-neutral helpers
//!
//! Parameter validation shared by the endpoint modules, plus conversions between
//! generic trading concepts (a side and a limit/market kind, a candle duration, a
//! per-asset balance) and their Huobi representations.

use std::collections::BTreeMap;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Balance, BalanceType, KlinePeriod, OrderSide, OrderType};

/// Huobi symbol for a base/quote pair, e.g. `btcusdt`
pub fn symbol_name(base: &str, quote: &str) -> String {
    format!("{base}{quote}").to_lowercase()
}

/// Normalize a symbol to lowercase and check its shape
pub fn validate_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_lowercase();
    if symbol.len() < 4 || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidParameter(format!(
            "{symbol:?} is not a valid Huobi symbol"
        )));
    }
    Ok(symbol)
}

pub(crate) fn validate_optional_symbol(symbol: Option<&str>) -> Result<Option<String>> {
    symbol.map(validate_symbol).transpose()
}

pub(crate) fn validate_between(name: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(Error::InvalidParameter(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_one_of(name: &str, value: u32, allowed: &[u32]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(Error::InvalidParameter(format!(
            "{name} must be one of {allowed:?}, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidParameter(format!("{name} must not be empty")));
    }
    Ok(())
}

/// Decimal as sent to the exchange
///
/// Trailing zeros are dropped because symbols with whole-unit precision reject
/// amounts like `1.0`.
pub(crate) fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

pub(crate) fn join<T: ToString>(values: &[T]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(
            values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// Generic order kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Limit,
    Market,
}

/// Huobi order type for a side and kind
pub fn order_type(side: OrderSide, kind: OrderKind) -> OrderType {
    match (side, kind) {
        (OrderSide::Buy, OrderKind::Limit) => OrderType::LimitBuy,
        (OrderSide::Buy, OrderKind::Market) => OrderType::MarketBuy,
        (OrderSide::Sell, OrderKind::Limit) => OrderType::LimitSell,
        (OrderSide::Sell, OrderKind::Market) => OrderType::MarketSell,
    }
}

impl KlinePeriod {
    /// Period matching a candle duration
    ///
    /// A month is accepted as either 30 or 31 days.
    pub fn from_duration(duration: Duration) -> Result<Self> {
        const MINUTE: u64 = 60;
        const HOUR: u64 = 60 * MINUTE;
        const DAY: u64 = 24 * HOUR;

        if duration.subsec_nanos() != 0 {
            return Err(unsupported_duration(duration));
        }
        let period = match duration.as_secs() {
            s if s == MINUTE => KlinePeriod::OneMinute,
            s if s == 5 * MINUTE => KlinePeriod::FiveMinutes,
            s if s == 15 * MINUTE => KlinePeriod::FifteenMinutes,
            s if s == 30 * MINUTE => KlinePeriod::ThirtyMinutes,
            s if s == HOUR => KlinePeriod::OneHour,
            s if s == 4 * HOUR => KlinePeriod::FourHours,
            s if s == DAY => KlinePeriod::OneDay,
            s if s == 7 * DAY => KlinePeriod::OneWeek,
            s if s == 30 * DAY || s == 31 * DAY => KlinePeriod::OneMonth,
            s if s == 365 * DAY => KlinePeriod::OneYear,
            _ => return Err(unsupported_duration(duration)),
        };
        Ok(period)
    }
}

fn unsupported_duration(duration: Duration) -> Error {
    Error::InvalidParameter(format!("no kline period for a duration of {duration:?}"))
}

/// Balance of one asset across balance types
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub available: Decimal,
    pub frozen: Decimal,
}

impl AssetBalance {
    pub fn total(&self) -> Decimal {
        self.available + self.frozen
    }
}

/// Fold per-type balance rows into one entry per asset
///
/// Loan and interest rows are debts and are skipped. Frozen rows count as frozen,
/// every other row as available. The result is sorted by asset.
pub fn aggregate_balances(balances: &[Balance]) -> Vec<AssetBalance> {
    let mut assets: BTreeMap<&str, AssetBalance> = BTreeMap::new();
    for balance in balances {
        if matches!(
            balance.balance_type,
            BalanceType::Loan | BalanceType::Interest
        ) {
            continue;
        }
        let entry = assets
            .entry(balance.currency.as_str())
            .or_insert_with(|| AssetBalance {
                asset: balance.currency.clone(),
                ..Default::default()
            });
        match balance.balance_type {
            BalanceType::Frozen => entry.frozen += balance.balance,
            _ => entry.available += balance.balance,
        }
    }
    assets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balance(currency: &str, balance_type: BalanceType, amount: Decimal) -> Balance {
        Balance {
            currency: currency.to_string(),
            balance_type,
            balance: amount,
            seq_num: None,
        }
    }

    #[test]
    fn test_symbol_name() {
        assert_eq!(symbol_name("BTC", "USDT"), "btcusdt");
        assert_eq!(symbol_name("eth", "btc"), "ethbtc");
    }

    #[test]
    fn test_validate_symbol() {
        assert_eq!(validate_symbol("BTCUSDT").unwrap(), "btcusdt");
        assert_eq!(validate_symbol(" ethbtc ").unwrap(), "ethbtc");
        assert!(validate_symbol("btc").is_err());
        assert!(validate_symbol("btc-usdt").is_err());
        assert!(validate_symbol("").is_err());
        assert_eq!(validate_optional_symbol(None).unwrap(), None);
        assert_eq!(
            validate_optional_symbol(Some("HTUSDT")).unwrap().as_deref(),
            Some("htusdt")
        );
    }

    #[test]
    fn test_validate_ranges() {
        assert!(validate_between("size", 0, 0, 2000).is_ok());
        assert!(validate_between("size", 2000, 0, 2000).is_ok());
        let err = validate_between("size", 2001, 0, 2000).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter: size must be between 0 and 2000, got 2001"
        );

        assert!(validate_one_of("depth", 10, &[5, 10, 20]).is_ok());
        assert!(validate_one_of("depth", 15, &[5, 10, 20]).is_err());
    }

    #[test]
    fn test_format_decimal_drops_trailing_zeros() {
        assert_eq!(format_decimal(dec!(1.0)), "1");
        assert_eq!(format_decimal(dec!(100)), "100");
        assert_eq!(format_decimal(dec!(0.12300)), "0.123");
        assert_eq!(format_decimal(dec!(12.5)), "12.5");
    }

    #[test]
    fn test_join() {
        assert_eq!(join::<String>(&[]), None);
        assert_eq!(
            join(&[OrderSide::Buy, OrderSide::Sell]).as_deref(),
            Some("buy,sell")
        );
    }

    #[test]
    fn test_order_type_mapping() {
        assert_eq!(order_type(OrderSide::Buy, OrderKind::Limit), OrderType::LimitBuy);
        assert_eq!(order_type(OrderSide::Buy, OrderKind::Market), OrderType::MarketBuy);
        assert_eq!(order_type(OrderSide::Sell, OrderKind::Limit), OrderType::LimitSell);
        assert_eq!(order_type(OrderSide::Sell, OrderKind::Market), OrderType::MarketSell);
    }

    #[test]
    fn test_kline_period_from_duration() {
        let minutes = |m: u64| Duration::from_secs(m * 60);
        let days = |d: u64| Duration::from_secs(d * 86_400);

        assert_eq!(KlinePeriod::from_duration(minutes(1)).unwrap(), KlinePeriod::OneMinute);
        assert_eq!(KlinePeriod::from_duration(minutes(60)).unwrap(), KlinePeriod::OneHour);
        assert_eq!(KlinePeriod::from_duration(minutes(240)).unwrap(), KlinePeriod::FourHours);
        assert_eq!(KlinePeriod::from_duration(days(7)).unwrap(), KlinePeriod::OneWeek);
        assert_eq!(KlinePeriod::from_duration(days(30)).unwrap(), KlinePeriod::OneMonth);
        assert_eq!(KlinePeriod::from_duration(days(31)).unwrap(), KlinePeriod::OneMonth);
        assert_eq!(KlinePeriod::from_duration(days(365)).unwrap(), KlinePeriod::OneYear);

        assert!(KlinePeriod::from_duration(minutes(2)).is_err());
        assert!(KlinePeriod::from_duration(Duration::from_millis(60_500)).is_err());
    }

    #[test]
    fn test_aggregate_balances() {
        let rows = vec![
            balance("usdt", BalanceType::Trade, dec!(100.5)),
            balance("usdt", BalanceType::Frozen, dec!(20)),
            balance("btc", BalanceType::Trade, dec!(0.1)),
            balance("btc", BalanceType::Loan, dec!(-1)),
            balance("btc", BalanceType::Interest, dec!(-0.01)),
            balance("btc", BalanceType::TransferOutAvailable, dec!(0.05)),
        ];

        let assets = aggregate_balances(&rows);
        assert_eq!(assets.len(), 2);

        assert_eq!(assets[0].asset, "btc");
        assert_eq!(assets[0].available, dec!(0.15));
        assert_eq!(assets[0].frozen, dec!(0));

        assert_eq!(assets[1].asset, "usdt");
        assert_eq!(assets[1].available, dec!(100.5));
        assert_eq!(assets[1].frozen, dec!(20));
        assert_eq!(assets[1].total(), dec!(120.5));
    }

    #[test]
    fn test_aggregate_balances_only_debts() {
        let rows = vec![balance("eth", BalanceType::Loan, dec!(-3))];
        assert!(aggregate_balances(&rows).is_empty());
    }
}
