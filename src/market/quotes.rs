//! Ticker, candle, order book and trade endpoints
//!
//! Snapshot endpoints (`market/detail/merged`, `market/depth`, `market/detail`)
//! return their payload in `tick`; the server time of the snapshot is copied from
//! the envelope into the returned object.

use crate::client::{Client, Query};
use crate::common::{validate_between, validate_one_of, validate_symbol};
use crate::error::Result;
use crate::types::{
    Kline, KlinePeriod, MergedTick, Nav, OrderBook, SymbolDetails, SymbolTick, SymbolTicks,
    SymbolTrade, V1Response,
};

const MAX_KLINES: u32 = 2000;
const MAX_MERGE_STEP: u32 = 2000;
const DEPTH_LIMITS: [u32; 3] = [5, 10, 20];
const MAX_TRADES: u32 = 2000;

impl Client {
    /// Retrieve 24h tickers for all symbols
    ///
    /// The returned [`SymbolTicks`] carries the server time the tickers were taken at.
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::public()?;
    /// let tickers = client.tickers().await?;
    /// for tick in &tickers.ticks {
    ///     println!("{}: {}", tick.symbol, tick.close);
    /// }
    /// ```
    pub async fn tickers(&self) -> Result<SymbolTicks> {
        let url = self.url(None, "market/tickers");
        let response: V1Response<Vec<SymbolTick>> = self.get(&url, Query::new(), false).await?;
        let (ticks, timestamp) = response.into_parts()?;
        Ok(SymbolTicks { ticks, timestamp })
    }

    /// Retrieve the ticker of one symbol including best bid and ask
    ///
    /// # Arguments
    /// * `symbol` - Symbol such as `btcusdt`; case is normalized
    pub async fn merged_ticker(&self, symbol: &str) -> Result<MergedTick> {
        let symbol = validate_symbol(symbol)?;
        let url = self.url(None, "market/detail/merged");
        let response: V1Response<MergedTick> = self
            .get(&url, Query::new().with("symbol", symbol), false)
            .await?;
        let (mut tick, timestamp) = response.into_parts()?;
        tick.timestamp = timestamp;
        Ok(tick)
    }

    /// Retrieve candlestick data
    ///
    /// Returns the most recent `size` candles, newest first.
    ///
    /// # Arguments
    /// * `symbol` - Symbol such as `btcusdt`
    /// * `period` - Candle period
    /// * `size` - Number of candles, 0 to 2000
    ///
    /// # Example
    /// ```ignore
    /// use huobi_sdk::KlinePeriod;
    ///
    /// let client = Client::public()?;
    /// let candles = client.klines("btcusdt", KlinePeriod::OneHour, 24).await?;
    /// ```
    pub async fn klines(&self, symbol: &str, period: KlinePeriod, size: u32) -> Result<Vec<Kline>> {
        let symbol = validate_symbol(symbol)?;
        validate_between("size", size, 0, MAX_KLINES)?;

        let query = Query::new()
            .with("symbol", symbol)
            .with("period", period)
            .with("size", size);
        self.get_v1(&self.url(None, "market/history/kline"), query, false)
            .await
    }

    /// Retrieve an order book snapshot
    ///
    /// # Arguments
    /// * `symbol` - Symbol such as `btcusdt`
    /// * `merge_step` - Price aggregation level, 0 (none) to 2000; sent as `step{n}`
    /// * `limit` - Optional number of levels per side: 5, 10 or 20
    ///
    /// # Example
    /// ```ignore
    /// let book = client.order_book("btcusdt", 0, Some(5)).await?;
    /// if let Some(bid) = book.best_bid() {
    ///     println!("best bid {} x {}", bid.price, bid.quantity);
    /// }
    /// ```
    pub async fn order_book(&self, symbol: &str, merge_step: u32, limit: Option<u32>) -> Result<OrderBook> {
        let symbol = validate_symbol(symbol)?;
        validate_between("merge_step", merge_step, 0, MAX_MERGE_STEP)?;
        if let Some(limit) = limit {
            validate_one_of("limit", limit, &DEPTH_LIMITS)?;
        }

        let query = Query::new()
            .with("symbol", symbol)
            .with("type", format!("step{merge_step}"))
            .with_opt("depth", limit);
        let response: V1Response<OrderBook> = self
            .get(&self.url(None, "market/depth"), query, false)
            .await?;
        let (mut book, timestamp) = response.into_parts()?;
        book.timestamp = timestamp;
        Ok(book)
    }

    /// Retrieve the latest trade of a symbol
    pub async fn last_trade(&self, symbol: &str) -> Result<SymbolTrade> {
        let symbol = validate_symbol(symbol)?;
        self.get_v1(
            &self.url(None, "market/trade"),
            Query::new().with("symbol", symbol),
            false,
        )
        .await
    }

    /// Retrieve recent trades
    ///
    /// # Arguments
    /// * `symbol` - Symbol such as `btcusdt`
    /// * `limit` - Number of trade batches, 0 to 2000
    pub async fn trade_history(&self, symbol: &str, limit: u32) -> Result<Vec<SymbolTrade>> {
        let symbol = validate_symbol(symbol)?;
        validate_between("limit", limit, 0, MAX_TRADES)?;

        let query = Query::new().with("symbol", symbol).with("size", limit);
        self.get_v1(&self.url(None, "market/history/trade"), query, false)
            .await
    }

    /// Retrieve rolling 24h statistics of a symbol
    pub async fn symbol_details_24h(&self, symbol: &str) -> Result<SymbolDetails> {
        let symbol = validate_symbol(symbol)?;
        let response: V1Response<SymbolDetails> = self
            .get(
                &self.url(None, "market/detail"),
                Query::new().with("symbol", symbol),
                false,
            )
            .await?;
        let (mut details, timestamp) = response.into_parts()?;
        details.timestamp = timestamp;
        Ok(details)
    }

    /// Retrieve the net asset value of a leveraged ETP
    ///
    /// # Arguments
    /// * `symbol` - ETP symbol such as `btc3lusdt`
    pub async fn nav(&self, symbol: &str) -> Result<Nav> {
        let symbol = validate_symbol(symbol)?;
        self.get_v1(
            &self.url(None, "market/etp"),
            Query::new().with("symbol", symbol),
            false,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::*;
    use crate::error::Error;
    use crate::types::{KlinePeriod, OrderSide};
    use mockito::{Matcher, Server};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_tickers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/market/tickers")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"ok","ts":1629789355531,"data":[
                    {"symbol":"btcusdt","open":48000.0,"high":50000.0,"low":47000.0,
                     "close":49500.5,"amount":1200.5,"vol":59000000.1,"count":350000,
                     "bid":49500.4,"bidSize":0.5,"ask":49500.5,"askSize":1.2},
                    {"symbol":"ethbtc","open":0.06,"high":0.065,"low":0.059,
                     "close":0.0645,"amount":8000,"vol":512.3,"count":12000}
                ]}"#,
            )
            .create_async()
            .await;

        let client = public_client(&server.url());
        let tickers = client.tickers().await.unwrap();

        assert_eq!(tickers.ticks.len(), 2);
        assert_eq!(tickers.timestamp.unwrap().timestamp_millis(), 1629789355531);
        assert_eq!(tickers.ticks[0].symbol, "btcusdt");
        assert_eq!(tickers.ticks[0].close, dec!(49500.5));
        assert_eq!(tickers.ticks[0].bid_size, Some(dec!(0.5)));
        assert_eq!(tickers.ticks[1].bid, None);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_merged_ticker_normalizes_symbol() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/market/detail/merged")
            .match_query(Matcher::UrlEncoded("symbol".into(), "btcusdt".into()))
            .with_status(200)
            .with_body(
                r#"{"ch":"market.btcusdt.detail.merged","status":"ok","ts":1629788763750,
                    "tick":{"id":272156789143,"version":272156789143,"open":50080.0,
                    "close":49820.92,"low":48767.0,"high":50500.0,"amount":12055.365781937457,
                    "vol":5.985618685709001E8,"count":420573,"bid":[49819.48,2.58112],
                    "ask":[49819.49,0.002411]}}"#,
            )
            .create_async()
            .await;

        let client = public_client(&server.url());
        let tick = client.merged_ticker("BTCUSDT").await.unwrap();

        assert_eq!(tick.bid.price, dec!(49819.48));
        assert_eq!(tick.ask.quantity, dec!(0.002411));
        assert_eq!(tick.count, 420573);
        assert_eq!(tick.timestamp.unwrap().timestamp_millis(), 1629788763750);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_klines() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/market/history/kline")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("symbol".into(), "btcusdt".into()),
                Matcher::UrlEncoded("period".into(), "4hour".into()),
                Matcher::UrlEncoded("size".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"ch":"market.btcusdt.kline.4hour","status":"ok","ts":1629769247172,"data":[
                    {"id":1629763200,"open":49056.37,"close":49025.51,"low":49022.86,
                     "high":49056.38,"amount":3.94,"vol":193489.67,"count":196},
                    {"id":1629748800,"open":49100.0,"close":49056.37,"low":48900.0,
                     "high":49200.0,"amount":10.5,"vol":515000.0,"count":900}
                ]}"#,
            )
            .create_async()
            .await;

        let client = public_client(&server.url());
        let klines = client
            .klines("btcusdt", KlinePeriod::FourHours, 2)
            .await
            .unwrap();

        assert_eq!(klines.len(), 2);
        assert_eq!(klines[0].open_time.timestamp(), 1629763200);
        assert_eq!(klines[1].high, dec!(49200.0));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_klines_size_out_of_range() {
        let client = public_client("http://127.0.0.1:1");
        let result = client.klines("btcusdt", KlinePeriod::OneDay, 2001).await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn test_order_book_sends_step_and_depth() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/market/depth")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("symbol".into(), "ethusdt".into()),
                Matcher::UrlEncoded("type".into(), "step1".into()),
                Matcher::UrlEncoded("depth".into(), "5".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"ch":"market.ethusdt.depth.step1","status":"ok","ts":1629790438801,
                    "tick":{"ts":1629790438215,"version":136107114472,
                    "bids":[[3230.0,10.5],[3229.0,2.0]],"asks":[[3231.0,1.25]]}}"#,
            )
            .create_async()
            .await;

        let client = public_client(&server.url());
        let book = client.order_book("ethusdt", 1, Some(5)).await.unwrap();

        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.best_ask().unwrap().price, dec!(3231.0));
        assert_eq!(book.timestamp.unwrap().timestamp_millis(), 1629790438801);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_order_book_rejects_bad_depth() {
        let client = public_client("http://127.0.0.1:1");
        assert!(matches!(
            client.order_book("ethusdt", 0, Some(15)).await,
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            client.order_book("ethusdt", 2001, None).await,
            Err(Error::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn test_last_trade() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/market/trade")
            .match_query(Matcher::UrlEncoded("symbol".into(), "btcusdt".into()))
            .with_status(200)
            .with_body(
                r#"{"ch":"market.btcusdt.trade.detail","status":"ok","ts":1629792192037,
                    "tick":{"id":136107843051,"ts":1629792191928,"data":[
                    {"id":136107843051348400221001656,"ts":1629792191928,
                     "trade-id":102517374388,"amount":0.028416,"price":49806.0,
                     "direction":"sell"}]}}"#,
            )
            .create_async()
            .await;

        let client = public_client(&server.url());
        let trade = client.last_trade("btcusdt").await.unwrap();

        assert_eq!(trade.id, 136107843051);
        assert_eq!(trade.details[0].direction, OrderSide::Sell);
        assert_eq!(trade.details[0].price, dec!(49806.0));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_trade_history() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/market/history/trade")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("symbol".into(), "btcusdt".into()),
                Matcher::UrlEncoded("size".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"ch":"market.btcusdt.trade.detail","status":"ok","ts":1629793657842,"data":[
                    {"id":136108764379,"ts":1629793656939,"data":[
                        {"id":136108764379348400430265987,"ts":1629793656939,
                         "trade-id":102517381182,"amount":1.24E-4,"price":49656.4,"direction":"buy"}]},
                    {"id":136108763320,"ts":1629793656198,"data":[
                        {"id":136108763320348400439066097,"ts":1629793656198,
                         "trade-id":102517381181,"amount":0.001,"price":49656.4,"direction":"buy"},
                        {"id":136108763320348400439066098,"ts":1629793656198,
                         "trade-id":102517381180,"amount":0.002,"price":49656.3,"direction":"buy"}]}
                ]}"#,
            )
            .create_async()
            .await;

        let client = public_client(&server.url());
        let trades = client.trade_history("btcusdt", 2).await.unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[1].details.len(), 2);
        assert_eq!(trades[0].details[0].amount, dec!(0.000124));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_symbol_details_24h() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/market/detail")
            .match_query(Matcher::UrlEncoded("symbol".into(), "htusdt".into()))
            .with_status(200)
            .with_body(
                r#"{"ch":"market.htusdt.detail","status":"ok","ts":1629795484817,
                    "tick":{"id":272164011416,"low":8.46,"high":8.88,"open":8.6,
                    "close":8.7,"vol":5.5E7,"amount":6.4E6,"version":272164011416,"count":78000}}"#,
            )
            .create_async()
            .await;

        let client = public_client(&server.url());
        let details = client.symbol_details_24h("htusdt").await.unwrap();

        assert_eq!(details.close, dec!(8.7));
        assert_eq!(details.count, 78000);
        assert!(details.timestamp.is_some());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_nav() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/market/etp")
            .match_query(Matcher::UrlEncoded("symbol".into(), "btc3lusdt".into()))
            .with_status(200)
            .with_body(
                r#"{"ch":"market.btc3lusdt.etp","status":"ok","ts":1597890198849,
                    "tick":{"actualLeverage":2.988538,"navTime":1597890198816,
                    "outstanding":9.3e6,"nav":17.68,"symbol":"btc3lusdt",
                    "basket":[{"amount":0.0047,"currency":"btc"}]}}"#,
            )
            .create_async()
            .await;

        let client = public_client(&server.url());
        let nav = client.nav("btc3lusdt").await.unwrap();

        assert_eq!(nav.symbol, "btc3lusdt");
        assert_eq!(nav.nav, dec!(17.68));
        assert_eq!(nav.basket[0].currency, "btc");
        assert_eq!(nav.nav_time.timestamp_millis(), 1597890198816);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_symbol_is_rejected_before_request() {
        let client = public_client("http://127.0.0.1:1");
        assert!(matches!(
            client.last_trade("b-c").await,
            Err(Error::InvalidParameter(_))
        ));
    }
}
