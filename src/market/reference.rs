//! Exchange reference data: market status, symbols, currencies and server time

use chrono::{DateTime, Utc};

use crate::client::{Client, Query};
use crate::error::{Error, Result};
use crate::types::{CurrencyInfo, MarketStatus, Symbol};

impl Client {
    /// Retrieve the exchange-wide trading status
    pub async fn market_status(&self) -> Result<MarketStatus> {
        self.get_v2(&self.url(Some(2), "market-status"), Query::new(), false)
            .await
    }

    /// Retrieve all trading pairs with their precisions and order limits
    pub async fn symbols(&self) -> Result<Vec<Symbol>> {
        self.get_v1(&self.url(Some(1), "common/symbols"), Query::new(), false)
            .await
    }

    /// Retrieve the names of all listed currencies
    pub async fn currencies(&self) -> Result<Vec<String>> {
        self.get_v1(&self.url(Some(1), "common/currencys"), Query::new(), false)
            .await
    }

    /// Retrieve currencies with their per-chain deposit and withdraw parameters
    ///
    /// # Arguments
    /// * `currency` - Optional currency to restrict the result to
    pub async fn currencies_and_chains(&self, currency: Option<&str>) -> Result<Vec<CurrencyInfo>> {
        let query = Query::new().with_opt("currency", currency.map(str::to_lowercase));
        self.get_v2(&self.url(Some(2), "reference/currencies"), query, false)
            .await
    }

    /// Retrieve the server time
    pub async fn server_time(&self) -> Result<DateTime<Utc>> {
        let millis: i64 = self
            .get_v1(&self.url(Some(1), "common/timestamp"), Query::new(), false)
            .await?;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| Error::InvalidResponse(format!("server time {millis} out of range")))
    }
}
