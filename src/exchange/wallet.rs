//! Deposit and withdrawal endpoints

use crate::client::{Body, Client, Query};
use crate::common::{format_decimal, require_non_empty};
use crate::error::Result;
use crate::types::{
    DepositAddress, ResponseId, WithdrawAddress, WithdrawDeposit, WithdrawDepositFilter,
    WithdrawQuota, WithdrawRequest,
};

impl Client {
    /// Retrieve the deposit addresses of a currency, one per chain
    pub async fn deposit_addresses(&self, currency: &str) -> Result<Vec<DepositAddress>> {
        require_non_empty("currency", currency)?;
        let query = Query::new().with("currency", currency.to_lowercase());
        self.get_v2(&self.url(Some(2), "account/deposit/address"), query, true)
            .await
    }

    /// Retrieve the whitelisted withdraw addresses of a currency
    pub async fn withdraw_addresses(&self, currency: &str) -> Result<Vec<WithdrawAddress>> {
        require_non_empty("currency", currency)?;
        let query = Query::new().with("currency", currency.to_lowercase());
        self.get_v2(&self.url(Some(2), "account/withdraw/address"), query, true)
            .await
    }

    /// Withdraw to a whitelisted address
    ///
    /// Returns the withdraw id.
    ///
    /// # Example
    /// ```ignore
    /// use huobi_sdk::WithdrawRequest;
    /// use rust_decimal_macros::dec;
    ///
    /// let request = WithdrawRequest::new("0xde709f2102306220921060314715629080e2fb77", "usdt", dec!(100), dec!(1))
    ///     .with_chain("usdterc20");
    /// let withdraw_id = client.withdraw(&request).await?;
    /// ```
    pub async fn withdraw(&self, request: &WithdrawRequest) -> Result<i64> {
        require_non_empty("address", &request.address)?;
        require_non_empty("currency", &request.currency)?;

        let body = Body::new()
            .with("address", &request.address)
            .with("currency", request.currency.to_lowercase())
            .with("amount", format_decimal(request.amount))
            .with("fee", format_decimal(request.fee))
            .with_opt("chain", request.chain.as_deref())
            .with_opt("addr-tag", request.address_tag.as_deref());
        let ResponseId(id) = self
            .post_v1(&self.url(Some(1), "dw/withdraw/api/create"), body, true)
            .await?;
        Ok(id)
    }

    /// Retrieve deposit or withdraw history
    pub async fn withdraw_deposit_history(
        &self,
        filter: &WithdrawDepositFilter,
    ) -> Result<Vec<WithdrawDeposit>> {
        let query = Query::new()
            .with("type", filter.transfer_type)
            .with_opt("currency", filter.currency.as_deref().map(str::to_lowercase))
            .with_opt("from", filter.from_id)
            .with_opt("size", filter.size)
            .with_opt("direct", filter.direction);
        self.get_v1(&self.url(Some(1), "query/deposit-withdraw"), query, true)
            .await
    }

    /// Retrieve the withdraw limits of a currency per chain
    pub async fn withdraw_quota(&self, currency: &str) -> Result<WithdrawQuota> {
        require_non_empty("currency", currency)?;
        let query = Query::new().with("currency", currency.to_lowercase());
        self.get_v2(&self.url(Some(2), "account/withdraw/quota"), query, true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::*;
    use crate::error::Error;
    use crate::types::*;
    use mockito::{Matcher, Server};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_deposit_addresses() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/account/deposit/address")
            .match_query(signed_with(&[("currency", "btc")]))
            .with_status(200)
            .with_body(ok_v2(
                r#"[{"currency":"btc","address":"1PSRjPg53cX7hMRYAXGJnL8mqHtzmQgPUs",
                     "addressTag":"","chain":"btc"}]"#,
            ))
            .create_async()
            .await;

        let client = private_client(&server.url());
        let addresses = client.deposit_addresses("BTC").await.unwrap();

        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].chain, "btc");
        assert!(addresses[0].address_tag.is_empty());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_withdraw_addresses() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/account/withdraw/address")
            .match_query(signed_with(&[("currency", "usdt")]))
            .with_status(200)
            .with_body(ok_v2(
                r#"[{"currency":"usdt","chain":"usdt","note":"binance",
                     "addressTag":"","address":"15PrEcqTJRn4haLeby3gJJebtyf4KgWmSd"}]"#,
            ))
            .create_async()
            .await;

        let client = private_client(&server.url());
        let addresses = client.withdraw_addresses("usdt").await.unwrap();
        assert_eq!(addresses[0].note, "binance");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_withdraw() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/dw/withdraw/api/create")
            .match_query(signed())
            .match_body(Matcher::Json(serde_json::json!({
                "address": "0xde709f2102306220921060314715629080e2fb77",
                "currency": "usdt",
                "amount": "100",
                "fee": "1.5",
                "chain": "usdterc20"
            })))
            .with_status(200)
            .with_body(ok_v1("101123262"))
            .create_async()
            .await;

        let client = private_client(&server.url());
        let request = WithdrawRequest::new(
            "0xde709f2102306220921060314715629080e2fb77",
            "USDT",
            dec!(100.00),
            dec!(1.50),
        )
        .with_chain("usdterc20");
        assert_eq!(client.withdraw(&request).await.unwrap(), 101123262);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_withdraw_requires_address() {
        let client = private_client("http://127.0.0.1:1");
        let request = WithdrawRequest::new("", "usdt", dec!(1), dec!(0));
        assert!(matches!(
            client.withdraw(&request).await,
            Err(Error::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn test_withdraw_deposit_history() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/query/deposit-withdraw")
            .match_query(signed_with(&[
                ("type", "deposit"),
                ("currency", "xrp"),
                ("from", "5"),
                ("direct", "prev"),
                ("size", "10"),
            ]))
            .with_status(200)
            .with_body(ok_v1(
                r#"[{"id":1171,"type":"deposit","currency":"xrp","chain":"xrp",
                     "tx-hash":"ed03094b84eafbe4bc16e7ef766ee959885ee5bcb265872baaa9c64e1cf86c2b",
                     "amount":7.457467,"address":"rae93V8d2mdoUQHwBDBdM4NHCMehRJAsbm",
                     "address-tag":"100040","fee":0,"state":"safe",
                     "created-at":1510912472199,"updated-at":1511145876575}]"#,
            ))
            .create_async()
            .await;

        let client = private_client(&server.url());
        let filter = WithdrawDepositFilter::new(WithdrawDepositType::Deposit)
            .with_currency("XRP")
            .with_from(5, FilterDirection::Previous)
            .with_size(10);
        let history = client.withdraw_deposit_history(&filter).await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].state, WithdrawDepositState::Safe);
        assert_eq!(history[0].amount, dec!(7.457467));
        assert_eq!(history[0].address_tag, "100040");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_withdraw_quota() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/account/withdraw/quota")
            .match_query(signed_with(&[("currency", "usdt")]))
            .with_status(200)
            .with_body(ok_v2(
                r#"{"currency":"usdt","chains":[{"chain":"trc20usdt",
                    "maxWithdrawAmt":"280000.000000000000000000",
                    "withdrawQuotaPerDay":"280000.000000000000000000",
                    "remainWithdrawQuotaPerDay":"280000.000000000000000000",
                    "withdrawQuotaPerYear":"2800000.000000000000000000",
                    "remainWithdrawQuotaPerYear":"2800000.000000000000000000",
                    "withdrawQuotaTotal":"2800000.000000000000000000",
                    "remainWithdrawQuotaTotal":"2800000.000000000000000000"}]}"#,
            ))
            .create_async()
            .await;

        let client = private_client(&server.url());
        let quota = client.withdraw_quota("usdt").await.unwrap();

        assert_eq!(quota.currency, "usdt");
        assert_eq!(quota.chains[0].remain_withdraw_quota_per_day, dec!(280000));

        mock.assert_async().await;
    }
}
