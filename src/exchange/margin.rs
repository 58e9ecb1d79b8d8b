//! Isolated margin loan endpoints and general (cross) margin repayment

use rust_decimal::Decimal;

use crate::client::{Body, Client, Query};
use crate::common::{format_decimal, join, require_non_empty, validate_optional_symbol, validate_symbol};
use crate::error::{Error, Result};
use crate::types::{
    LoanOrder, LoanOrdersFilter, LoanRepayment, MarginAccountBalance, ResponseId, SymbolLoanInfo,
};

const LOAN_DATE_FORMAT: &str = "%Y-%m-%d";

impl Client {
    /// Retrieve loan interest rates and quotas for isolated margin symbols
    ///
    /// # Arguments
    /// * `symbols` - Symbols to query; empty returns every margin symbol
    pub async fn loan_interest_rates(&self, symbols: &[&str]) -> Result<Vec<SymbolLoanInfo>> {
        let symbols = symbols
            .iter()
            .map(|s| validate_symbol(s))
            .collect::<Result<Vec<_>>>()?;
        let query = Query::new().with_opt("symbols", join(&symbols));
        self.get_v1(&self.url(Some(1), "margin/loan-info"), query, true)
            .await
    }

    /// Borrow on an isolated margin account
    ///
    /// Returns the loan order id.
    pub async fn request_loan(&self, symbol: &str, currency: &str, amount: Decimal) -> Result<i64> {
        let symbol = validate_symbol(symbol)?;
        require_non_empty("currency", currency)?;
        require_positive("amount", amount)?;

        let body = Body::new()
            .with("symbol", symbol)
            .with("currency", currency.to_lowercase())
            .with("amount", format_decimal(amount));
        let ResponseId(id) = self
            .post_v1(&self.url(Some(1), "margin/orders"), body, true)
            .await?;
        Ok(id)
    }

    /// Repay an isolated margin loan
    ///
    /// Returns the loan order id.
    pub async fn repay_loan(&self, loan_order_id: i64, amount: Decimal) -> Result<i64> {
        require_positive("amount", amount)?;

        let url = self.url(Some(1), &format!("margin/orders/{loan_order_id}/repay"));
        let body = Body::new().with("amount", format_decimal(amount));
        let ResponseId(id) = self.post_v1(&url, body, true).await?;
        Ok(id)
    }

    /// Retrieve isolated margin loan orders of a symbol
    pub async fn loan_orders(&self, filter: &LoanOrdersFilter) -> Result<Vec<LoanOrder>> {
        let symbol = validate_symbol(&filter.symbol)?;
        let query = Query::new()
            .with("symbol", symbol)
            .with_opt("states", join(&filter.states))
            .with_opt("start-date", filter.start_time.map(|t| t.format(LOAN_DATE_FORMAT)))
            .with_opt("end-date", filter.end_time.map(|t| t.format(LOAN_DATE_FORMAT)))
            .with_opt("from", filter.from_id)
            .with_opt("direct", filter.direction)
            .with_opt("size", filter.size);
        self.get_v1(&self.url(Some(1), "margin/loan-orders"), query, true)
            .await
    }

    /// Retrieve isolated margin account balances
    ///
    /// # Arguments
    /// * `symbol` - Restrict to one margin symbol; `None` returns all margin accounts
    pub async fn margin_balances(&self, symbol: Option<&str>) -> Result<Vec<MarginAccountBalance>> {
        let symbol = validate_optional_symbol(symbol)?;
        let query = Query::new().with_opt("symbol", symbol);
        self.get_v1(&self.url(Some(1), "margin/accounts/balance"), query, true)
            .await
    }

    /// Repay a general (cross margin) loan
    pub async fn repay_general_loan(
        &self,
        account_id: i64,
        currency: &str,
        amount: Decimal,
    ) -> Result<Vec<LoanRepayment>> {
        require_non_empty("currency", currency)?;
        require_positive("amount", amount)?;

        let body = Body::new()
            .with("accountId", account_id)
            .with("currency", currency.to_lowercase())
            .with("amount", format_decimal(amount));
        self.post_v2(&self.url(Some(2), "account/repayment"), body, true)
            .await
    }
}

fn require_positive(name: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(Error::InvalidParameter(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::*;
    use crate::error::Error;
    use crate::types::*;
    use mockito::{Matcher, Server};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_loan_interest_rates() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/margin/loan-info")
            .match_query(signed_with(&[("symbols", "btcusdt")]))
            .with_status(200)
            .with_body(ok_v1(
                r#"[{"symbol":"btcusdt","currencies":[
                    {"currency":"btc","interest-rate":"0.00098","min-loan-amt":"0.020000000000000000",
                     "max-loan-amt":"550.000000000000000000","loanable-amt":"0.045696000000000000",
                     "actual-rate":"0.00098"},
                    {"currency":"usdt","interest-rate":"0.00098","min-loan-amt":"100",
                     "max-loan-amt":"4000000","loanable-amt":"400.0","actual-rate":"0.00098"}]}]"#,
            ))
            .create_async()
            .await;

        let client = private_client(&server.url());
        let info = client.loan_interest_rates(&["BTCUSDT"]).await.unwrap();

        assert_eq!(info[0].symbol, "btcusdt");
        assert_eq!(info[0].currencies.len(), 2);
        assert_eq!(info[0].currencies[0].min_loan_amount, dec!(0.02));
        assert_eq!(info[0].currencies[1].loanable_amount, dec!(400));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_loan() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/margin/orders")
            .match_query(signed())
            .match_body(Matcher::Json(serde_json::json!({
                "symbol": "ethusdt",
                "currency": "usdt",
                "amount": "1000"
            })))
            .with_status(200)
            .with_body(ok_v1("1000"))
            .create_async()
            .await;

        let client = private_client(&server.url());
        let id = client
            .request_loan("ethusdt", "USDT", dec!(1000.0))
            .await
            .unwrap();
        assert_eq!(id, 1000);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_loan_rejects_non_positive_amount() {
        let client = private_client("http://127.0.0.1:1");
        assert!(matches!(
            client.request_loan("ethusdt", "usdt", dec!(0)).await,
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            client.repay_loan(1, dec!(-1)).await,
            Err(Error::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn test_repay_loan() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/margin/orders/390/repay")
            .match_query(signed())
            .match_body(Matcher::Json(serde_json::json!({"amount": "0.5"})))
            .with_status(200)
            .with_body(ok_v1("390"))
            .create_async()
            .await;

        let client = private_client(&server.url());
        assert_eq!(client.repay_loan(390, dec!(0.5)).await.unwrap(), 390);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_loan_orders() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/margin/loan-orders")
            .match_query(signed_with(&[
                ("symbol", "ethbtc"),
                ("states", "created,accrual"),
                ("size", "10"),
            ]))
            .with_status(200)
            .with_body(ok_v1(
                r#"[{"loan-balance":"0.100000000000000000","interest-balance":"0.000200000000000000",
                     "interest-rate":"0.002000000000000000","loan-amount":"0.100000000000000000",
                     "accrued-at":1511169724531,"interest-amount":"0.000200000000000000",
                     "filled-points":"0.2","filled-ht":"0.2","currency":"btc","id":394,
                     "state":"accrual","account-id":17747,"user-id":119913,
                     "symbol":"ethbtc","created-at":1511169724531}]"#,
            ))
            .create_async()
            .await;

        let client = private_client(&server.url());
        let filter = LoanOrdersFilter::new("ethbtc")
            .with_states(vec![LoanState::Created, LoanState::Accrual])
            .with_size(10);
        let orders = client.loan_orders(&filter).await.unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, 394);
        assert_eq!(orders[0].loan_balance, dec!(0.1));
        assert_eq!(orders[0].state, LoanState::Accrual);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_margin_balances() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/margin/accounts/balance")
            .match_query(signed_with(&[("symbol", "btcusdt")]))
            .with_status(200)
            .with_body(ok_v1(
                r#"[{"id":18264,"type":"margin","state":"working","symbol":"btcusdt",
                     "fl-price":"0","fl-type":"safe","risk-rate":"475.952571086994250554",
                     "list":[
                        {"currency":"btc","type":"trade","balance":"1.00"},
                        {"currency":"btc","type":"loan","balance":"-0.05"},
                        {"currency":"btc","type":"interest","balance":"-0.0001"}]}]"#,
            ))
            .create_async()
            .await;

        let client = private_client(&server.url());
        let balances = client.margin_balances(Some("btcusdt")).await.unwrap();

        assert_eq!(balances[0].account_type, AccountType::Margin);
        assert_eq!(balances[0].list.len(), 3);
        assert_eq!(balances[0].list[1].balance_type, BalanceType::Loan);
        assert!(balances[0].risk_rate.is_some());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_repay_general_loan() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/account/repayment")
            .match_query(signed())
            .match_body(Matcher::Json(serde_json::json!({
                "accountId": "1266826",
                "currency": "btc",
                "amount": "0.00800334"
            })))
            .with_status(200)
            .with_body(ok_v2(r#"[{"repayId":"1174424","repayTime":1600747722018}]"#))
            .create_async()
            .await;

        let client = private_client(&server.url());
        let repayments = client
            .repay_general_loan(1266826, "btc", dec!(0.00800334))
            .await
            .unwrap();

        assert_eq!(repayments[0].repay_id, 1174424);
        assert_eq!(repayments[0].repay_time.timestamp_millis(), 1600747722018);

        mock.assert_async().await;
    }
}
