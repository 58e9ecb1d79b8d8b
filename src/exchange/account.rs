//! Account endpoints: accounts, balances, valuation, transfers and history
//!
//! Every method here is signed and requires credentials.

use rust_decimal::Decimal;

use crate::client::{Body, Client, Query};
use crate::common::{format_decimal, join, require_non_empty, validate_between};
use crate::error::{Error, Result};
use crate::types::{
    Account, AccountBalances, AccountHistory, AccountHistoryFilter, AccountType,
    AccountValuation, Balance, LedgerEntry, SymbolFees, TransactionResult, TransferAssetRequest,
    TransferType,
};

const MAX_HISTORY_PAGE: u32 = 500;
const MAX_FEE_SYMBOLS: usize = 10;

impl Client {
    /// Retrieve the user id of the API key's owner
    pub async fn uid(&self) -> Result<i64> {
        self.get_v2(&self.url(Some(2), "user/uid"), Query::new(), true)
            .await
    }

    /// Retrieve all accounts of the user
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_credentials("key", "secret")?;
    /// let spot = client
    ///     .accounts()
    ///     .await?
    ///     .into_iter()
    ///     .find(|a| a.account_type == AccountType::Spot);
    /// ```
    pub async fn accounts(&self) -> Result<Vec<Account>> {
        self.get_v1(&self.url(Some(1), "account/accounts"), Query::new(), true)
            .await
    }

    /// Retrieve the balance rows of an account
    ///
    /// Each currency appears once per balance type; see
    /// [`aggregate_balances`](crate::aggregate_balances) to fold them per asset.
    pub async fn balances(&self, account_id: i64) -> Result<Vec<Balance>> {
        let url = self.url(Some(1), &format!("account/accounts/{account_id}/balance"));
        let account: AccountBalances = self.get_v1(&url, Query::new(), true).await?;
        Ok(account.list)
    }

    /// Retrieve the estimated total value of an account type
    ///
    /// # Arguments
    /// * `account_type` - Account type to value
    /// * `valuation_currency` - Currency to express the value in (defaults to BTC)
    /// * `sub_user_id` - Value a sub user's account instead of the caller's
    pub async fn asset_valuation(
        &self,
        account_type: AccountType,
        valuation_currency: Option<&str>,
        sub_user_id: Option<i64>,
    ) -> Result<AccountValuation> {
        let query = Query::new()
            .with("accountType", account_type)
            .with_opt("valuationCurrency", valuation_currency.map(str::to_uppercase))
            .with_opt("subUid", sub_user_id);
        self.get_v2(&self.url(Some(2), "account/asset-valuation"), query, true)
            .await
    }

    /// Transfer assets between accounts
    pub async fn transfer_asset(&self, request: &TransferAssetRequest) -> Result<TransactionResult> {
        require_non_empty("currency", &request.currency)?;

        let body = Body::new()
            .with("from-user", request.from_user_id)
            .with("from-account-type", request.from_account_type)
            .with("from-account-id", request.from_account_id)
            .with("to-user", request.to_user_id)
            .with("to-account-type", request.to_account_type)
            .with("to-account-id", request.to_account_id)
            .with("currency", request.currency.to_lowercase())
            .with("amount", format_decimal(request.amount));
        self.post_v1(&self.url(Some(1), "account/transfer"), body, true)
            .await
    }

    /// Retrieve balance changes of an account
    ///
    /// # Arguments
    /// * `account_id` - Account to query
    /// * `filter` - Currency, transaction types, time range, sort and page size (1 to 500)
    pub async fn account_history(
        &self,
        account_id: i64,
        filter: &AccountHistoryFilter,
    ) -> Result<Vec<AccountHistory>> {
        if let Some(size) = filter.size {
            validate_between("size", size, 1, MAX_HISTORY_PAGE)?;
        }

        let query = Query::new()
            .with("account-id", account_id)
            .with_opt("currency", filter.currency.as_deref())
            .with_opt("transact-types", join(&filter.transaction_types))
            .with_opt("start-time", filter.start_time.map(|t| t.timestamp_millis()))
            .with_opt("end-time", filter.end_time.map(|t| t.timestamp_millis()))
            .with_opt("sort", filter.sort)
            .with_opt("size", filter.size);
        self.get_v1(&self.url(Some(1), "account/history"), query, true)
            .await
    }

    /// Retrieve the ledger of an account
    ///
    /// Unlike [`account_history`](Client::account_history) this includes transfers
    /// between accounts and pages with `from_id`.
    pub async fn account_ledger(
        &self,
        account_id: i64,
        filter: &AccountHistoryFilter,
    ) -> Result<Vec<LedgerEntry>> {
        if let Some(size) = filter.size {
            validate_between("limit", size, 1, MAX_HISTORY_PAGE)?;
        }

        let query = Query::new()
            .with("accountId", account_id)
            .with_opt("currency", filter.currency.as_deref())
            .with_opt("transactTypes", join(&filter.transaction_types))
            .with_opt("startTime", filter.start_time.map(|t| t.timestamp_millis()))
            .with_opt("endTime", filter.end_time.map(|t| t.timestamp_millis()))
            .with_opt("sort", filter.sort)
            .with_opt("limit", filter.size)
            .with_opt("fromId", filter.from_id);
        self.get_v2(&self.url(Some(2), "account/ledger"), query, true)
            .await
    }

    /// Retrieve the balance rows of a sub user
    pub async fn sub_account_balances(&self, sub_user_id: i64) -> Result<Vec<Balance>> {
        let url = self.url(Some(1), &format!("account/accounts/{sub_user_id}"));
        let accounts: Vec<AccountBalances> = self.get_v1(&url, Query::new(), true).await?;
        accounts
            .into_iter()
            .next()
            .map(|account| account.list)
            .ok_or_else(|| Error::InvalidResponse(format!("no accounts for sub user {sub_user_id}")))
    }

    /// Transfer between the parent user and a sub user
    ///
    /// Returns the transfer id.
    pub async fn transfer_with_sub_account(
        &self,
        sub_user_id: i64,
        currency: &str,
        amount: Decimal,
        transfer_type: TransferType,
    ) -> Result<i64> {
        require_non_empty("currency", currency)?;

        let body = Body::new()
            .with("sub-uid", sub_user_id)
            .with("currency", currency.to_lowercase())
            .with("amount", format_decimal(amount))
            .with("type", transfer_type);
        self.post_v1(&self.url(Some(1), "subuser/transfer"), body, true)
            .await
    }

    /// Retrieve the caller's fee rates for up to 10 symbols
    pub async fn user_fees(&self, symbols: &[&str]) -> Result<Vec<SymbolFees>> {
        if symbols.is_empty() || symbols.len() > MAX_FEE_SYMBOLS {
            return Err(Error::InvalidParameter(format!(
                "between 1 and {MAX_FEE_SYMBOLS} symbols required, got {}",
                symbols.len()
            )));
        }
        let symbols: Vec<String> = symbols.iter().map(|s| s.to_lowercase()).collect();

        let query = Query::new().with_opt("symbols", join(&symbols));
        self.get_v2(&self.url(Some(2), "reference/transact-fee-rate"), query, true)
            .await
    }
}
