//! API routes for the demo server

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use huobi_sdk::{aggregate_balances, AccountType, Error, KlinePeriod, OpenOrdersFilter};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        Error::Auth(_) => StatusCode::UNAUTHORIZED,
        Error::Api { .. } | Error::Status { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(result: huobi_sdk::Result<T>) -> Response {
    match result {
        Ok(data) => Json(ApiResponse::success(data)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "request failed");
            (status_for(&e), Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

/// Build API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/market", market_routes())
        .nest("/account", account_routes())
}

// =============================================================================
// Market Routes
// =============================================================================

fn market_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_market_status))
        .route("/time", get(get_server_time))
        .route("/symbols", get(get_symbols))
        .route("/currencies", get(get_currencies))
        .route("/tickers", get(get_tickers))
        .route("/ticker", get(get_ticker))
        .route("/detail", get(get_detail))
        .route("/klines", get(get_klines))
        .route("/depth", get(get_depth))
        .route("/trades", get(get_trades))
}

#[derive(Deserialize)]
struct SymbolQuery {
    symbol: String,
}

#[derive(Deserialize)]
struct KlinesQuery {
    symbol: String,
    #[serde(default = "default_period")]
    period: KlinePeriod,
    #[serde(default = "default_size")]
    size: u32,
}

fn default_period() -> KlinePeriod {
    KlinePeriod::OneHour
}

fn default_size() -> u32 {
    150
}

#[derive(Deserialize)]
struct DepthQuery {
    symbol: String,
    #[serde(default)]
    step: u32,
    depth: Option<u32>,
}

#[derive(Deserialize)]
struct TradesQuery {
    symbol: String,
    #[serde(default = "default_trades")]
    size: u32,
}

fn default_trades() -> u32 {
    50
}

/// GET /api/market/status
async fn get_market_status(State(state): State<AppState>) -> Response {
    respond(state.client.market_status().await)
}

/// GET /api/market/time
async fn get_server_time(State(state): State<AppState>) -> Response {
    respond(state.client.server_time().await)
}

/// GET /api/market/symbols
async fn get_symbols(State(state): State<AppState>) -> Response {
    respond(state.client.symbols().await)
}

/// GET /api/market/currencies
async fn get_currencies(State(state): State<AppState>) -> Response {
    respond(state.client.currencies_and_chains(None).await)
}

/// GET /api/market/tickers
async fn get_tickers(State(state): State<AppState>) -> Response {
    respond(state.client.tickers().await)
}

/// GET /api/market/ticker?symbol=btcusdt
async fn get_ticker(State(state): State<AppState>, Query(params): Query<SymbolQuery>) -> Response {
    respond(state.client.merged_ticker(&params.symbol).await)
}

/// GET /api/market/detail?symbol=btcusdt
async fn get_detail(State(state): State<AppState>, Query(params): Query<SymbolQuery>) -> Response {
    respond(state.client.symbol_details_24h(&params.symbol).await)
}

/// GET /api/market/klines?symbol=btcusdt&period=1min&size=100
async fn get_klines(State(state): State<AppState>, Query(params): Query<KlinesQuery>) -> Response {
    respond(
        state
            .client
            .klines(&params.symbol, params.period, params.size)
            .await,
    )
}

/// GET /api/market/depth?symbol=btcusdt&step=0&depth=20
async fn get_depth(State(state): State<AppState>, Query(params): Query<DepthQuery>) -> Response {
    respond(
        state
            .client
            .order_book(&params.symbol, params.step, params.depth)
            .await,
    )
}

/// GET /api/market/trades?symbol=btcusdt&size=50
async fn get_trades(State(state): State<AppState>, Query(params): Query<TradesQuery>) -> Response {
    respond(state.client.trade_history(&params.symbol, params.size).await)
}

// =============================================================================
// Account Routes
// =============================================================================

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_accounts))
        .route("/:account_id/balances", get(get_balances))
        .route("/:account_id/open-orders", get(get_open_orders))
        .route("/valuation", get(get_valuation))
        .route("/fees", get(get_fees))
}

#[derive(Deserialize)]
struct OpenOrdersQuery {
    symbol: String,
}

#[derive(Deserialize)]
struct FeesQuery {
    /// Comma separated symbols
    symbols: String,
}

fn require_credentials(state: &AppState) -> Option<Response> {
    if state.client.has_credentials() {
        None
    } else {
        Some(respond::<()>(Err(Error::Auth(
            "set HUOBI_API_KEY and HUOBI_API_SECRET to use account routes".to_string(),
        ))))
    }
}

/// GET /api/account
async fn get_accounts(State(state): State<AppState>) -> Response {
    if let Some(denied) = require_credentials(&state) {
        return denied;
    }
    respond(state.client.accounts().await)
}

/// GET /api/account/:account_id/balances - balances aggregated per asset
async fn get_balances(State(state): State<AppState>, Path(account_id): Path<i64>) -> Response {
    if let Some(denied) = require_credentials(&state) {
        return denied;
    }
    let result = state.client.balances(account_id).await;
    respond(result.map(|balances| aggregate_balances(&balances)))
}

/// GET /api/account/:account_id/open-orders?symbol=btcusdt
async fn get_open_orders(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
    Query(params): Query<OpenOrdersQuery>,
) -> Response {
    if let Some(denied) = require_credentials(&state) {
        return denied;
    }
    let filter = OpenOrdersFilter::for_symbol(account_id, &params.symbol);
    respond(state.client.open_orders(&filter).await)
}

/// GET /api/account/valuation
async fn get_valuation(State(state): State<AppState>) -> Response {
    if let Some(denied) = require_credentials(&state) {
        return denied;
    }
    respond(
        state
            .client
            .asset_valuation(AccountType::Spot, Some("usd"), None)
            .await,
    )
}

/// GET /api/account/fees?symbols=btcusdt,ethusdt
async fn get_fees(State(state): State<AppState>, Query(params): Query<FeesQuery>) -> Response {
    if let Some(denied) = require_credentials(&state) {
        return denied;
    }
    let symbols: Vec<&str> = params.symbols.split(',').map(str::trim).collect();
    respond(state.client.user_fees(&symbols).await)
}
