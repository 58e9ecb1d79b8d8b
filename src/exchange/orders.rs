//! Order placement and order query endpoints
//!
//! This module provides methods for placing spot and margin orders and for
//! querying open orders, single orders, fills and order history.

use chrono::{DateTime, Utc};

use crate::client::{Body, Client, OrderEvent, Query};
use crate::common::{format_decimal, join, validate_optional_symbol, validate_symbol};
use crate::error::{Error, Result};
use crate::types::{
    HistoryOrders, HistoryOrdersFilter, OpenOrder, OpenOrdersFilter, Order, OrderTrade,
    OrdersFilter, PlaceOrderRequest, ResponseId, V1Response,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

impl Client {
    /// Place a new order
    ///
    /// Returns the id of the created order and broadcasts an
    /// [`OrderEvent::Placed`] to order event subscribers.
    ///
    /// # Arguments
    /// * `request` - The order parameters. Stop-limit types are rejected; use a
    ///   limit type with [`PlaceOrderRequest::with_stop`] instead.
    ///
    /// # Example
    /// ```ignore
    /// use huobi_sdk::{Client, PlaceOrderRequest};
    /// use rust_decimal_macros::dec;
    ///
    /// let client = Client::with_credentials("key", "secret")?;
    /// let request = PlaceOrderRequest::limit_buy(account_id, "btcusdt", dec!(0.001), dec!(30000))
    ///     .with_client_order_id("my-first-order");
    /// let order_id = client.place_order(&request).await?;
    /// ```
    pub async fn place_order(&self, request: &PlaceOrderRequest) -> Result<i64> {
        let symbol = validate_symbol(&request.symbol)?;
        if request.order_type.is_stop_limit() {
            return Err(Error::InvalidParameter(format!(
                "order type {} cannot be placed through the API",
                request.order_type
            )));
        }

        let body = Body::new()
            .with("account-id", request.account_id)
            .with("symbol", &symbol)
            .with("type", request.order_type)
            .with("amount", format_decimal(request.amount))
            .with_opt("price", request.price.map(format_decimal))
            .with_opt("client-order-id", request.client_order_id.as_deref())
            .with_opt("source", request.source)
            .with_opt("stop-price", request.stop_price.map(format_decimal))
            .with_opt("operator", request.operator);

        let ResponseId(order_id) = self
            .post_v1(&self.url(Some(1), "order/orders/place"), body, true)
            .await?;

        self.emit(OrderEvent::Placed {
            order_id,
            symbol,
            order_type: request.order_type,
            amount: request.amount,
            price: request.price,
        });
        Ok(order_id)
    }

    /// Retrieve open orders
    ///
    /// # Arguments
    /// * `filter` - Account, symbol, side and page size. An account id on its own
    ///   is not a valid filter; it has to come with a symbol.
    pub async fn open_orders(&self, filter: &OpenOrdersFilter) -> Result<Vec<OpenOrder>> {
        let symbol = validate_optional_symbol(filter.symbol.as_deref())?;
        if filter.account_id.is_some() && symbol.is_none() {
            return Err(Error::InvalidParameter(
                "open orders can't be requested by account id alone".to_string(),
            ));
        }

        let query = Query::new()
            .with_opt("account-id", filter.account_id)
            .with_opt("symbol", symbol)
            .with_opt("side", filter.side)
            .with_opt("size", filter.limit);
        self.get_v1(&self.url(Some(1), "order/openOrders"), query, true)
            .await
    }

    /// Retrieve an order by id
    pub async fn order(&self, order_id: i64) -> Result<Order> {
        self.get_v1(
            &self.url(Some(1), &format!("order/orders/{order_id}")),
            Query::new(),
            true,
        )
        .await
    }

    /// Retrieve an order by its client order id
    pub async fn order_by_client_order_id(&self, client_order_id: &str) -> Result<Order> {
        let query = Query::new().with("clientOrderId", client_order_id);
        self.get_v1(&self.url(Some(1), "order/orders/getClientOrder"), query, true)
            .await
    }

    /// Retrieve the fills of an order
    pub async fn order_trades(&self, order_id: i64) -> Result<Vec<OrderTrade>> {
        self.get_v1(
            &self.url(Some(1), &format!("order/orders/{order_id}/matchresults")),
            Query::new(),
            true,
        )
        .await
    }

    /// Search orders
    ///
    /// At least one state must be given in `filter.states`.
    ///
    /// # Example
    /// ```ignore
    /// use huobi_sdk::{OrderState, OrdersFilter};
    ///
    /// let filter = OrdersFilter::new()
    ///     .with_symbol("btcusdt")
    ///     .with_states(vec![OrderState::Filled, OrderState::Canceled]);
    /// let orders = client.orders(&filter).await?;
    /// ```
    pub async fn orders(&self, filter: &OrdersFilter) -> Result<Vec<Order>> {
        if filter.states.is_empty() {
            return Err(Error::InvalidParameter(
                "at least one order state is required".to_string(),
            ));
        }
        let query = orders_query(filter)?;
        self.get_v1(&self.url(Some(1), "order/orders"), query, true)
            .await
    }

    /// Search the user's fills
    ///
    /// Uses the same filter as [`orders`](Client::orders), but states are optional.
    pub async fn user_trades(&self, filter: &OrdersFilter) -> Result<Vec<OrderTrade>> {
        let query = orders_query(filter)?;
        self.get_v1(&self.url(Some(1), "order/matchresults"), query, true)
            .await
    }

    /// Retrieve orders finished in the last 48 hours
    ///
    /// The result carries the start time of the next page, if there is one.
    pub async fn history_orders(&self, filter: &HistoryOrdersFilter) -> Result<HistoryOrders> {
        let symbol = validate_optional_symbol(filter.symbol.as_deref())?;
        let query = Query::new()
            .with_opt("symbol", symbol)
            .with_opt("start-time", filter.start_time.map(|t| t.timestamp_millis()))
            .with_opt("end-time", filter.end_time.map(|t| t.timestamp_millis()))
            .with_opt("direct", filter.direction)
            .with_opt("size", filter.limit);

        let response: V1Response<Vec<Order>> = self
            .get(&self.url(Some(1), "order/history"), query, true)
            .await?;
        let next_time = response.next_time.and_then(DateTime::<Utc>::from_timestamp_millis);
        let (orders, _) = response.into_parts()?;
        Ok(HistoryOrders { orders, next_time })
    }
}

fn orders_query(filter: &OrdersFilter) -> Result<Query> {
    let symbol = validate_optional_symbol(filter.symbol.as_deref())?;
    Ok(Query::new()
        .with_opt("states", join(&filter.states))
        .with_opt("symbol", symbol)
        .with_opt("types", join(&filter.types))
        .with_opt("start-date", filter.start_time.map(|t| t.format(DATE_FORMAT)))
        .with_opt("end-date", filter.end_time.map(|t| t.format(DATE_FORMAT)))
        .with_opt("from", filter.from_id)
        .with_opt("direct", filter.direction)
        .with_opt("size", filter.limit))
}
