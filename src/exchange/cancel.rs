//! Order cancellation endpoints
//!
//! This module provides methods for cancelling single orders by order id or
//! client order id, batches of orders, all open orders matching some criteria,
//! and for arming the exchange-side dead man's switch.

use std::time::Duration;

use serde_json::Value;

use crate::client::{Body, Client, OrderEvent};
use crate::common::{join, validate_symbol};
use crate::error::{Error, Result};
use crate::types::{
    BatchCancelResult, ByCriteriaCancelResult, CancelCriteria, CancelOrdersAfterResult,
    ResponseId,
};

/// Shortest timeout accepted by the dead man's switch
const MIN_CANCEL_AFTER: Duration = Duration::from_secs(5);
const MAX_BATCH_CANCEL: usize = 50;

impl Client {
    /// Cancel an order by id
    ///
    /// Cancellation is asynchronous on the exchange side; the returned id only
    /// confirms the request was accepted. Broadcasts an [`OrderEvent::Canceled`].
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_credentials("key", "secret")?;
    /// client.cancel_order(59378).await?;
    /// ```
    pub async fn cancel_order(&self, order_id: i64) -> Result<i64> {
        let url = self.url(Some(1), &format!("order/orders/{order_id}/submitcancel"));
        let ResponseId(canceled) = self.post_v1(&url, Body::new(), true).await?;

        self.emit(OrderEvent::Canceled {
            order_id: Some(canceled),
            client_order_id: None,
        });
        Ok(canceled)
    }

    /// Cancel an order by its client order id
    ///
    /// Returns the exchange's cancel status code for the order.
    pub async fn cancel_order_by_client_order_id(&self, client_order_id: &str) -> Result<i64> {
        if client_order_id.is_empty() {
            return Err(Error::InvalidParameter(
                "client order id must not be empty".to_string(),
            ));
        }

        let body = Body::new().with("client-order-id", client_order_id);
        let ResponseId(status) = self
            .post_v1(
                &self.url(Some(1), "order/orders/submitCancelClientOrder"),
                body,
                true,
            )
            .await?;

        self.emit(OrderEvent::Canceled {
            order_id: None,
            client_order_id: Some(client_order_id.to_string()),
        });
        Ok(status)
    }

    /// Cancel up to 50 orders in one request
    ///
    /// # Arguments
    /// * `order_ids` - Exchange order ids to cancel
    /// * `client_order_ids` - Client order ids to cancel
    ///
    /// At least one order must be given across the two lists. The `success`
    /// entries echo whichever kind of id the order was canceled by.
    pub async fn cancel_orders(
        &self,
        order_ids: Option<&[i64]>,
        client_order_ids: Option<&[String]>,
    ) -> Result<BatchCancelResult> {
        let count = order_ids.map_or(0, <[i64]>::len) + client_order_ids.map_or(0, <[String]>::len);
        if count == 0 {
            return Err(Error::InvalidParameter(
                "either order ids or client order ids must be provided".to_string(),
            ));
        }
        if count > MAX_BATCH_CANCEL {
            return Err(Error::InvalidParameter(format!(
                "at most {MAX_BATCH_CANCEL} orders can be canceled at once, got {count}"
            )));
        }

        let mut body = Body::new();
        if let Some(ids) = order_ids {
            let ids = ids.iter().map(|id| Value::String(id.to_string())).collect();
            body = body.with_value("order-ids", Value::Array(ids));
        }
        if let Some(ids) = client_order_ids {
            let ids = ids.iter().cloned().map(Value::String).collect();
            body = body.with_value("client-order-ids", Value::Array(ids));
        }

        let result: BatchCancelResult = self
            .post_v1(&self.url(Some(1), "order/orders/batchcancel"), body, true)
            .await?;
        for canceled in &result.success {
            let by_client_id = client_order_ids.is_some_and(|ids| ids.contains(canceled));
            let event = match canceled.parse::<i64>() {
                Ok(order_id) if !by_client_id => OrderEvent::Canceled {
                    order_id: Some(order_id),
                    client_order_id: None,
                },
                _ => OrderEvent::Canceled {
                    order_id: None,
                    client_order_id: Some(canceled.clone()),
                },
            };
            self.emit(event);
        }
        Ok(result)
    }

    /// Cancel open orders matching the criteria
    ///
    /// Empty criteria cancel open orders across all symbols, up to the exchange's
    /// page size. Check `next_id` in the result to see whether more remain.
    pub async fn cancel_orders_by_criteria(
        &self,
        criteria: &CancelCriteria,
    ) -> Result<ByCriteriaCancelResult> {
        let symbols = criteria
            .symbols
            .iter()
            .map(|s| validate_symbol(s))
            .collect::<Result<Vec<_>>>()?;

        let body = Body::new()
            .with_opt("account-id", criteria.account_id)
            .with_opt("symbol", join(&symbols))
            .with_opt("side", criteria.side)
            .with_opt("size", criteria.limit);
        self.post_v1(
            &self.url(Some(1), "order/orders/batchCancelOpenOrders"),
            body,
            true,
        )
        .await
    }

    /// Arm the dead man's switch
    ///
    /// All open orders are canceled if this is not called again within `timeout`.
    /// A zero timeout disarms the switch; otherwise it must be at least 5 seconds.
    ///
    /// # Example
    /// ```ignore
    /// use std::time::Duration;
    ///
    /// // Keep re-arming from a heartbeat task
    /// let result = client.cancel_all_orders_after(Duration::from_secs(30)).await?;
    /// println!("orders canceled at {}", result.trigger_time);
    /// ```
    pub async fn cancel_all_orders_after(&self, timeout: Duration) -> Result<CancelOrdersAfterResult> {
        if !timeout.is_zero() && timeout < MIN_CANCEL_AFTER {
            return Err(Error::InvalidParameter(format!(
                "timeout must be 0 or at least {MIN_CANCEL_AFTER:?}, got {timeout:?}"
            )));
        }

        let body = Body::new().with_value("timeout", Value::from(timeout.as_secs()));
        self.post_v2(&self.url(Some(2), "algo-orders/cancel-all-after"), body, true)
            .await
    }
}
