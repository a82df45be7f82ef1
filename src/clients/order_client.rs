use std::sync::Arc;

use tracing::{debug, instrument};

use crate::api::{CreateOrderRequest, OrderItemRequest, QrCodePayload};
use crate::clients::OrderApi;
use crate::domain::{Order, OrderAction, OrderType};
use crate::error::OrderError;

/// Client for order creation, lookup, and status transitions.
///
/// Transitions name the desired target status; the backend alone decides
/// whether the transition is legal. A rejected transition changes nothing
/// locally; the caller gets the server's message and may retry manually.
#[derive(Clone)]
pub struct OrderClient {
    inner: Arc<dyn OrderApi>,
}

impl OrderClient {
    pub fn new(inner: Arc<dyn OrderApi>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, items))]
    pub async fn create(
        &self,
        order_type: OrderType,
        customer_name: impl Into<String> + std::fmt::Debug,
        items: Vec<OrderItemRequest>,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        Ok(self
            .inner
            .create_order(CreateOrderRequest {
                order_type,
                customer_name: customer_name.into(),
                items,
            })
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, order_number: &str) -> Result<Order, OrderError> {
        debug!("Sending request");
        Ok(self.inner.fetch_order(order_number).await?)
    }

    /// Request the transition named by `action` for `order`.
    ///
    /// Returns the updated order on success. [`OrderAction::TakePayment`]
    /// is not a transition and is refused here; payment goes through
    /// [`crate::clients::PaymentClient`].
    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    pub async fn request_transition(
        &self,
        order: &Order,
        action: OrderAction,
    ) -> Result<Order, OrderError> {
        let target = action
            .target_status()
            .ok_or(OrderError::NotATransition(action))?;
        debug!(%target, "Sending request");
        Ok(self.inner.update_order_status(order.id, target).await?)
    }

    #[instrument(skip(self))]
    pub async fn fetch_qr_code(&self, order_number: &str) -> Result<QrCodePayload, OrderError> {
        debug!("Sending request");
        Ok(self.inner.fetch_qr_code(order_number).await?)
    }
}
