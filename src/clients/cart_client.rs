use std::sync::Arc;

use tracing::{debug, instrument};

use crate::api::AddCartItemRequest;
use crate::clients::CartApi;
use crate::domain::{CartSnapshot, MAX_QUANTITY, MIN_QUANTITY};
use crate::error::CartError;

/// Client for the session cart. The backend session owns the cart; every
/// call returns a fresh [`CartSnapshot`] to render.
#[derive(Clone)]
pub struct CartClient {
    inner: Arc<dyn CartApi>,
}

impl CartClient {
    pub fn new(inner: Arc<dyn CartApi>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<CartSnapshot, CartError> {
        debug!("Sending request");
        Ok(self.inner.fetch_cart().await?)
    }

    #[instrument(skip(self))]
    pub async fn add_item(&self, menu_id: i64, quantity: u32) -> Result<CartSnapshot, CartError> {
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
            return Err(CartError::QuantityOutOfRange(quantity));
        }
        debug!("Sending request");
        Ok(self
            .inner
            .add_cart_item(AddCartItemRequest { menu_id, quantity })
            .await?)
    }

    /// Set a line's quantity. A quantity of 0 is a removal: the backend
    /// rejects updates below 1, so the call is routed to the remove
    /// endpoint instead.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        menu_id: i64,
        quantity: u32,
    ) -> Result<CartSnapshot, CartError> {
        if quantity == 0 {
            debug!("Quantity 0 requested, removing line");
            return self.remove_item(menu_id).await;
        }
        if quantity > MAX_QUANTITY {
            return Err(CartError::QuantityOutOfRange(quantity));
        }
        debug!("Sending request");
        Ok(self.inner.update_cart_quantity(menu_id, quantity).await?)
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, menu_id: i64) -> Result<CartSnapshot, CartError> {
        debug!("Sending request");
        Ok(self.inner.remove_cart_item(menu_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        debug!("Sending request");
        Ok(self.inner.clear_cart().await?)
    }
}
