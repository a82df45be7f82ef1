use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::api::PaymentReceipt;
use crate::channel::LiveUpdateChannel;
use crate::clients::{
    CartClient, HttpBackend, OrderClient, PaymentClient, PaymentTender, ReportClient,
};
use crate::config::PosConfig;
use crate::domain::{Order, OrderAction};
use crate::error::{OrderError, PaymentError, RemoteError};
use crate::payment_watch::PaymentWatch;
use crate::refresh::OrderCell;
use crate::view::{Notification, ViewSink};

/// The per-page application state.
///
/// Constructed once per page load and passed to whatever needs it; nothing
/// in this crate reaches for a global. Owns the typed clients, the live
/// update channel, and the one refresh path every order change funnels
/// through.
pub struct PosSystem {
    pub cart: CartClient,
    pub orders: OrderClient,
    pub payments: PaymentClient,
    pub reports: ReportClient,
    pub live: LiveUpdateChannel,
    cell: OrderCell,
    sink: Arc<dyn ViewSink>,
    config: PosConfig,
}

impl PosSystem {
    pub fn new(config: PosConfig, sink: Arc<dyn ViewSink>) -> Self {
        let backend = Arc::new(HttpBackend::new(
            config.base_url.clone(),
            config.csrf.clone(),
        ));
        let cart = CartClient::new(backend.clone());
        let orders = OrderClient::new(backend.clone());
        let payments = PaymentClient::new(backend.clone());
        let reports = ReportClient::new(backend);

        // Push and poll both land order snapshots here; the cell debounces
        // and the sink reloads whatever views are mounted.
        let cell = {
            let sink = sink.clone();
            OrderCell::new(
                config.refresh_debounce,
                Arc::new(move |_order: Order| {
                    if sink.orders_mounted() {
                        sink.refresh_orders();
                    }
                    if sink.dashboard_mounted() {
                        sink.refresh_dashboard();
                    }
                }),
            )
        };

        let live = LiveUpdateChannel::new(&config, sink.clone());
        {
            let cell = cell.clone();
            live.set_order_update_handler(move |order| cell.publish(order));
        }

        Self {
            cart,
            orders,
            payments,
            reports,
            live,
            cell,
            sink,
            config,
        }
    }

    /// Bring up the live update channel. Not fatal when it fails; the
    /// bounded reconnect loop is already running and REST still works.
    pub async fn start(&self) {
        if let Err(e) = self.live.connect().await {
            error!(error = %e, "live updates unavailable");
        }
    }

    /// Ask the backend for the transition named by `action`.
    ///
    /// A rejection is a local no-op: the server's message is surfaced and
    /// cached state stays untouched. Session expiry is routed to the
    /// forced-reload signal instead of a retry. On success the updated
    /// order feeds the refresh cell and is re-broadcast so other connected
    /// clients refresh too.
    #[instrument(skip(self, order), fields(order_number = %order.order_number, %action))]
    pub async fn apply_order_action(
        &self,
        order: &Order,
        action: OrderAction,
    ) -> Result<Order, OrderError> {
        match self.orders.request_transition(order, action).await {
            Ok(updated) => {
                info!(status = %updated.status, "order transitioned");
                self.sink.notify(Notification::success(format!(
                    "Order {} updated",
                    updated.order_number
                )));
                self.cell.publish(updated.clone());
                self.live.send_order_update(&updated).await;
                Ok(updated)
            }
            Err(OrderError::Remote(RemoteError::SessionExpired)) => {
                self.sink.session_expired();
                Err(OrderError::Remote(RemoteError::SessionExpired))
            }
            Err(e) => {
                self.sink
                    .notify(Notification::error(format!("Failed to update order: {e}")));
                Err(e)
            }
        }
    }

    /// Collect payment for an order. Pre-flight validation happens in the
    /// payment client; positive cash change is surfaced to the cashier.
    #[instrument(skip(self, order, tender), fields(order_number = %order.order_number))]
    pub async fn take_payment(
        &self,
        order: &Order,
        tender: PaymentTender,
    ) -> Result<PaymentReceipt, PaymentError> {
        match self.payments.submit(order, tender).await {
            Ok(receipt) => {
                match receipt.change {
                    Some(change) if change > Decimal::ZERO => {
                        self.sink.notify(Notification::success(format!(
                            "Payment received. Change due: {change}"
                        )));
                    }
                    _ => {
                        self.sink
                            .notify(Notification::success("Payment received".to_string()));
                    }
                }
                match self.orders.fetch(&order.order_number).await {
                    Ok(updated) => {
                        self.cell.publish(updated.clone());
                        self.live.send_order_update(&updated).await;
                    }
                    Err(e) => warn!(error = %e, "could not refresh order after payment"),
                }
                Ok(receipt)
            }
            Err(PaymentError::Remote(RemoteError::SessionExpired)) => {
                self.sink.session_expired();
                Err(PaymentError::Remote(RemoteError::SessionExpired))
            }
            Err(e) => {
                self.sink
                    .notify(Notification::error(format!("Payment failed: {e}")));
                Err(e)
            }
        }
    }

    /// Start the fixed-interval payment-status watch for an order. The
    /// returned handle must be cancelled (or dropped) when its view goes
    /// away.
    pub fn watch_payment(&self, order_number: impl Into<String>) -> PaymentWatch {
        PaymentWatch::spawn(
            self.orders.clone(),
            order_number.into(),
            self.config.payment_poll_interval,
            self.cell.clone(),
            self.sink.clone(),
        )
    }

    /// Tear down, on page unload.
    pub async fn shutdown(self) {
        info!("Shutting down system...");
        self.live.disconnect().await;
        info!("System shutdown complete.");
    }
}
