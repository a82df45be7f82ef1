//! Periodic payment-status check for a customer awaiting confirmation.
//!
//! Polls the order at a fixed interval, publishes every snapshot into the
//! shared [`OrderCell`], and stops on its own once payment is confirmed.
//! The watch must be cancelled when its view goes away (a forgotten
//! interval is a leak), so dropping the handle aborts the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{info, instrument, warn};

use crate::clients::OrderClient;
use crate::domain::PaymentStatus;
use crate::refresh::OrderCell;
use crate::view::{Notification, ViewSink};

pub struct PaymentWatch {
    handle: JoinHandle<()>,
}

impl PaymentWatch {
    /// Start watching `order_number` every `every` until payment lands.
    #[instrument(skip(orders, cell, sink))]
    pub fn spawn(
        orders: OrderClient,
        order_number: String,
        every: Duration,
        cell: OrderCell,
        sink: Arc<dyn ViewSink>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            // The first interval tick completes immediately; the first
            // check should happen one period in.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match orders.fetch(&order_number).await {
                    Ok(order) => {
                        let paid = order.payment_status == PaymentStatus::Paid;
                        cell.publish(order);
                        if paid {
                            info!(%order_number, "payment confirmed");
                            sink.notify(Notification::success(format!(
                                "Payment received for order {order_number}"
                            )));
                            return;
                        }
                    }
                    Err(e) => warn!(error = %e, "payment status check failed"),
                }
            }
        });

        Self { handle }
    }

    /// Stop the watch. Also happens automatically when the handle drops.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the watch to reach its terminal condition.
    pub async fn wait(mut self) {
        let _ = (&mut self.handle).await;
    }
}

impl Drop for PaymentWatch {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
