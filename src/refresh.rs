//! Refresh consolidation.
//!
//! Push (live channel) and poll (payment watch) can both learn about the
//! same order change; both feed one [`OrderCell`]. A single downstream
//! observer debounces the bursts and performs the actual refresh, so a
//! change never triggers the same reload twice in quick succession.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

use crate::domain::Order;

pub type RefreshFn = Arc<dyn Fn(Order) + Send + Sync>;

/// Reactive cell holding the most recently seen order snapshot.
#[derive(Clone)]
pub struct OrderCell {
    tx: watch::Sender<Option<Order>>,
}

impl OrderCell {
    /// Create the cell and start its debounced observer.
    pub fn new(debounce: Duration, on_refresh: RefreshFn) -> Self {
        let (tx, mut rx) = watch::channel::<Option<Order>>(None);

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                // Let the burst settle, then refresh once with the latest.
                sleep(debounce).await;
                let latest = rx.borrow_and_update().clone();
                if let Some(order) = latest {
                    on_refresh(order);
                }
            }
        });

        Self { tx }
    }

    /// Record a fresh order snapshot from either source.
    pub fn publish(&self, order: Order) {
        let _ = self.tx.send(Some(order));
    }
}
