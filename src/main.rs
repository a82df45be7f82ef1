mod api;
mod app_system;
mod channel;
mod clients;
mod config;
mod domain;
mod error;
mod payment_watch;
mod refresh;
mod view;

#[cfg(test)]
mod mock_framework;

use std::sync::Arc;

use tracing::{error, info};

use crate::app_system::{setup_tracing, PosSystem};
use crate::config::PosConfig;
use crate::view::LogSink;

#[tokio::main]
async fn main() {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting POS client runtime");

    let config = PosConfig::from_env();
    let system = PosSystem::new(config, Arc::new(LogSink));

    // Live updates are best-effort; REST keeps working without them.
    system.start().await;

    match system.cart.fetch().await {
        Ok(cart) => info!(
            items = cart.items.len(),
            subtotal = %cart.subtotal,
            total_due = %cart.final_amount(),
            "cart loaded"
        ),
        Err(e) => error!(error = %e, "could not load cart"),
    }

    match system.reports.dashboard_stats().await {
        Ok(stats) => info!(
            today_orders = stats.today_orders,
            pending_orders = stats.pending_orders,
            today_revenue = %stats.today_revenue,
            "dashboard loaded"
        ),
        Err(e) => error!(error = %e, "could not load dashboard"),
    }

    system.shutdown().await;
    info!("Application completed successfully");
}
