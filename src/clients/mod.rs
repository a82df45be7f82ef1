//! Typed clients for the REST backend.
//!
//! Each client wraps an object-safe API seam so tests can substitute a
//! scripted backend; `HttpBackend` is the one real implementation of all of
//! them. Local validation (quantity bounds, payment pre-flight checks)
//! happens in the clients, before anything reaches the wire.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{
    AddCartItemRequest, CreateOrderRequest, DashboardStats, PaymentReceipt, PaymentRequest,
    QrCodePayload,
};
use crate::domain::{CartSnapshot, Invoice, Order, OrderStatus};
use crate::error::RemoteError;

pub mod cart_client;
pub mod http;
pub mod order_client;
pub mod payment_client;
pub mod report_client;

pub use cart_client::CartClient;
pub use http::HttpBackend;
pub use order_client::OrderClient;
pub use payment_client::{PaymentClient, PaymentTender};
pub use report_client::ReportClient;

#[async_trait]
pub trait CartApi: Send + Sync {
    async fn fetch_cart(&self) -> Result<CartSnapshot, RemoteError>;
    async fn add_cart_item(&self, request: AddCartItemRequest) -> Result<CartSnapshot, RemoteError>;
    async fn update_cart_quantity(
        &self,
        menu_id: i64,
        quantity: u32,
    ) -> Result<CartSnapshot, RemoteError>;
    async fn remove_cart_item(&self, menu_id: i64) -> Result<CartSnapshot, RemoteError>;
    async fn clear_cart(&self) -> Result<(), RemoteError>;
}

#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, RemoteError>;
    async fn fetch_order(&self, order_number: &str) -> Result<Order, RemoteError>;
    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, RemoteError>;
    async fn fetch_qr_code(&self, order_number: &str) -> Result<QrCodePayload, RemoteError>;
}

#[async_trait]
pub trait PaymentApi: Send + Sync {
    async fn submit_payment(&self, request: PaymentRequest) -> Result<PaymentReceipt, RemoteError>;
}

#[async_trait]
pub trait ReportApi: Send + Sync {
    async fn invoices_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Invoice>, RemoteError>;
    async fn dashboard_stats(&self) -> Result<DashboardStats, RemoteError>;
}
