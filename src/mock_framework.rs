//! # Mock Framework
//!
//! Utilities for testing clients and the channel in isolation.
//!
//! # Testing Strategy
//! Client logic (pre-flight validation, routing, orchestration) is tested
//! without a real backend: [`MockBackend`] records every call on a channel
//! the test controls and answers from a scripted queue of JSON responses,
//! so backend behavior (success, rejection, expiry) is simulated
//! deterministically. [`MockSink`] records everything the runtime asks of
//! the renderer.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::api::{
    AddCartItemRequest, CreateOrderRequest, DashboardStats, PaymentReceipt, PaymentRequest,
    QrCodePayload,
};
use crate::clients::{CartApi, OrderApi, PaymentApi, ReportApi};
use crate::domain::{
    CartSnapshot, Invoice, Order, OrderItem, OrderStatus, OrderType, PaymentStatus,
};
use crate::error::RemoteError;
use crate::view::{Notification, ViewSink};

/// Every request a [`MockBackend`] received, in order.
#[derive(Debug, Clone)]
pub enum RecordedCall {
    FetchCart,
    AddCartItem(AddCartItemRequest),
    UpdateCartQuantity { menu_id: i64, quantity: u32 },
    RemoveCartItem { menu_id: i64 },
    ClearCart,
    CreateOrder(CreateOrderRequest),
    FetchOrder { order_number: String },
    UpdateOrderStatus { order_id: i64, status: OrderStatus },
    FetchQrCode { order_number: String },
    SubmitPayment(PaymentRequest),
    InvoicesByDate { start: NaiveDate, end: NaiveDate },
    DashboardStats,
}

/// Scripted backend: answers calls from a queue of JSON payloads and
/// records what it was asked.
pub struct MockBackend {
    calls: mpsc::UnboundedSender<RecordedCall>,
    responses: Mutex<VecDeque<Result<Value, RemoteError>>>,
}

impl MockBackend {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RecordedCall>) {
        let (calls, receiver) = mpsc::unbounded_channel();
        (
            Self {
                calls,
                responses: Mutex::new(VecDeque::new()),
            },
            receiver,
        )
    }

    /// Queue the next response.
    pub fn script(&self, response: Result<Value, RemoteError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    fn respond<T: DeserializeOwned>(&self, call: RecordedCall) -> Result<T, RemoteError> {
        let _ = self.calls.send(call);
        let scripted = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Transport("no scripted response".to_string())));
        let value = scripted?;
        serde_json::from_value(value).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

/// Pop the next recorded call, if any. Call after the client future has
/// resolved; returns `None` when the backend was never reached.
pub fn expect_call(receiver: &mut mpsc::UnboundedReceiver<RecordedCall>) -> Option<RecordedCall> {
    receiver.try_recv().ok()
}

#[async_trait]
impl CartApi for MockBackend {
    async fn fetch_cart(&self) -> Result<CartSnapshot, RemoteError> {
        self.respond(RecordedCall::FetchCart)
    }

    async fn add_cart_item(&self, request: AddCartItemRequest) -> Result<CartSnapshot, RemoteError> {
        self.respond(RecordedCall::AddCartItem(request))
    }

    async fn update_cart_quantity(
        &self,
        menu_id: i64,
        quantity: u32,
    ) -> Result<CartSnapshot, RemoteError> {
        self.respond(RecordedCall::UpdateCartQuantity { menu_id, quantity })
    }

    async fn remove_cart_item(&self, menu_id: i64) -> Result<CartSnapshot, RemoteError> {
        self.respond(RecordedCall::RemoveCartItem { menu_id })
    }

    async fn clear_cart(&self) -> Result<(), RemoteError> {
        self.respond::<Value>(RecordedCall::ClearCart).map(|_| ())
    }
}

#[async_trait]
impl OrderApi for MockBackend {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, RemoteError> {
        self.respond(RecordedCall::CreateOrder(request))
    }

    async fn fetch_order(&self, order_number: &str) -> Result<Order, RemoteError> {
        self.respond(RecordedCall::FetchOrder {
            order_number: order_number.to_string(),
        })
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, RemoteError> {
        self.respond(RecordedCall::UpdateOrderStatus { order_id, status })
    }

    async fn fetch_qr_code(&self, order_number: &str) -> Result<QrCodePayload, RemoteError> {
        self.respond(RecordedCall::FetchQrCode {
            order_number: order_number.to_string(),
        })
    }
}

#[async_trait]
impl PaymentApi for MockBackend {
    async fn submit_payment(&self, request: PaymentRequest) -> Result<PaymentReceipt, RemoteError> {
        self.respond(RecordedCall::SubmitPayment(request))
    }
}

#[async_trait]
impl ReportApi for MockBackend {
    async fn invoices_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Invoice>, RemoteError> {
        self.respond(RecordedCall::InvoicesByDate { start, end })
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, RemoteError> {
        self.respond(RecordedCall::DashboardStats)
    }
}

/// A two-line order with subtotal 45000 (tax 4500, due 49500).
pub fn sample_order(status: OrderStatus, payment_status: PaymentStatus) -> Order {
    Order {
        id: 1,
        order_number: "ORD-001".to_string(),
        customer_name: "Alice".to_string(),
        order_type: OrderType::CashierAssisted,
        items: vec![
            OrderItem {
                menu_id: 10,
                menu_name: "Fried Rice".to_string(),
                price: Decimal::from(10_000),
                quantity: 2,
                subtotal: Decimal::from(20_000),
            },
            OrderItem {
                menu_id: 11,
                menu_name: "Grilled Chicken".to_string(),
                price: Decimal::from(25_000),
                quantity: 1,
                subtotal: Decimal::from(25_000),
            },
        ],
        total: Decimal::from(45_000),
        status,
        payment_status,
        created_at: Utc::now(),
    }
}

/// Recording renderer.
#[derive(Default)]
pub struct MockSink {
    notifications: Mutex<Vec<Notification>>,
    connection_lost: AtomicUsize,
    session_expired: AtomicUsize,
    dashboard_mounted: AtomicBool,
    orders_mounted: AtomicBool,
    dashboard_refreshes: AtomicUsize,
    orders_refreshes: AtomicUsize,
}

impl MockSink {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn connection_lost_count(&self) -> usize {
        self.connection_lost.load(Ordering::SeqCst)
    }

    pub fn session_expired_count(&self) -> usize {
        self.session_expired.load(Ordering::SeqCst)
    }

    pub fn set_dashboard_mounted(&self, mounted: bool) {
        self.dashboard_mounted.store(mounted, Ordering::SeqCst);
    }

    pub fn set_orders_mounted(&self, mounted: bool) {
        self.orders_mounted.store(mounted, Ordering::SeqCst);
    }

    pub fn dashboard_refreshes(&self) -> usize {
        self.dashboard_refreshes.load(Ordering::SeqCst)
    }

    pub fn orders_refreshes(&self) -> usize {
        self.orders_refreshes.load(Ordering::SeqCst)
    }
}

impl ViewSink for MockSink {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    fn connection_lost(&self) {
        self.connection_lost.fetch_add(1, Ordering::SeqCst);
    }

    fn session_expired(&self) {
        self.session_expired.fetch_add(1, Ordering::SeqCst);
    }

    fn dashboard_mounted(&self) -> bool {
        self.dashboard_mounted.load(Ordering::SeqCst)
    }

    fn orders_mounted(&self) -> bool {
        self.orders_mounted.load(Ordering::SeqCst)
    }

    fn refresh_dashboard(&self) {
        self.dashboard_refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn refresh_orders(&self) {
        self.orders_refreshes.fetch_add(1, Ordering::SeqCst);
    }
}
