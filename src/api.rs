//! Wire contracts for the REST backend.
//!
//! Every endpoint wraps its payload in the same `{success, message, data}`
//! envelope; field names on the wire are camelCase and enum values are
//! SCREAMING_SNAKE_CASE.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Order, OrderType, PaymentMethod};

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Anti-forgery token pair supplied by the hosting page. Attached to every
/// mutating request when present; requests go out bare when it is not.
#[derive(Debug, Clone)]
pub struct CsrfToken {
    pub header: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub menu_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub menu_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_type: OrderType,
    pub customer_name: String,
    pub items: Vec<OrderItemRequest>,
}

/// Payment submission. Exactly one of `cash_amount` / `qr_data` is set,
/// matching the method.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_number: String,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_data: Option<String>,
}

/// Result of a successful payment. `change` is present for cash payments
/// and must be shown to the cashier when positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub order_number: String,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    #[serde(default)]
    pub change: Option<Decimal>,
    pub paid_at: DateTime<Utc>,
}

/// QR payload the customer payment page renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodePayload {
    pub qr_code_image: String,
}

/// Aggregates the cashier dashboard renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_revenue: Decimal,
    pub today_orders: u64,
    pub pending_orders: u64,
    pub available_menus: u64,
    #[serde(default)]
    pub recent_orders: Vec<Order>,
}
