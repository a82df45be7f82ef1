use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sales tax applied on top of every subtotal. Tax and final amount are
/// always recomputed from the subtotal; they are never stored.
pub fn tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Lifecycle of an order as tracked by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses offer no further actions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Payment lifecycle, orthogonal to [`OrderStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    CustomerSelf,
    CashierAssisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    QrCode,
}

/// An action a renderer may offer for an order in its current state.
///
/// All actions except [`OrderAction::TakePayment`] request a status
/// transition; take-payment opens the payment flow and leaves the order
/// status untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Confirm,
    Cancel,
    StartPreparing,
    MarkReady,
    TakePayment,
    Complete,
}

impl OrderAction {
    /// The status this action asks the backend to move to, if any.
    pub fn target_status(&self) -> Option<OrderStatus> {
        match self {
            OrderAction::Confirm => Some(OrderStatus::Confirmed),
            OrderAction::Cancel => Some(OrderStatus::Cancelled),
            OrderAction::StartPreparing => Some(OrderStatus::Preparing),
            OrderAction::MarkReady => Some(OrderStatus::Ready),
            OrderAction::TakePayment => None,
            OrderAction::Complete => Some(OrderStatus::Completed),
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderAction::Confirm => "confirm",
            OrderAction::Cancel => "cancel",
            OrderAction::StartPreparing => "start-preparing",
            OrderAction::MarkReady => "mark-ready",
            OrderAction::TakePayment => "take-payment",
            OrderAction::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// The one authoritative derivation of the action set for an order state.
///
/// Every renderer consumes this; no view maintains its own variant. The
/// backend remains the authority on whether a requested transition is
/// legal; this only decides what is *offered*.
pub fn available_actions(status: OrderStatus, payment: PaymentStatus) -> &'static [OrderAction] {
    use OrderAction::*;
    match (status, payment) {
        (OrderStatus::Pending, _) => &[Confirm, Cancel],
        (OrderStatus::Confirmed, _) => &[StartPreparing],
        (OrderStatus::Preparing, _) => &[MarkReady],
        (OrderStatus::Ready, PaymentStatus::Pending) => &[TakePayment],
        (OrderStatus::Ready, _) => &[Complete],
        (OrderStatus::Completed | OrderStatus::Cancelled, _) => &[],
    }
}

/// One ordered line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_id: i64,
    pub menu_name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

/// A placed order. Created server-side; the client only reads it and asks
/// for transitions. `order_number` is server-assigned and immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub order_type: OrderType,
    pub items: Vec<OrderItem>,
    /// Subtotal over all line items, before tax.
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn tax(&self) -> Decimal {
        self.total * tax_rate()
    }

    /// Amount actually due: subtotal plus 10% tax.
    pub fn final_amount(&self) -> Decimal {
        self.total + self.tax()
    }

    pub fn available_actions(&self) -> &'static [OrderAction] {
        available_actions(self.status, self.payment_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: OrderStatus, payment: PaymentStatus) -> Order {
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
            payment_status: payment,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn tax_is_exactly_ten_percent_of_subtotal() {
        let order = order(OrderStatus::Ready, PaymentStatus::Pending);
        assert_eq!(order.total, Decimal::from(45_000));
        assert_eq!(order.tax(), Decimal::from(4_500));
        assert_eq!(order.final_amount(), Decimal::from(49_500));
        // Derived, not drifting: final amount is always subtotal * 1.10.
        assert_eq!(order.final_amount(), order.total * Decimal::new(110, 2));
    }

    #[test]
    fn action_table_is_exhaustive_over_all_combinations() {
        use OrderAction::*;
        let statuses = [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ];
        let payments = [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
        ];

        for status in statuses {
            for payment in payments {
                let expected: &[OrderAction] = match (status, payment) {
                    (OrderStatus::Pending, _) => &[Confirm, Cancel],
                    (OrderStatus::Confirmed, _) => &[StartPreparing],
                    (OrderStatus::Preparing, _) => &[MarkReady],
                    (OrderStatus::Ready, PaymentStatus::Pending) => &[TakePayment],
                    (OrderStatus::Ready, _) => &[Complete],
                    _ => &[],
                };
                assert_eq!(
                    available_actions(status, payment),
                    expected,
                    "unexpected actions for {status}/{payment}"
                );
            }
        }
    }

    #[test]
    fn ready_order_switches_from_payment_to_completion_once_paid() {
        let unpaid = order(OrderStatus::Ready, PaymentStatus::Pending);
        assert_eq!(unpaid.available_actions(), &[OrderAction::TakePayment]);

        let paid = order(OrderStatus::Ready, PaymentStatus::Paid);
        assert_eq!(paid.available_actions(), &[OrderAction::Complete]);
    }

    #[test]
    fn terminal_statuses_offer_nothing() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(order(OrderStatus::Completed, PaymentStatus::Paid)
            .available_actions()
            .is_empty());
        assert!(order(OrderStatus::Cancelled, PaymentStatus::Pending)
            .available_actions()
            .is_empty());
    }

    #[test]
    fn take_payment_is_not_a_transition() {
        assert_eq!(OrderAction::TakePayment.target_status(), None);
        assert_eq!(
            OrderAction::Confirm.target_status(),
            Some(OrderStatus::Confirmed)
        );
        assert_eq!(
            OrderAction::Cancel.target_status(),
            Some(OrderStatus::Cancelled)
        );
    }

    #[test]
    fn order_round_trips_through_backend_json() {
        let json = serde_json::json!({
            "id": 7,
            "orderNumber": "ORD-20260808-007",
            "customerName": "Budi",
            "orderType": "CUSTOMER_SELF",
            "items": [
                {"menuId": 3, "menuName": "Iced Tea", "price": 8000, "quantity": 2, "subtotal": 16000}
            ],
            "total": 16000,
            "status": "PENDING",
            "paymentStatus": "PENDING",
            "createdAt": "2026-08-08T10:15:00Z"
        });
        let order: Order = serde_json::from_value(json).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_type, OrderType::CustomerSelf);
        assert_eq!(order.items[0].menu_id, 3);
        assert_eq!(order.final_amount(), Decimal::from(17_600));

        let back = serde_json::to_value(&order).unwrap();
        assert_eq!(back["orderNumber"], "ORD-20260808-007");
        assert_eq!(back["paymentStatus"], "PENDING");
    }
}
