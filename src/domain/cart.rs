use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::tax_rate;

/// Smallest quantity a line may carry; updating below this removes the line.
pub const MIN_QUANTITY: u32 = 1;
/// Largest quantity the backend accepts for a single line.
pub const MAX_QUANTITY: u32 = 99;

/// One line of the session cart, as rendered. The cart itself lives in the
/// backend session; this is a transient read copy and is never mutated
/// locally; every change goes through [`crate::clients::CartClient`] and
/// comes back as a fresh snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub menu_id: i64,
    pub menu_name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

/// Snapshot of the server-held cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub total_items: u32,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn tax(&self) -> Decimal {
        self.subtotal * tax_rate()
    }

    pub fn final_amount(&self) -> Decimal {
        self.subtotal + self.tax()
    }
}
