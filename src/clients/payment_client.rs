use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::api::{PaymentReceipt, PaymentRequest};
use crate::clients::PaymentApi;
use crate::domain::{Order, PaymentMethod};
use crate::error::PaymentError;

/// What the cashier collected.
#[derive(Debug, Clone)]
pub enum PaymentTender {
    Cash { tendered: Decimal },
    QrCode { transaction_code: String },
}

impl PaymentTender {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentTender::Cash { .. } => PaymentMethod::Cash,
            PaymentTender::QrCode { .. } => PaymentMethod::QrCode,
        }
    }
}

/// Client for payment submission.
///
/// Validation failures are caught here, before the wire: insufficient cash
/// and a missing QR transaction code never become requests.
#[derive(Clone)]
pub struct PaymentClient {
    inner: Arc<dyn PaymentApi>,
}

impl PaymentClient {
    pub fn new(inner: Arc<dyn PaymentApi>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, order, tender), fields(order_number = %order.order_number, method = ?tender.method()))]
    pub async fn submit(
        &self,
        order: &Order,
        tender: PaymentTender,
    ) -> Result<PaymentReceipt, PaymentError> {
        let request = match tender {
            PaymentTender::Cash { tendered } => {
                let required = order.final_amount();
                if tendered < required {
                    let shortfall = required - tendered;
                    warn!(%required, %tendered, "cash tendered is insufficient");
                    return Err(PaymentError::InsufficientCash {
                        required,
                        shortfall,
                    });
                }
                PaymentRequest {
                    order_number: order.order_number.clone(),
                    payment_method: PaymentMethod::Cash,
                    cash_amount: Some(tendered),
                    qr_data: None,
                }
            }
            PaymentTender::QrCode { transaction_code } => {
                let code = transaction_code.trim();
                if code.is_empty() {
                    return Err(PaymentError::MissingTransactionCode);
                }
                PaymentRequest {
                    order_number: order.order_number.clone(),
                    payment_method: PaymentMethod::QrCode,
                    cash_amount: None,
                    qr_data: Some(code.to_string()),
                }
            }
        };

        debug!("Sending request");
        Ok(self.inner.submit_payment(request).await?)
    }
}
