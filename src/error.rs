use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::OrderAction;

/// Failures reported by the REST backend or the transport underneath it.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("session expired")]
    SessionExpired,
}

#[derive(Debug, Clone, Error)]
pub enum CartError {
    #[error("quantity {0} is out of range (1..=99)")]
    QuantityOutOfRange(u32),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[derive(Debug, Clone, Error)]
pub enum OrderError {
    #[error("action {0} does not name a target status")]
    NotATransition(OrderAction),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    #[error("insufficient cash: {required} required, short {shortfall}")]
    InsufficientCash { required: Decimal, shortfall: Decimal },
    #[error("transaction code is required for QR payment")]
    MissingTransactionCode,
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    #[error("connection failed: {0}")]
    Connect(String),
}
