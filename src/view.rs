//! Seam to the view renderer.
//!
//! Rendering is an external collaborator: everything the runtime needs from
//! it goes through [`ViewSink`], registered once when the system is built.
//! No view is reached through a global name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A transient toast, either produced locally or received over the live
/// update channel (`{message, type, timestamp}` on the wire).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(rename = "type", default)]
    pub severity: Severity,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

/// What the runtime asks of the renderer.
///
/// `dashboard_mounted` / `orders_mounted` are presence checks: dashboard
/// refresh signals carry no data, they only mean "reload whatever listing
/// you currently show". Implementations must not block; slow reloads are
/// expected to be scheduled by the renderer itself.
pub trait ViewSink: Send + Sync {
    /// Show a transient toast.
    fn notify(&self, notification: Notification);

    /// The live update channel gave up reconnecting; only a manual page
    /// reload recovers.
    fn connection_lost(&self);

    /// The session is no longer valid; force a full page reload.
    fn session_expired(&self);

    fn dashboard_mounted(&self) -> bool;
    fn orders_mounted(&self) -> bool;

    fn refresh_dashboard(&self);
    fn refresh_orders(&self);
}

/// Headless sink used by the binary: renders everything into the log.
pub struct LogSink;

impl ViewSink for LogSink {
    fn notify(&self, notification: Notification) {
        info!(
            severity = ?notification.severity,
            "{}", notification.message
        );
    }

    fn connection_lost(&self) {
        warn!("live updates lost; reload to reconnect");
    }

    fn session_expired(&self) {
        warn!("session expired; reload required");
    }

    fn dashboard_mounted(&self) -> bool {
        false
    }

    fn orders_mounted(&self) -> bool {
        false
    }

    fn refresh_dashboard(&self) {
        debug!("dashboard refresh requested");
    }

    fn refresh_orders(&self) {
        debug!("orders refresh requested");
    }
}
