//! Frame protocol of the push endpoint.
//!
//! One socket carries three subscribed topics and two publish destinations;
//! frames are JSON, tagged by `type`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TOPIC_ORDERS: &str = "/topic/orders";
pub const TOPIC_DASHBOARD: &str = "/topic/dashboard";
pub const TOPIC_NOTIFICATIONS: &str = "/topic/notifications";

pub const DEST_ORDER_UPDATE: &str = "/app/order/update";
pub const DEST_NOTIFICATION: &str = "/app/notification";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    /// Client → server: start receiving a topic.
    Subscribe { topic: String },
    /// Client → server: publish to a destination.
    Publish { destination: String, body: Value },
    /// Server → client: a message on a subscribed topic.
    Message { topic: String, body: Value },
}
