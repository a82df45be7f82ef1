use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, info, warn};

use crate::channel::protocol::{
    Frame, DEST_NOTIFICATION, DEST_ORDER_UPDATE, TOPIC_DASHBOARD, TOPIC_NOTIFICATIONS, TOPIC_ORDERS,
};
use crate::config::PosConfig;
use crate::domain::Order;
use crate::error::ChannelError;
use crate::view::{Notification, Severity, ViewSink};

type OrderUpdateHandler = Arc<dyn Fn(Order) + Send + Sync>;

struct ConnectionState {
    sender: mpsc::UnboundedSender<Message>,
}

/// Persistent publish/subscribe connection for live order, dashboard, and
/// notification events.
///
/// One instance lives for the whole page. Reconnection uses a fixed delay
/// and a bounded attempt count: the counter is reset only by a successful
/// connect, and once it is exhausted the channel stays down until the page
/// is reloaded.
#[derive(Clone)]
pub struct LiveUpdateChannel {
    socket_url: String,
    reconnect_delay: Duration,
    max_reconnect_attempts: u32,
    state: Arc<Mutex<Option<ConnectionState>>>,
    /// Consecutive failed connection attempts, page-lifetime scoped.
    reconnect_attempts: Arc<AtomicU32>,
    reconnecting: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
    handler: Arc<RwLock<Option<OrderUpdateHandler>>>,
    sink: Arc<dyn ViewSink>,
}

impl LiveUpdateChannel {
    pub fn new(config: &PosConfig, sink: Arc<dyn ViewSink>) -> Self {
        Self {
            socket_url: config.socket_url.clone(),
            reconnect_delay: config.reconnect_delay,
            max_reconnect_attempts: config.max_reconnect_attempts,
            state: Arc::new(Mutex::new(None)),
            reconnect_attempts: Arc::new(AtomicU32::new(0)),
            reconnecting: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicBool::new(false)),
            handler: Arc::new(RwLock::new(None)),
            sink,
        }
    }

    /// Register the one order-update handler. Replaces any previous one.
    pub fn set_order_update_handler(&self, handler: impl Fn(Order) + Send + Sync + 'static) {
        if let Ok(mut slot) = self.handler.write() {
            *slot = Some(Arc::new(handler));
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// Failed connection attempts since the last successful connect.
    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts.load(Ordering::SeqCst)
    }

    /// Establish the connection and subscribe to all topics. Idempotent if
    /// already connected. A failure schedules the bounded reconnect loop
    /// before returning the error.
    pub async fn connect(&self) -> Result<(), ChannelError> {
        if self.is_connected().await {
            debug!("already connected");
            return Ok(());
        }
        match self.try_connect().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.spawn_reconnect();
                Err(e)
            }
        }
    }

    async fn try_connect(&self) -> Result<(), ChannelError> {
        let subscriptions: Vec<Message> = [TOPIC_ORDERS, TOPIC_DASHBOARD, TOPIC_NOTIFICATIONS]
            .iter()
            .map(|topic| {
                encode(&Frame::Subscribe {
                    topic: (*topic).to_string(),
                })
            })
            .collect::<Result<_, _>>()?;

        let (ws_stream, _) = match connect_async(self.socket_url.clone()).await {
            Ok(connected) => connected,
            Err(e) => {
                self.reconnect_attempts.fetch_add(1, Ordering::SeqCst);
                return Err(ChannelError::Connect(e.to_string()));
            }
        };
        info!(url = %self.socket_url, "connected to live update channel");
        self.reconnect_attempts.store(0, Ordering::SeqCst);

        let (mut write, mut read) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        *self.state.lock().await = Some(ConnectionState { sender: tx.clone() });

        // Writer: drains the send handle into the socket.
        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if write.send(message).await.is_err() {
                    debug!("live update writer stopped");
                    break;
                }
            }
        });

        // Reader: dispatches incoming frames until the connection drops,
        // then hands over to the reconnect loop.
        let channel = self.clone();
        tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => channel.dispatch(text.as_str()),
                    Ok(Message::Close(frame)) => {
                        info!(?frame, "live update channel closed by server");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "live update channel error");
                        break;
                    }
                }
            }
            *channel.state.lock().await = None;
            if !channel.closed.load(Ordering::SeqCst) {
                channel.spawn_reconnect();
            }
        });

        for message in subscriptions {
            let _ = tx.send(message);
        }

        Ok(())
    }

    fn dispatch(&self, text: &str) {
        let frame: Frame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "ignoring malformed frame");
                return;
            }
        };
        let Frame::Message { topic, body } = frame else {
            debug!("ignoring non-message frame");
            return;
        };
        match topic.as_str() {
            TOPIC_ORDERS => self.dispatch_order_update(body),
            TOPIC_DASHBOARD => self.dispatch_dashboard_refresh(),
            TOPIC_NOTIFICATIONS => self.dispatch_notification(body),
            other => debug!(topic = other, "ignoring unknown topic"),
        }
    }

    fn dispatch_order_update(&self, body: Value) {
        let order: Order = match serde_json::from_value(body) {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "ignoring malformed order update");
                return;
            }
        };
        self.sink.notify(Notification::info(format!(
            "Order {} updated: {}",
            order.order_number, order.status
        )));

        let handler = self.handler.read().ok().and_then(|slot| slot.clone());
        if let Some(handler) = handler {
            // Handlers may kick off full reloads; keep them off the read
            // loop so message delivery is never starved.
            tokio::spawn(async move { handler(order) });
        }
    }

    /// Dashboard signals carry no payload; whether anything reloads is a
    /// presence check against the currently mounted views.
    fn dispatch_dashboard_refresh(&self) {
        let sink = self.sink.clone();
        tokio::spawn(async move {
            if sink.dashboard_mounted() {
                sink.refresh_dashboard();
            }
            if sink.orders_mounted() {
                sink.refresh_orders();
            }
        });
    }

    fn dispatch_notification(&self, body: Value) {
        match serde_json::from_value::<Notification>(body) {
            Ok(notification) => self.sink.notify(notification),
            Err(e) => warn!(error = %e, "ignoring malformed notification"),
        }
    }

    fn spawn_reconnect(&self) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        if self
            .reconnecting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let channel = self.clone();
        tokio::spawn(async move {
            loop {
                if channel.closed.load(Ordering::SeqCst) {
                    break;
                }
                let failures = channel.reconnect_attempts.load(Ordering::SeqCst);
                if failures >= channel.max_reconnect_attempts {
                    warn!(failures, "giving up on the live update channel");
                    channel.sink.connection_lost();
                    break;
                }
                info!(
                    attempt = failures + 1,
                    max = channel.max_reconnect_attempts,
                    "reconnecting to live update channel"
                );
                sleep(channel.reconnect_delay).await;
                match channel.try_connect().await {
                    Ok(()) => break,
                    Err(e) => warn!(error = %e, "reconnect attempt failed"),
                }
            }
            channel.reconnecting.store(false, Ordering::SeqCst);
        });
    }

    /// Tell other connected clients about a changed order. No-op when the
    /// channel is down.
    pub async fn send_order_update(&self, order: &Order) {
        let body = match serde_json::to_value(order) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "failed to encode order update");
                return;
            }
        };
        self.publish(Frame::Publish {
            destination: DEST_ORDER_UPDATE.to_string(),
            body,
        })
        .await;
    }

    /// Broadcast a free-form notification. No-op when the channel is down.
    pub async fn send_notification(&self, message: impl Into<String>, severity: Severity) {
        let notification = Notification::new(severity, message);
        let body = match serde_json::to_value(&notification) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "failed to encode notification");
                return;
            }
        };
        self.publish(Frame::Publish {
            destination: DEST_NOTIFICATION.to_string(),
            body,
        })
        .await;
    }

    async fn publish(&self, frame: Frame) {
        let guard = self.state.lock().await;
        let Some(state) = &*guard else {
            debug!("not connected, dropping outgoing frame");
            return;
        };
        match encode(&frame) {
            Ok(message) => {
                let _ = state.sender.send(message);
            }
            Err(e) => warn!(error = %e, "failed to encode frame"),
        }
    }

    /// Tear the connection down. Must be called on page unload; also
    /// suppresses any further reconnection.
    pub async fn disconnect(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(state) = self.state.lock().await.take() {
            let _ = state.sender.send(Message::Close(None));
        }
        info!("live update channel disconnected");
    }
}

fn encode(frame: &Frame) -> Result<Message, ChannelError> {
    let text = serde_json::to_string(frame).map_err(|e| ChannelError::Connect(e.to_string()))?;
    Ok(Message::Text(text.into()))
}
