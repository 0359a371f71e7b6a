//! Notification dispatch
//!
//! 通知分发 - 结算状态变更后的消息扇出
//!
//! The orchestrator publishes [`NotifyMessage`]s here after every durable
//! state change. Dispatch is strictly fire-and-forget: the transport
//! (owned by the surrounding platform) subscribes to the broadcast
//! channel and drains at its own pace. A publish that finds no subscriber
//! or a lagging subscriber is logged and counted, never escalated - the
//! escrow state change has already durably succeeded.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use shared::message::{NotifyEvent, NotifyMessage};

/// Default capacity of the broadcast channel
const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Fire-and-forget notification sink
///
/// Implementations must never block the caller on delivery and must
/// swallow (log + count) their own failures.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, user_id: &str, event: NotifyEvent, payload: Value);
}

/// Broadcast-bus notifier - the production sink
///
/// # 架构
///
/// ```text
/// Orchestrator ──▶ notify() ──▶ broadcast::Sender ──▶ transport(s)
/// ```
#[derive(Debug)]
pub struct ChannelNotifier {
    tx: broadcast::Sender<NotifyMessage>,
    /// Messages dropped because no subscriber was listening
    dropped: AtomicU64,
}

impl ChannelNotifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            dropped: AtomicU64::new(0),
        }
    }

    /// Subscribe a transport to the notification stream
    pub fn subscribe(&self) -> broadcast::Receiver<NotifyMessage> {
        self.tx.subscribe()
    }

    /// Messages dropped so far (no subscriber at publish time)
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for ChannelNotifier {
    async fn notify(&self, user_id: &str, event: NotifyEvent, payload: Value) {
        let message = NotifyMessage::new(user_id, event, payload);
        if let Err(e) = self.tx.send(message) {
            // 无订阅者时 send 失败 - 记录但绝不影响结算结果
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                user_id = %user_id,
                event = %event,
                error = %e,
                "notification dropped, no transport subscribed"
            );
        }
    }
}

/// Recording sink for tests - stores every message in order
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<NotifyMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything notified so far
    pub fn messages(&self) -> Vec<NotifyMessage> {
        self.messages.lock().expect("sink poisoned").clone()
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn notify(&self, user_id: &str, event: NotifyEvent, payload: Value) {
        self.messages
            .lock()
            .expect("sink poisoned")
            .push(NotifyMessage::new(user_id, event, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_dropped_messages_are_counted_not_raised() {
        let notifier = ChannelNotifier::with_capacity(4);
        // no subscriber yet - publish must still succeed silently
        notifier
            .notify("buyer-1", NotifyEvent::EscrowFunded, json!({"order_id": "o1"}))
            .await;
        assert_eq!(notifier.dropped_count(), 1);
    }

    #[tokio::test]
    async fn test_subscriber_receives_messages() {
        let notifier = ChannelNotifier::new();
        let mut rx = notifier.subscribe();
        notifier
            .notify("sup-1", NotifyEvent::EscrowReleased, json!({"escrow_id": "e1"}))
            .await;
        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.user_id, "sup-1");
        assert_eq!(msg.event, NotifyEvent::EscrowReleased);
        assert_eq!(notifier.dropped_count(), 0);
    }
}
