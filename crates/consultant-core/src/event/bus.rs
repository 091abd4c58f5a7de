//! Broadcast event bus for distributing `ConversationEvent` to renderers.
//!
//! Built on `tokio::sync::broadcast`, the `EventBus` supports multiple
//! concurrent subscribers. Publishing with no active subscribers is a no-op.

use consultant_types::event::ConversationEvent;
use tokio::sync::broadcast;

/// Default capacity. A long reply publishes one event per fragment, so the
/// buffer is sized for a whole turn rather than a handful of events.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Multi-consumer bus for conversation events.
///
/// Cloning the bus clones the sender, allowing multiple producers and
/// consumers.
pub struct EventBus {
    sender: broadcast::Sender<ConversationEvent>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new subscriber that will receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no subscribers, the event is silently dropped.
    pub fn publish(&self, event: ConversationEvent) {
        let _ = self.sender.send(event);
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy(busy: bool) -> ConversationEvent {
        ConversationEvent::BusyChanged { busy }
    }

    #[tokio::test]
    async fn publish_and_subscribe_delivers_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(busy(true));

        let received = rx.recv().await.unwrap();
        assert_eq!(received, busy(true));
    }

    #[tokio::test]
    async fn multiple_subscribers_each_receive_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ConversationEvent::ConversationReset);

        assert_eq!(rx1.recv().await.unwrap(), ConversationEvent::ConversationReset);
        assert_eq!(rx2.recv().await.unwrap(), ConversationEvent::ConversationReset);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::new(16);
        bus.publish(busy(true));
        bus.publish(busy(false));
        assert_eq!(bus.receiver_count(), 0);
    }

    #[test]
    fn events_arrive_in_publish_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(busy(true));
        bus.publish(ConversationEvent::Banner { text: None });
        bus.publish(busy(false));

        assert_eq!(rx.try_recv().unwrap(), busy(true));
        assert_eq!(rx.try_recv().unwrap(), ConversationEvent::Banner { text: None });
        assert_eq!(rx.try_recv().unwrap(), busy(false));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn clone_shares_channel() {
        let bus = EventBus::new(16);
        let bus2 = bus.clone();
        let mut rx = bus.subscribe();

        bus2.publish(busy(true));

        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn debug_impl() {
        let bus = EventBus::new(16);
        let _rx = bus.subscribe();
        let debug = format!("{bus:?}");
        assert!(debug.contains("EventBus"));
        assert!(debug.contains("receiver_count"));
    }
}
