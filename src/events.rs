//! Domain events and their in-process fan-out
//!
//! Events are delivered synchronously on the tailer's task, in registration
//! order, before the next line is read. There is no buffering and no
//! isolation: a slow subscriber slows the tailing loop down with it.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Events emitted by the correlation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// The lobby killer's stable platform identity became known
    KillerIdentityResolved {
        persistent_id: String,
        session_id: String,
    },
    /// The killer's character was identified from an outfit line
    KillerCharacterDetected { character: String },
}

/// Handle returned by [`EventPublisher::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&DomainEvent) + Send + Sync>;

/// Synchronous fan-out of domain events to registered subscribers.
///
/// Subscribing and unsubscribing are safe from any thread; delivery happens
/// on whichever thread calls [`publish`](Self::publish).
pub struct EventPublisher {
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a subscriber; it receives every event published afterwards.
    pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.subscribers.write().push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Removing an unknown id is a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.write().retain(|(sid, _)| *sid != id);
    }

    /// Deliver `event` to every current subscriber, in registration order.
    pub fn publish(&self, event: &DomainEvent) {
        for (_, subscriber) in self.subscribers.read().iter() {
            subscriber(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn character_event() -> DomainEvent {
        DomainEvent::KillerCharacterDetected {
            character: "Spirit".to_string(),
        }
    }

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let publisher = EventPublisher::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = Arc::clone(&count);
            publisher.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        publisher.publish(&character_event());
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let publisher = EventPublisher::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for i in 0..3 {
            let order = Arc::clone(&order);
            publisher.subscribe(move |_| order.lock().push(i));
        }

        publisher.publish(&character_event());
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let publisher = EventPublisher::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        let id = publisher.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        publisher.publish(&character_event());
        publisher.unsubscribe(id);
        publisher.publish(&character_event());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribe_from_another_thread() {
        let publisher = Arc::new(EventPublisher::new());
        let count = Arc::new(AtomicUsize::new(0));

        let p = Arc::clone(&publisher);
        let c = Arc::clone(&count);
        std::thread::spawn(move || {
            p.subscribe(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            });
        })
        .join()
        .unwrap();

        publisher.publish(&character_event());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
