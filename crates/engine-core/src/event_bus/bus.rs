use model::events::Event;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{
    RwLock,
    mpsc::{self, error::TrySendError},
};
use tracing::{debug, warn};

/// A subscription handle that can be used to unsubscribe from events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    subscriber_id: u64,
}

/// Fan-out of one event type to any number of channel subscribers.
///
/// Publishing never waits on a subscriber: an event that does not fit in a
/// subscriber's channel is dropped for that subscriber, and subscribers whose
/// receiver was dropped are pruned.
pub struct EventBus<E> {
    subscribers: Arc<RwLock<HashMap<u64, mpsc::Sender<Arc<E>>>>>,
    next_id: Arc<RwLock<u64>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        EventBus {
            subscribers: self.subscribers.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

impl<E: Event> EventBus<E> {
    pub fn new() -> Self {
        EventBus {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(RwLock::new(0)),
        }
    }

    pub async fn subscribe(&self, capacity: usize) -> (Subscription, mpsc::Receiver<Arc<E>>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        // Generate a unique subscriber ID
        let subscriber_id = {
            let mut id_lock = self.next_id.write().await;
            let id = *id_lock;
            *id_lock += 1;
            id
        };

        self.subscribers.write().await.insert(subscriber_id, sender);
        debug!(
            event_type = std::any::type_name::<E>(),
            subscriber_id, "Subscribed to event"
        );

        (Subscription { subscriber_id }, receiver)
    }

    pub async fn publish(&self, event: E) {
        let event_type = event.event_type();
        let event = Arc::new(event);
        let mut closed = Vec::new();

        {
            let subscribers = self.subscribers.read().await;
            debug!(
                event_type,
                subscriber_count = subscribers.len(),
                "Publishing event"
            );

            for (subscriber_id, sender) in subscribers.iter() {
                match sender.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        warn!(
                            event_type,
                            subscriber_id, "Subscriber channel full, dropping event"
                        );
                    }
                    Err(TrySendError::Closed(_)) => {
                        warn!(
                            event_type,
                            subscriber_id, "Subscriber receiver dropped, removing it"
                        );
                        closed.push(*subscriber_id);
                    }
                }
            }
        }

        if !closed.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for subscriber_id in closed {
                subscribers.remove(&subscriber_id);
            }
        }
    }

    pub async fn unsubscribe(&self, subscription: Subscription) {
        let removed = self
            .subscribers
            .write()
            .await
            .remove(&subscription.subscriber_id);

        if removed.is_some() {
            debug!(
                subscriber_id = subscription.subscriber_id,
                "Unsubscribed from event"
            );
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Drops every sender; receivers see the end of their stream.
    pub async fn clear(&self) {
        self.subscribers.write().await.clear();
        debug!("Cleared all subscriptions from EventBus");
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}
