//! Shared camera/scroll state.
//!
//! The session is the only writer. Consumers either read the latest snapshot
//! or subscribe and get called after every publish.

use std::fmt;

use crate::models::snapshot::TourSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Subscriber = Box<dyn FnMut(&TourSnapshot) + Send>;

pub struct StatePublisher {
    latest: TourSnapshot,
    next_id: u64,
    subscribers: Vec<(SubscriberId, Subscriber)>,
}

impl fmt::Debug for StatePublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatePublisher")
            .field("latest", &self.latest)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl StatePublisher {
    pub fn new(initial: TourSnapshot) -> Self {
        Self {
            latest: initial,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn latest(&self) -> TourSnapshot {
        self.latest
    }

    /// Stores `snapshot` and notifies subscribers in subscription order.
    pub fn publish(&mut self, snapshot: TourSnapshot) -> TourSnapshot {
        self.latest = snapshot;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&snapshot);
        }
        snapshot
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriberId
    where
        F: FnMut(&TourSnapshot) + Send + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
