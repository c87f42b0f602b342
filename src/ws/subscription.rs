//! Per-connection subscription manager.
//!
//! Tracks which event topics a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

/// Manages the set of topic subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed topics. If `subscribe_all` is true, this set is ignored.
    topics: HashSet<String>,
    /// Whether the client subscribes to all topics (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds topics to the subscription set. `"*"` enables the wildcard.
    pub fn subscribe(&mut self, topics: &[String], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        for topic in topics {
            self.topics.insert(topic.clone());
        }
    }

    /// Removes topics from the subscription set.
    pub fn unsubscribe(&mut self, topics: &[String]) {
        for topic in topics {
            self.topics.remove(topic);
        }
    }

    /// Returns `true` if the given topic matches the subscription filter.
    #[must_use]
    pub fn matches(&self, topic: &str) -> bool {
        self.subscribe_all || self.topics.contains(topic)
    }

    /// Returns the number of explicitly subscribed topics.
    #[must_use]
    pub fn count(&self) -> usize {
        self.topics.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
