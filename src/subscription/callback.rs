// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscriber bookkeeping for status polling.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Callbacks grouped by device key

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::state::DeviceStatus;

/// Unique identifier for a subscription.
///
/// Returned when subscribing and used to unsubscribe later. IDs are never
/// reused within a hub's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Callback receiving each polled status snapshot.
pub type StatusCallback = Arc<dyn Fn(&DeviceStatus) + Send + Sync>;

/// Subscribers of one device key.
#[derive(Default)]
struct Topic {
    subscribers: BTreeMap<SubscriptionId, StatusCallback>,
    /// Set while a poll loop owns this key.
    polling: bool,
}

#[derive(Default)]
struct Registry {
    topics: HashMap<String, Topic>,
    /// Device key of each subscription.
    owners: HashMap<SubscriptionId, String>,
}

/// Registry of status callbacks shared by subscribers and poll loops.
///
/// All operations take a single `parking_lot` lock, so a poll loop deciding
/// whether to stop cannot race a new subscriber deciding whether to start
/// one.
pub(crate) struct CallbackRegistry {
    next_id: AtomicU64,
    inner: Mutex<Registry>,
}

impl CallbackRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inner: Mutex::new(Registry::default()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback under `key`.
    ///
    /// The returned flag is `true` when no poll loop is running for `key`
    /// and the caller must start one.
    pub(crate) fn register(&self, key: &str, callback: StatusCallback) -> (SubscriptionId, bool) {
        let id = self.next_id();
        let mut inner = self.inner.lock();

        let topic = inner.topics.entry(key.to_string()).or_default();
        topic.subscribers.insert(id, callback);
        let start = !topic.polling;
        topic.polling = true;

        inner.owners.insert(id, key.to_string());
        (id, start)
    }

    /// Removes a subscription. Returns `true` if it existed.
    ///
    /// The poll loop keeps its key even when the last subscriber leaves; it
    /// notices at its next cycle.
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let Some(key) = inner.owners.remove(&id) else {
            return false;
        };
        let Some(topic) = inner.topics.get_mut(&key) else {
            return false;
        };
        let removed = topic.subscribers.remove(&id).is_some();
        if topic.subscribers.is_empty() && !topic.polling {
            inner.topics.remove(&key);
        }
        removed
    }

    /// Starts a poll cycle for `key`.
    ///
    /// Returns the ids subscribed right now, or `None` if there are none, in
    /// which case the key is released and the loop must exit.
    pub(crate) fn begin_cycle(&self, key: &str) -> Option<Vec<SubscriptionId>> {
        let mut inner = self.inner.lock();
        match inner.topics.get(key) {
            Some(topic) if !topic.subscribers.is_empty() => {
                Some(topic.subscribers.keys().copied().collect())
            }
            _ => {
                inner.topics.remove(key);
                None
            }
        }
    }

    /// Marks the poll loop of `key` as gone while keeping its subscribers,
    /// so the next subscription starts a new loop.
    pub(crate) fn release(&self, key: &str) {
        let mut inner = self.inner.lock();
        if let Some(topic) = inner.topics.get_mut(key) {
            topic.polling = false;
            if topic.subscribers.is_empty() {
                inner.topics.remove(key);
            }
        }
    }

    /// Returns the callbacks that were in `expected` and are still
    /// subscribed.
    pub(crate) fn snapshot(&self, key: &str, expected: &[SubscriptionId]) -> Vec<StatusCallback> {
        let inner = self.inner.lock();
        let Some(topic) = inner.topics.get(key) else {
            return Vec::new();
        };
        expected
            .iter()
            .filter_map(|id| topic.subscribers.get(id).cloned())
            .collect()
    }

    /// Returns the number of subscribers for `key`.
    pub(crate) fn count(&self, key: &str) -> usize {
        self.inner
            .lock()
            .topics
            .get(key)
            .map_or(0, |topic| topic.subscribers.len())
    }

    /// Returns `true` while a poll loop owns `key`.
    pub(crate) fn is_active(&self, key: &str) -> bool {
        self.inner
            .lock()
            .topics
            .get(key)
            .is_some_and(|topic| topic.polling)
    }
}
