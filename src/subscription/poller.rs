// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic status polling with fan-out to subscribers.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::state::DeviceStatus;
use crate::subscription::callback::{CallbackRegistry, StatusCallback, SubscriptionId};

/// Something that can fetch a fresh [`DeviceStatus`].
///
/// Implemented by [`SessionManager`](crate::protocol::SessionManager); tests
/// substitute their own sources.
pub trait StatusSource: Send + Sync + 'static {
    /// Fetches the current status of the device.
    fn fetch_status(&self) -> impl Future<Output = Result<DeviceStatus>> + Send;
}

struct Shared<S> {
    source: Arc<S>,
    interval: Duration,
    registry: CallbackRegistry,
}

/// Polls a status source while anyone is subscribed and hands every
/// snapshot to the subscribers.
///
/// One poll loop runs per device key. It starts with the first subscriber,
/// fetches immediately and then once per interval, and stops at the first
/// tick that finds no subscribers. A snapshot is delivered only to
/// subscribers that were registered when its fetch began and still are when
/// it completes. Failed fetches are logged and retried at the next tick. A
/// panicking subscriber is logged and skipped; if the loop itself dies, the
/// next subscription starts a new one.
///
/// Poll loops only hold a weak reference to the hub; dropping the hub stops
/// them at their next tick.
///
/// Subscribing spawns onto the current Tokio runtime and must be called from
/// within one.
pub struct PollingHub<S> {
    shared: Arc<Shared<S>>,
}

impl<S: StatusSource> PollingHub<S> {
    /// Creates a hub polling `source` every `interval`.
    ///
    /// A zero interval is raised to one millisecond.
    #[must_use]
    pub fn new(source: Arc<S>, interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                interval: interval.max(Duration::from_millis(1)),
                registry: CallbackRegistry::new(),
            }),
        }
    }

    /// Returns the polling interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    /// Registers a callback for status snapshots of `device_key`.
    ///
    /// Starts the poll loop for that key if none is running.
    pub fn subscribe<F>(&self, device_key: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceStatus) + Send + Sync + 'static,
    {
        let callback: StatusCallback = Arc::new(callback);
        let (id, start) = self.shared.registry.register(device_key, callback);
        tracing::debug!(key = %device_key, subscription = %id, "Subscribed to status updates");

        if start {
            let shared = Arc::downgrade(&self.shared);
            let key = device_key.to_string();
            tokio::spawn(poll_loop(shared, key, self.shared.interval));
        }
        id
    }

    /// Removes a subscription. Returns `true` if it existed.
    ///
    /// The poll loop is not stopped here; it exits at its next tick if no
    /// subscribers remain.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.shared.registry.remove(id);
        if removed {
            tracing::debug!(subscription = %id, "Unsubscribed from status updates");
        }
        removed
    }

    /// Returns the number of subscribers for `device_key`.
    #[must_use]
    pub fn subscriber_count(&self, device_key: &str) -> usize {
        self.shared.registry.count(device_key)
    }

    /// Returns `true` while a poll loop is running for `device_key`.
    #[must_use]
    pub fn is_polling(&self, device_key: &str) -> bool {
        self.shared.registry.is_active(device_key)
    }
}

impl<S> std::fmt::Debug for PollingHub<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingHub")
            .field("interval", &self.shared.interval)
            .finish_non_exhaustive()
    }
}

/// Hands a key back to the registry if its poll loop dies without reaching
/// one of its normal exits.
struct LoopGuard<S> {
    shared: Weak<Shared<S>>,
    key: String,
    armed: bool,
}

impl<S> LoopGuard<S> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<S> Drop for LoopGuard<S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(shared) = self.shared.upgrade() {
            shared.registry.release(&self.key);
            tracing::warn!(key = %self.key, "Status polling aborted");
        }
    }
}

async fn poll_loop<S: StatusSource>(shared: Weak<Shared<S>>, key: String, period: Duration) {
    let mut guard = LoopGuard {
        shared: shared.clone(),
        key: key.clone(),
        armed: true,
    };
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::debug!(key = %key, "Status polling started");

    loop {
        ticker.tick().await;

        let Some(shared) = shared.upgrade() else {
            guard.disarm();
            tracing::debug!(key = %key, "Hub dropped, status polling stopped");
            return;
        };
        // begin_cycle has already released the key when it returns None, and
        // a new loop may own it by the time the guard drops.
        let Some(expected) = shared.registry.begin_cycle(&key) else {
            guard.disarm();
            tracing::debug!(key = %key, "No subscribers left, status polling stopped");
            return;
        };

        match shared.source.fetch_status().await {
            Ok(status) => {
                for callback in shared.registry.snapshot(&key, &expected) {
                    if panic::catch_unwind(AssertUnwindSafe(|| callback(&status))).is_err() {
                        tracing::warn!(key = %key, "Status subscriber panicked");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Status poll failed");
            }
        }
    }
}
