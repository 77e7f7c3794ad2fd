// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for periodic device status.
//!
//! The device never pushes updates, so status is polled. Any number of
//! subscribers can share one poll loop per device key; the loop runs while
//! at least one of them is registered.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`PollingHub`] - Runs poll loops and fans snapshots out to subscribers
//! - [`StatusSource`] - Where the hub gets its snapshots from
//! - [`Subscribable`] - Trait for handles that expose subscriptions

mod callback;
mod poller;
mod subscribable;

pub use callback::{StatusCallback, SubscriptionId};
pub use poller::{PollingHub, StatusSource};
pub use subscribable::Subscribable;
