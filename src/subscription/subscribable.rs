// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for handles that deliver polled status.

use crate::state::DeviceStatus;
use crate::subscription::SubscriptionId;

/// Trait for types that deliver periodic status snapshots to callbacks.
///
/// # Examples
///
/// ```no_run
/// use wattbox_lib::{DeviceConfig, WattBoxDevice};
/// use wattbox_lib::subscription::Subscribable;
///
/// # async fn example() -> wattbox_lib::Result<()> {
/// let device = WattBoxDevice::new(DeviceConfig::new("192.168.1.50"))?;
/// let info = device.get_device_info().await?;
///
/// let sub_id = device.subscribe(&info.service_tag, |status| {
///     println!("{} outlets, battery {:?}", status.outlet_count(), status.battery_level);
/// });
///
/// // Polling stops at the next tick after the last unsubscribe
/// device.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to status snapshots for `device_key`.
    ///
    /// Polling for that key starts with its first subscriber.
    fn subscribe<F>(&self, device_key: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceStatus) + Send + Sync + 'static;

    /// Unsubscribes a callback. Returns `true` if it was registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
