// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device abstraction for `WattBox` power distribution units.
//!
//! Every call on [`WattBoxDevice`] is one unit of work: it waits for
//! exclusive access to the device, logs in on a fresh connection, runs its
//! commands and logs out again. Nothing is cached between calls.
//!
//! ```no_run
//! use wattbox_lib::{DeviceConfig, WattBoxDevice};
//! use wattbox_lib::types::{OutletAction, OutletId};
//!
//! # async fn example() -> wattbox_lib::Result<()> {
//! let device = WattBoxDevice::new(
//!     DeviceConfig::new("192.168.1.50").with_credentials("admin", "secret"),
//! )?;
//! device.connect().await?;
//!
//! let info = device.get_device_info().await?;
//! println!("{} with {} outlets", info.model, info.outlet_count());
//!
//! device
//!     .set_outlet_action(OutletId::new(3)?, OutletAction::Reset)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::config::DeviceConfig;
use crate::error::{Result, ValueError};
use crate::protocol::SessionManager;
use crate::state::{DeviceInfo, DeviceStatus};
use crate::subscription::{PollingHub, StatusSource, Subscribable, SubscriptionId};
use crate::types::{OutletAction, OutletId, OutletState, UpsMetrics};

impl StatusSource for SessionManager {
    async fn fetch_status(&self) -> Result<DeviceStatus> {
        self.run_exclusive(|session| Box::pin(session.device_status()))
            .await
    }
}

/// A `WattBox` device reachable over telnet.
///
/// Cloning is cheap; clones share the session lock and the status
/// subscriptions. Poll loops stop once the last clone is dropped.
#[derive(Debug, Clone)]
pub struct WattBoxDevice {
    sessions: Arc<SessionManager>,
    hub: Arc<PollingHub<SessionManager>>,
}

impl WattBoxDevice {
    /// Creates a device handle without connecting.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if `config` fails validation.
    pub fn new(config: DeviceConfig) -> Result<Self> {
        config.validate()?;
        let interval = config.poll_interval();
        let sessions = Arc::new(SessionManager::new(config));
        let hub = Arc::new(PollingHub::new(Arc::clone(&sessions), interval));
        Ok(Self { sessions, hub })
    }

    /// Returns the device configuration.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        self.sessions.config()
    }

    /// Verifies that the device is reachable and accepts the credentials.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` or `Error::Authentication`.
    pub async fn connect(&self) -> Result<()> {
        self.sessions.check_connection().await
    }

    /// Reads model, service tag, firmware, outlet names and UPS presence.
    ///
    /// Fields the device does not answer fall back to `"Unknown"`, an empty
    /// name list and `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be opened or breaks.
    pub async fn get_device_info(&self) -> Result<DeviceInfo> {
        self.sessions
            .run_exclusive(|session| Box::pin(session.device_info()))
            .await
    }

    /// Reads outlet states, per-outlet metering and UPS readings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the outlet status reply is malformed.
    pub async fn get_device_status(&self) -> Result<DeviceStatus> {
        self.sessions
            .run_exclusive(|session| Box::pin(session.device_status()))
            .await
    }

    /// Reads the state of a single outlet.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutletOutOfRange` if the device has fewer
    /// outlets than `outlet`.
    pub async fn get_outlet_state(&self, outlet: OutletId) -> Result<OutletState> {
        let states = self
            .sessions
            .run_exclusive(|session| Box::pin(session.outlet_status()))
            .await?;

        states.get(outlet.index()).copied().ok_or_else(|| {
            ValueError::OutletOutOfRange {
                id: outlet.value(),
                count: states.len(),
            }
            .into()
        })
    }

    /// Reads the attached UPS, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be opened or breaks.
    pub async fn get_ups_metrics(&self) -> Result<Option<UpsMetrics>> {
        self.sessions
            .run_exclusive(|session| Box::pin(session.ups_metrics()))
            .await
    }

    /// Switches, toggles or power-cycles an outlet.
    ///
    /// # Errors
    ///
    /// Returns `Error::Command` if the device rejects the action.
    pub async fn set_outlet_action(&self, outlet: OutletId, action: OutletAction) -> Result<()> {
        self.sessions
            .run_exclusive(move |session| Box::pin(session.set_outlet(outlet, action)))
            .await
    }

    /// Returns the number of status subscribers for `device_key`.
    #[must_use]
    pub fn subscriber_count(&self, device_key: &str) -> usize {
        self.hub.subscriber_count(device_key)
    }

    /// Returns `true` while status is being polled for `device_key`.
    #[must_use]
    pub fn is_polling(&self, device_key: &str) -> bool {
        self.hub.is_polling(device_key)
    }
}

impl Subscribable for WattBoxDevice {
    fn subscribe<F>(&self, device_key: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceStatus) + Send + Sync + 'static,
    {
        self.hub.subscribe(device_key, callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.hub.unsubscribe(id)
    }
}
