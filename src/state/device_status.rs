// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-in-time device status.

use serde::{Deserialize, Serialize};

use crate::types::{OutletId, OutletState, PowerMetrics, UpsMetrics};

/// Status of every outlet plus optional metering and UPS readings.
///
/// Sequences are indexed from 0; use [`outlet`](Self::outlet) and
/// [`outlet_power`](Self::outlet_power) to look up by protocol id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// State of each outlet, index = outlet id - 1.
    pub outlet_status: Vec<OutletState>,
    /// Readings of each outlet on models with per-outlet metering.
    pub outlet_power: Option<Vec<PowerMetrics>>,
    /// UPS battery charge in percent, taken from the charge field of the UPS
    /// status and never from its load field.
    pub battery_level: Option<u8>,
    /// Whether the UPS reports a mains power loss.
    pub power_lost: Option<bool>,
}

impl DeviceStatus {
    /// Creates a status holding only outlet states.
    #[must_use]
    pub fn new(outlet_status: Vec<OutletState>) -> Self {
        Self {
            outlet_status,
            ..Self::default()
        }
    }

    /// Adds per-outlet metering.
    #[must_use]
    pub fn with_outlet_power(mut self, outlet_power: Vec<PowerMetrics>) -> Self {
        self.outlet_power = Some(outlet_power);
        self
    }

    /// Adds UPS readings.
    #[must_use]
    pub fn with_ups(mut self, ups: &UpsMetrics) -> Self {
        self.battery_level = Some(ups.battery_charge);
        self.power_lost = Some(ups.power_lost);
        self
    }

    /// Returns the number of outlets.
    #[must_use]
    pub fn outlet_count(&self) -> usize {
        self.outlet_status.len()
    }

    /// Returns the state of an outlet, or `Unknown` if the device did not
    /// report that many outlets.
    #[must_use]
    pub fn outlet(&self, outlet: OutletId) -> OutletState {
        self.outlet_status
            .get(outlet.index())
            .copied()
            .unwrap_or_default()
    }

    /// Returns the power readings of an outlet, if metered.
    #[must_use]
    pub fn outlet_power(&self, outlet: OutletId) -> Option<PowerMetrics> {
        self.outlet_power.as_ref()?.get(outlet.index()).copied()
    }
}
