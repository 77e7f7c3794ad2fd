// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power and UPS measurement types.

use serde::{Deserialize, Serialize};

/// Electrical readings for a single metered outlet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerMetrics {
    /// Current draw in Amperes.
    pub amps: f32,
    /// Power draw in Watts.
    pub watts: f32,
    /// Line voltage in Volts.
    pub volts: f32,
}

impl PowerMetrics {
    /// Creates a set of readings, clamping negative values to zero.
    #[must_use]
    pub fn new(amps: f32, watts: f32, volts: f32) -> Self {
        Self {
            amps: amps.max(0.0),
            watts: watts.max(0.0),
            volts: volts.max(0.0),
        }
    }
}

/// Battery backup readings reported by an attached UPS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsMetrics {
    /// Battery charge in percent (0-100).
    pub battery_charge: u8,
    /// Load on the battery in percent (0-100).
    pub battery_load: u8,
    /// Battery health as reported by the device, e.g. `Good`.
    pub battery_health: String,
    /// Whether mains power has been lost.
    pub power_lost: bool,
    /// Estimated remaining runtime in minutes.
    pub battery_runtime_minutes: u32,
    /// Whether the UPS alarm is enabled.
    pub alarm_enabled: bool,
    /// Whether the UPS alarm is muted.
    pub alarm_muted: bool,
}
