// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static device information.

use serde::{Deserialize, Serialize};

use crate::types::OutletId;

/// Hardware description of a device.
///
/// The outlet count is always the length of [`outlet_names`](Self::outlet_names);
/// it is never assumed from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Model number, or `"Unknown"`.
    pub model: String,
    /// Service tag (serial number), or `"Unknown"`.
    pub service_tag: String,
    /// Firmware version, or `"Unknown"`.
    pub firmware: String,
    /// Outlet names in outlet order.
    pub outlet_names: Vec<String>,
    /// Whether a UPS is attached.
    pub ups_connected: bool,
}

impl DeviceInfo {
    /// Returns the number of outlets.
    #[must_use]
    pub fn outlet_count(&self) -> usize {
        self.outlet_names.len()
    }

    /// Returns the name of an outlet.
    #[must_use]
    pub fn outlet_name(&self, outlet: OutletId) -> Option<&str> {
        self.outlet_names.get(outlet.index()).map(String::as_str)
    }

    /// Returns the ids of all outlets in order.
    pub fn outlet_ids(&self) -> impl Iterator<Item = OutletId> + '_ {
        (0..self.outlet_names.len()).map(OutletId::from_index)
    }
}
