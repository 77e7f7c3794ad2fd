// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet power metering reply decoding.

use crate::command::{Command, Query};
use crate::response::Reply;
use crate::types::{OutletId, PowerMetrics};

// Field positions after the name: outlet id, watts, amps, volts.
const FIELD_OUTLET: usize = 0;
const FIELD_WATTS: usize = 1;
const FIELD_AMPS: usize = 2;
const FIELD_VOLTS: usize = 3;
const FIELD_COUNT: usize = 4;

/// Decodes `?OutletPowerStatus=<id>,<watts>,<amps>,<volts>`.
///
/// Returns `None` when the reply does not match, echoes a different outlet,
/// or carries non-numeric fields. Models without per-outlet metering answer
/// with an error line, which also yields `None`.
///
/// # Examples
///
/// ```
/// use wattbox_lib::response::{Reply, parse_power_metrics};
/// use wattbox_lib::types::OutletId;
///
/// let outlet = OutletId::new(1).unwrap();
/// let reply = Reply::new("?OutletPowerStatus=1,60.50,0.52,116.30");
/// let metrics = parse_power_metrics(&reply, outlet).unwrap();
/// assert!((metrics.watts - 60.5).abs() < 1e-3);
/// assert!((metrics.amps - 0.52).abs() < 1e-3);
/// assert!((metrics.volts - 116.3).abs() < 1e-3);
/// ```
#[must_use]
pub fn parse_power_metrics(reply: &Reply, outlet: OutletId) -> Option<PowerMetrics> {
    let value = reply.value(Query::OutletPowerStatus(outlet).name())?;
    let fields: Vec<&str> = value.split(',').map(str::trim).collect();
    if fields.len() < FIELD_COUNT {
        return None;
    }

    let echoed: u16 = fields[FIELD_OUTLET].parse().ok()?;
    if echoed != outlet.value() {
        return None;
    }

    let watts: f32 = fields[FIELD_WATTS].parse().ok()?;
    let amps: f32 = fields[FIELD_AMPS].parse().ok()?;
    let volts: f32 = fields[FIELD_VOLTS].parse().ok()?;

    Some(PowerMetrics::new(amps, watts, volts))
}
