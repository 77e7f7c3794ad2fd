// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UPS status reply decoding.

use crate::command::{Command, Query};
use crate::response::Reply;
use crate::response::info::parse_bool;
use crate::types::UpsMetrics;

/// Decodes `?UPSStatus=<charge>,<load>,<health>,<power lost>,<runtime>,<alarm enabled>,<alarm muted>`.
///
/// Returns `None` when no UPS is attached or the reply is malformed.
///
/// # Examples
///
/// ```
/// use wattbox_lib::response::{Reply, parse_ups_status};
///
/// let reply = Reply::new("?UPSStatus=50,0,Good,False,25,True,False");
/// let ups = parse_ups_status(&reply).unwrap();
/// assert_eq!(ups.battery_charge, 50);
/// assert!(!ups.power_lost);
/// ```
#[must_use]
pub fn parse_ups_status(reply: &Reply) -> Option<UpsMetrics> {
    let value = reply.value(Query::UpsStatus.name())?;
    let fields: Vec<&str> = value.split(',').map(str::trim).collect();
    let [charge, load, health, power_lost, runtime, alarm_enabled, alarm_muted] = fields[..]
    else {
        return None;
    };

    Some(UpsMetrics {
        battery_charge: parse_percent(charge)?,
        battery_load: parse_percent(load)?,
        battery_health: health.to_string(),
        power_lost: parse_bool(power_lost)?,
        battery_runtime_minutes: runtime.parse().ok()?,
        alarm_enabled: parse_bool(alarm_enabled)?,
        alarm_muted: parse_bool(alarm_muted)?,
    })
}

fn parse_percent(token: &str) -> Option<u8> {
    token.parse::<u8>().ok().map(|n| n.min(100))
}
