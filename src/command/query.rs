// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Query commands.

use crate::command::{Command, CommandKind};
use crate::types::OutletId;

/// Queries understood by the device.
///
/// The first five are used to build a [`DeviceInfo`](crate::state::DeviceInfo),
/// the rest to build a [`DeviceStatus`](crate::state::DeviceStatus).
///
/// # Examples
///
/// ```
/// use wattbox_lib::command::{Command, Query};
///
/// assert_eq!(Query::ServiceTag.to_line(), "?ServiceTag");
/// assert_eq!(Query::UpsConnection.name(), "UPSConnection");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    /// Model number, e.g. `WB-800-IPVM-6`.
    Model,
    /// Service tag (serial number).
    ServiceTag,
    /// Firmware version.
    Firmware,
    /// Quoted, comma-joined outlet names.
    OutletName,
    /// Whether a UPS is attached (`0`/`1`).
    UpsConnection,
    /// Comma-joined `0`/`1` state of every outlet.
    OutletStatus,
    /// Battery readings of the attached UPS.
    UpsStatus,
    /// Power readings of one metered outlet.
    OutletPowerStatus(OutletId),
}

impl Command for Query {
    fn kind(&self) -> CommandKind {
        CommandKind::Query
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Model => "Model",
            Self::ServiceTag => "ServiceTag",
            Self::Firmware => "Firmware",
            Self::OutletName => "OutletName",
            Self::UpsConnection => "UPSConnection",
            Self::OutletStatus => "OutletStatus",
            Self::UpsStatus => "UPSStatus",
            Self::OutletPowerStatus(_) => "OutletPowerStatus",
        }
    }

    fn arguments(&self) -> Option<String> {
        match self {
            Self::OutletPowerStatus(outlet) => Some(outlet.to_string()),
            _ => None,
        }
    }
}
