// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for `WattBox` device control.
//!
//! # Types
//!
//! - [`OutletId`] - 1-based outlet identifier with the index mapping
//! - [`OutletState`] - On/Off as reported by the device, or Unknown before polling
//! - [`OutletAction`] - Off/On/Toggle/Reset commands
//! - [`PowerMetrics`] - Per-outlet amps, watts and volts
//! - [`UpsMetrics`] - Battery readings from an attached UPS

mod metrics;
mod outlet;

pub use metrics::{PowerMetrics, UpsMetrics};
pub use outlet::{OutletAction, OutletId, OutletState};
