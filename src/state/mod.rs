// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device snapshot types.
//!
//! [`DeviceInfo`] describes the hardware and is fetched once by callers that
//! need it. [`DeviceStatus`] is rebuilt from scratch on every poll. Neither
//! is cached or mutated by this crate after construction.
//!
//! # Examples
//!
//! ```
//! use wattbox_lib::state::DeviceStatus;
//! use wattbox_lib::types::{OutletId, OutletState};
//!
//! let status = DeviceStatus::new(vec![OutletState::On, OutletState::Off]);
//! assert_eq!(status.outlet(OutletId::new(1).unwrap()), OutletState::On);
//! assert_eq!(status.outlet(OutletId::new(9).unwrap()), OutletState::Unknown);
//! ```

mod device_info;
mod device_status;

pub use device_info::DeviceInfo;
pub use device_status::DeviceStatus;
