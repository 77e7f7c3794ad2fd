// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `WattBox` Lib - A Rust library to control `WattBox` power distribution units.
//!
//! This library provides async APIs to query and switch the outlets of a
//! `WattBox` over its line-oriented telnet protocol.
//!
//! # Supported Features
//!
//! - **Device information**: Model, service tag, firmware, outlet names
//! - **Outlet control**: On, off, toggle and reset (power cycle)
//! - **Status queries**: Outlet states, per-outlet power metering, UPS battery
//! - **Status subscriptions**: Periodic polling shared by any number of callbacks
//!
//! # Connection Model
//!
//! The device accepts one telnet session at a time. Every operation opens a
//! session, logs in, runs its commands and logs out, while holding a
//! per-device lock so that concurrent callers queue up instead of
//! interleaving on the wire.
//!
//! # Quick Start
//!
//! ```no_run
//! use wattbox_lib::{DeviceConfig, WattBoxDevice};
//! use wattbox_lib::types::{OutletAction, OutletId};
//!
//! #[tokio::main]
//! async fn main() -> wattbox_lib::Result<()> {
//!     let device = WattBoxDevice::new(DeviceConfig::new("192.168.1.50"))?;
//!
//!     let info = device.get_device_info().await?;
//!     println!("{} ({}), firmware {}", info.model, info.service_tag, info.firmware);
//!
//!     let status = device.get_device_status().await?;
//!     for (name, state) in info.outlet_names.iter().zip(&status.outlet_status) {
//!         println!("{name}: {state}");
//!     }
//!
//!     device
//!         .set_outlet_action(OutletId::new(1)?, OutletAction::Toggle)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Status Subscriptions
//!
//! ```no_run
//! use std::time::Duration;
//! use wattbox_lib::{DeviceConfig, WattBoxDevice, subscription::Subscribable};
//!
//! #[tokio::main]
//! async fn main() -> wattbox_lib::Result<()> {
//!     let config = DeviceConfig::new("192.168.1.50").with_poll_interval(Duration::from_secs(15));
//!     let device = WattBoxDevice::new(config)?;
//!     let info = device.get_device_info().await?;
//!
//!     device.subscribe(&info.service_tag, |status| {
//!         println!("power lost: {:?}", status.power_lost);
//!     });
//!
//!     tokio::time::sleep(Duration::from_secs(60)).await;
//!     Ok(())
//! }
//! ```

pub mod command;
mod config;
mod device;
pub mod error;
pub mod protocol;
pub mod response;
pub mod state;
pub mod subscription;
pub mod types;

pub use command::{Command, ExitCommand, OutletSetCommand, Query};
pub use config::DeviceConfig;
pub use device::WattBoxDevice;
pub use error::{Error, ProtocolError, Result, TransportError, ValueError};
pub use protocol::{SessionManager, SessionState};
pub use state::{DeviceInfo, DeviceStatus};
pub use subscription::{PollingHub, StatusSource, Subscribable, SubscriptionId};
pub use types::{OutletAction, OutletId, OutletState, PowerMetrics, UpsMetrics};
