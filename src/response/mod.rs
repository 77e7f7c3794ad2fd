// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reply decoding for `WattBox` protocol lines.
//!
//! Every reply is a single line. Queries are answered with `?Name=value`;
//! actions are answered with an acknowledgement, or with a line containing
//! `#Error` when the device rejects them.
//!
//! Firmware versions differ in what they send back, so most decoders fall
//! back to a safe default instead of failing the whole fetch:
//!
//! | Reply | Decoder | Fallback |
//! |-------|---------|----------|
//! | `?Model=`, `?ServiceTag=`, `?Firmware=` | [`parse_text`] | `"Unknown"` |
//! | `?OutletName=` | [`parse_outlet_names`] | empty list |
//! | `?UPSConnection=` | [`parse_flag`] | `false` |
//! | `?OutletStatus=` | [`parse_outlet_status`] | none, fails |
//! | `?OutletPowerStatus=` | [`parse_power_metrics`] | `None` |
//! | `?UPSStatus=` | [`parse_ups_status`] | `None` |

mod info;
mod power;
mod status;
mod ups;

pub use info::{UNKNOWN, parse_flag, parse_outlet_names, parse_text};
pub use power::parse_power_metrics;
pub use status::parse_outlet_status;
pub use ups::parse_ups_status;

use crate::command::Command;
use crate::error::Error;

/// Substring marking a rejected command.
pub const ERROR_MARKER: &str = "#Error";

/// A single reply line received from the device.
///
/// # Examples
///
/// ```
/// use wattbox_lib::response::Reply;
///
/// let reply = Reply::new("?Model=WB-800-IPVM-6");
/// assert_eq!(reply.value("Model"), Some("WB-800-IPVM-6"));
/// assert_eq!(reply.value("Firmware"), None);
/// assert!(!reply.is_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    line: String,
}

impl Reply {
    /// Creates a reply from a received line.
    #[must_use]
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// Returns the raw line.
    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Returns the value of a `?<name>=<value>` reply.
    ///
    /// The match is anchored on the command name, so a reply to a different
    /// query yields `None`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.line
            .trim()
            .strip_prefix('?')?
            .strip_prefix(name)?
            .strip_prefix('=')
            .map(str::trim)
    }

    /// Returns `true` if the reply carries the error marker.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.line.contains(ERROR_MARKER)
    }

    /// Checks the acknowledgement of an action command.
    ///
    /// Any reply without the error marker counts as success.
    ///
    /// # Errors
    ///
    /// Returns `Error::Command` if the device rejected `command`.
    pub fn acknowledge<C: Command + ?Sized>(&self, command: &C) -> Result<(), Error> {
        if self.is_error() {
            return Err(Error::Command(format!(
                "{} -> {}",
                command.to_line(),
                self.line.trim()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.line)
    }
}
