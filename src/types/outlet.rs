// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet-related types for `WattBox` devices.
//!
//! The device numbers its outlets from 1, while every in-memory sequence in
//! this crate is indexed from 0. [`OutletId`] is the only place where that
//! offset is applied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Identifier of an outlet as used on the wire (1-based).
///
/// # Examples
///
/// ```
/// use wattbox_lib::types::OutletId;
///
/// let id = OutletId::new(3).unwrap();
/// assert_eq!(id.value(), 3);
/// assert_eq!(id.index(), 2);
///
/// assert_eq!(OutletId::from_index(0), OutletId::new(1).unwrap());
/// assert!(OutletId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct OutletId(u16);

impl OutletId {
    /// Creates an outlet id from its 1-based protocol value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidOutletId` for 0.
    pub fn new(id: u16) -> Result<Self, ValueError> {
        if id == 0 {
            return Err(ValueError::InvalidOutletId(id));
        }
        Ok(Self(id))
    }

    /// Creates an outlet id from a 0-based sequence index.
    ///
    /// Indexes past the `u16` range saturate at `u16::MAX`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u16::try_from(index.saturating_add(1)).unwrap_or(u16::MAX))
    }

    /// Returns the 1-based protocol value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns the 0-based index into outlet sequences.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for OutletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for OutletId {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OutletId> for u16 {
    fn from(id: OutletId) -> Self {
        id.0
    }
}

/// Reported state of an outlet.
///
/// `Unknown` is only a placeholder for "not polled yet"; the device itself
/// always reports on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutletState {
    /// No status has been received yet.
    #[default]
    Unknown,
    /// The outlet is switched off.
    Off,
    /// The outlet is switched on.
    On,
}

impl OutletState {
    /// Returns the numeric value used historically for this state.
    #[must_use]
    pub const fn as_num(&self) -> i8 {
        match self {
            Self::Unknown => -1,
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Returns `true` if the outlet is known to be on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns `true` if no status is known.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<bool> for OutletState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl fmt::Display for OutletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "UNKNOWN",
            Self::Off => "OFF",
            Self::On => "ON",
        };
        f.write_str(s)
    }
}

/// Action that can be applied to an outlet.
///
/// # Examples
///
/// ```
/// use wattbox_lib::types::OutletAction;
///
/// assert_eq!(OutletAction::Reset.as_str(), "RESET");
/// assert_eq!("toggle".parse::<OutletAction>().unwrap(), OutletAction::Toggle);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutletAction {
    /// Switch the outlet off.
    Off,
    /// Switch the outlet on.
    On,
    /// Invert the current state.
    Toggle,
    /// Power-cycle the outlet.
    Reset,
}

impl OutletAction {
    /// Returns the action name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Toggle => "TOGGLE",
            Self::Reset => "RESET",
        }
    }
}

impl fmt::Display for OutletAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutletAction {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" | "0" => Ok(Self::Off),
            "ON" | "1" => Ok(Self::On),
            "TOGGLE" | "2" => Ok(Self::Toggle),
            "RESET" | "3" => Ok(Self::Reset),
            _ => Err(ValueError::InvalidOutletAction(s.to_string())),
        }
    }
}

impl From<bool> for OutletAction {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
