// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `WattBox` command definitions.
//!
//! This module provides typed representations of the lines sent to the
//! device once a session is authenticated.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Example |
//! |-------------|---------|---------|
//! | [`Query`] | Read device information or status | `?Model`, `?OutletPowerStatus=2` |
//! | [`OutletSetCommand`] | Switch, toggle or reset an outlet | `!OutletSet=3,RESET` |
//! | [`ExitCommand`] | Log out and end the session | `!Exit` |
//!
//! # Command Structure
//!
//! Each line consists of:
//! - A prefix: `?` for queries, `!` for actions
//! - A command name (e.g., "Model", "OutletSet")
//! - Optional comma-separated arguments after `=`
//!
//! # Examples
//!
//! ```
//! use wattbox_lib::command::{Command, OutletSetCommand, Query};
//! use wattbox_lib::types::{OutletAction, OutletId};
//!
//! assert_eq!(Query::Model.to_line(), "?Model");
//!
//! let outlet = OutletId::new(3).unwrap();
//! assert_eq!(Query::OutletPowerStatus(outlet).to_line(), "?OutletPowerStatus=3");
//!
//! let set = OutletSetCommand::new(outlet, OutletAction::Reset);
//! assert_eq!(set.to_line(), "!OutletSet=3,RESET");
//! ```

mod action;
mod query;

pub use action::{ExitCommand, OutletSetCommand};
pub use query::Query;

/// Whether a command reads state or changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// A `?` query answered with `?Name=value`.
    Query,
    /// A `!` action answered with an acknowledgement or `#Error`.
    Action,
}

impl CommandKind {
    /// Returns the line prefix for this kind.
    #[must_use]
    pub const fn prefix(&self) -> char {
        match self {
            Self::Query => '?',
            Self::Action => '!',
        }
    }
}

/// A command that can be sent to a `WattBox` device.
pub trait Command {
    /// Returns whether this is a query or an action.
    fn kind(&self) -> CommandKind;

    /// Returns the command name without prefix, e.g. `"OutletSet"`.
    fn name(&self) -> &'static str;

    /// Returns the comma-joined arguments, if any.
    fn arguments(&self) -> Option<String>;

    /// Returns the protocol line without terminator.
    ///
    /// Format: `<prefix><name>` or `<prefix><name>=<arguments>`.
    fn to_line(&self) -> String {
        let prefix = self.kind().prefix();
        match self.arguments() {
            Some(args) => format!("{prefix}{}={args}", self.name()),
            None => format!("{prefix}{}", self.name()),
        }
    }
}
