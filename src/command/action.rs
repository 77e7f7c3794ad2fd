// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Action commands.

use crate::command::{Command, CommandKind};
use crate::types::{OutletAction, OutletId};

/// Command to apply an action to one outlet.
///
/// # Examples
///
/// ```
/// use wattbox_lib::command::{Command, OutletSetCommand};
/// use wattbox_lib::types::{OutletAction, OutletId};
///
/// let cmd = OutletSetCommand::new(OutletId::new(2).unwrap(), OutletAction::Toggle);
/// assert_eq!(cmd.name(), "OutletSet");
/// assert_eq!(cmd.arguments(), Some("2,TOGGLE".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutletSetCommand {
    outlet: OutletId,
    action: OutletAction,
}

impl OutletSetCommand {
    /// Creates a command applying `action` to `outlet`.
    #[must_use]
    pub const fn new(outlet: OutletId, action: OutletAction) -> Self {
        Self { outlet, action }
    }

    /// Returns the target outlet.
    #[must_use]
    pub const fn outlet(&self) -> OutletId {
        self.outlet
    }

    /// Returns the action.
    #[must_use]
    pub const fn action(&self) -> OutletAction {
        self.action
    }
}

impl Command for OutletSetCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Action
    }

    fn name(&self) -> &'static str {
        "OutletSet"
    }

    fn arguments(&self) -> Option<String> {
        Some(format!("{},{}", self.outlet, self.action.as_str()))
    }
}

/// Command that ends the session on the device side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitCommand;

impl Command for ExitCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Action
    }

    fn name(&self) -> &'static str {
        "Exit"
    }

    fn arguments(&self) -> Option<String> {
        None
    }
}
