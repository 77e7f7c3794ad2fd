// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telnet protocol layer for communicating with `WattBox` devices.
//!
//! # Layers
//!
//! - [`LineTransport`]: one TCP connection, line-oriented reads and writes
//! - [`Session`]: login handshake and command/reply exchange
//! - [`SessionManager`]: one session at a time per device, with guaranteed
//!   logout
//!
//! # Wire format
//!
//! Lines are terminated by `\n`. After connecting, the device prompts for
//! `Username:` and `Password:`; a line containing `Invalid` means the login
//! was refused. Once logged in, `?Name` queries are answered with
//! `?Name=value` and `!Name=args` actions with an acknowledgement or
//! `#Error`. The session ends with `!Exit`.

mod manager;
mod session;
mod transport;

pub use manager::{SessionManager, UnitOfWork};
pub use session::{INVALID_LOGIN_MARKER, PASSWORD_PROMPT, Session, SessionState, USERNAME_PROMPT};
pub use transport::{LINE_TERMINATOR, LineTransport};
