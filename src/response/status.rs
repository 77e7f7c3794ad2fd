// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet status reply decoding.

use crate::command::{Command, Query};
use crate::error::ProtocolError;
use crate::response::Reply;
use crate::types::OutletState;

/// Decodes `?OutletStatus=1,0,1,1` into one state per outlet.
///
/// Element `i` describes outlet `i + 1`. Any nonzero token means on.
///
/// # Errors
///
/// Returns `ProtocolError::UnexpectedReply` if the reply does not match or a
/// token is not an integer. There is no safe default for outlet states.
///
/// # Examples
///
/// ```
/// use wattbox_lib::response::{Reply, parse_outlet_status};
/// use wattbox_lib::types::{OutletId, OutletState};
///
/// let states = parse_outlet_status(&Reply::new("?OutletStatus=1,0,1,1")).unwrap();
/// let third = OutletId::new(3).unwrap();
/// assert_eq!(states[third.index()], OutletState::On);
/// ```
pub fn parse_outlet_status(reply: &Reply) -> Result<Vec<OutletState>, ProtocolError> {
    let query = Query::OutletStatus;
    let unexpected = || ProtocolError::UnexpectedReply {
        command: query.to_line(),
        reply: reply.line().to_string(),
    };

    let value = reply.value(query.name()).ok_or_else(unexpected)?;
    if value.is_empty() {
        return Ok(Vec::new());
    }

    value
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<i64>()
                .map(|n| OutletState::from(n != 0))
                .map_err(|_| unexpected())
        })
        .collect()
}
