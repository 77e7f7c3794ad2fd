// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoders for device information replies.

use crate::command::{Command, Query};
use crate::response::Reply;

/// Placeholder for text fields the device did not report.
pub const UNKNOWN: &str = "Unknown";

/// Decodes a free-text reply such as `?Model=WB-800-IPVM-6`.
///
/// Returns [`UNKNOWN`] if the reply does not match `query` or is empty.
#[must_use]
pub fn parse_text(reply: &Reply, query: Query) -> String {
    match reply.value(query.name()) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Decodes `?OutletName="Outlet 1","Outlet 2"` into the ordered name list.
///
/// One leading and one trailing quote is stripped from each element.
/// Returns an empty list if the reply does not match.
///
/// # Examples
///
/// ```
/// use wattbox_lib::response::{Reply, parse_outlet_names};
///
/// let reply = Reply::new(r#"?OutletName="Outlet 1","Outlet 2","Outlet 3""#);
/// assert_eq!(parse_outlet_names(&reply), ["Outlet 1", "Outlet 2", "Outlet 3"]);
/// ```
#[must_use]
pub fn parse_outlet_names(reply: &Reply) -> Vec<String> {
    let Some(value) = reply.value(Query::OutletName.name()) else {
        return Vec::new();
    };
    if value.is_empty() {
        return Vec::new();
    }

    value
        .split(',')
        .map(|name| {
            let name = name.strip_prefix('"').unwrap_or(name);
            let name = name.strip_suffix('"').unwrap_or(name);
            name.to_string()
        })
        .collect()
}

/// Decodes a boolean reply such as `?UPSConnection=1`.
///
/// Returns `false` if the reply does not match or the value is not a
/// recognized truthy token.
#[must_use]
pub fn parse_flag(reply: &Reply, query: Query) -> bool {
    reply
        .value(query.name())
        .and_then(parse_bool)
        .unwrap_or(false)
}

/// Parses `1`/`0` and `true`/`false` (any case).
pub(crate) fn parse_bool(token: &str) -> Option<bool> {
    let token = token.trim();
    if token == "1" || token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token == "0" || token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
