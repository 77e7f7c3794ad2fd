// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `WattBox` library.
//!
//! Failures are grouped by where they originate: the TCP transport, the
//! login handshake, reply decoding, and the device rejecting an action.
//! None of them is fatal; each one is scoped to a single unit of work.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport failed while connecting, reading or writing.
    #[error("connection error: {0}")]
    Connection(#[from] TransportError),

    /// The device refused the configured credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A reply could not be understood and no fallback applies.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The device explicitly rejected an action command.
    #[error("command rejected: {0}")]
    Command(String),

    /// A value was outside its allowed range.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The device configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Errors raised by the line transport.
///
/// Read timeouts are reported separately from I/O failures so callers can
/// tell a silent device apart from a broken socket.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The TCP connection could not be established.
    #[error("failed to connect to {address}: {source}")]
    Connect {
        /// The `host:port` that was dialed.
        address: String,
        /// The underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// The TCP connection was not established in time.
    #[error("connecting to {address} timed out after {millis} ms")]
    ConnectTimeout {
        /// The `host:port` that was dialed.
        address: String,
        /// The timeout that elapsed.
        millis: u64,
    },

    /// Reading or writing the socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No data arrived before the read timeout elapsed.
    #[error("read timed out after {0} ms")]
    Timeout(u64),

    /// The device closed the connection.
    #[error("connection closed by device")]
    Closed,
}

/// Errors related to the shape of device replies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A reply did not match the expected `?Name=value` form.
    #[error("unexpected reply to {command}: {reply:?}")]
    UnexpectedReply {
        /// The command whose reply was being decoded.
        command: String,
        /// The raw reply line.
        reply: String,
    },

    /// A command was issued before the login handshake completed.
    #[error("session is not authenticated")]
    NotAuthenticated,
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Outlet identifiers start at 1.
    #[error("invalid outlet id {0}, outlet ids start at 1")]
    InvalidOutletId(u16),

    /// An outlet action name was not recognized.
    #[error("invalid outlet action: {0}")]
    InvalidOutletAction(String),

    /// An outlet id exceeds the number of outlets the device reported.
    #[error("outlet {id} out of range, device has {count} outlets")]
    OutletOutOfRange {
        /// The requested outlet id.
        id: u16,
        /// The number of outlets reported.
        count: usize,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
