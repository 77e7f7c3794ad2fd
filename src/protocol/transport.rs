// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line-oriented transport over a telnet socket.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;

use crate::error::TransportError;

/// Line terminator used by the device.
pub const LINE_TERMINATOR: &str = "\n";

const READ_CHUNK: usize = 512;

// Telnet command bytes (RFC 854).
const IAC: u8 = 255;
const SB: u8 = 250;
const SE: u8 = 240;
const WILL: u8 = 251;
const DONT: u8 = 254;

/// Position inside an inbound telnet command sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Telnet {
    Data,
    Command,
    Option,
    Subnegotiation,
    SubnegotiationIac,
}

/// Owns one connection to the device and exchanges text lines over it.
///
/// Telnet negotiation bytes sent by the device are discarded. The generic
/// stream parameter lets tests substitute an in-memory pipe.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use wattbox_lib::protocol::LineTransport;
///
/// # async fn example() -> Result<(), wattbox_lib::error::TransportError> {
/// let mut transport =
///     LineTransport::connect("192.168.1.50", 23, Duration::from_secs(10)).await?;
/// let prompt = transport.read_until("Username:", Duration::from_secs(10)).await?;
/// assert!(prompt.ends_with("Username:"));
/// transport.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LineTransport<S = TcpStream> {
    stream: Option<S>,
    buffer: Vec<u8>,
    telnet: Telnet,
    peer: String,
}

impl LineTransport<TcpStream> {
    /// Opens a TCP connection to `host:port`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Connect` if the connection is refused and
    /// `TransportError::ConnectTimeout` if it is not established in time.
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, TransportError> {
        let address = format!("{host}:{port}");
        tracing::debug!(address = %address, "Connecting to device");

        let stream = tokio::time::timeout(timeout, TcpStream::connect(&address))
            .await
            .map_err(|_| TransportError::ConnectTimeout {
                address: address.clone(),
                millis: millis(timeout),
            })?
            .map_err(|source| TransportError::Connect {
                address: address.clone(),
                source,
            })?;

        // Disable Nagle for short request/reply lines.
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(address = %address, error = %e, "Failed to disable Nagle");
        }

        Ok(Self::from_stream(stream, address))
    }
}

impl<S> LineTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already connected stream.
    pub fn from_stream(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream: Some(stream),
            buffer: Vec::new(),
            telnet: Telnet::Data,
            peer: peer.into(),
        }
    }

    /// Returns the remote address this transport talks to.
    #[must_use]
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Returns `true` until [`close`](Self::close) is called or the device
    /// hangs up.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Writes `line` followed by the line terminator.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` if the socket is broken and
    /// `TransportError::Closed` if the transport was closed.
    pub async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        tracing::trace!(peer = %self.peer, line = %line, ">>");
        self.write_raw(line).await
    }

    /// Writes a line whose content must not appear in logs.
    ///
    /// # Errors
    ///
    /// Same as [`write_line`](Self::write_line).
    pub async fn write_secret_line(&mut self, line: &str) -> Result<(), TransportError> {
        tracing::trace!(peer = %self.peer, line = "<redacted>", ">>");
        self.write_raw(line).await
    }

    /// Reads one terminated line, without its terminator.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Timeout` if no complete line arrives within
    /// `timeout`, `TransportError::Closed` if the device hangs up, and
    /// `TransportError::Io` on socket failure.
    pub async fn read_line(&mut self, timeout: Duration) -> Result<String, TransportError> {
        let line = self.read_with(timeout, take_line).await?;
        tracing::trace!(peer = %self.peer, line = %line, "<<");
        Ok(line)
    }

    /// Reads until `marker` has been received, returning everything up to
    /// and including it.
    ///
    /// Prompts such as `Username: ` are not terminated, so they cannot be
    /// read with [`read_line`](Self::read_line). Text preceding the marker may
    /// arrive in the same read or in earlier ones.
    ///
    /// # Errors
    ///
    /// Same as [`read_line`](Self::read_line).
    pub async fn read_until(
        &mut self,
        marker: &str,
        timeout: Duration,
    ) -> Result<String, TransportError> {
        let text = self
            .read_with(timeout, |buffer| take_through(buffer, marker.as_bytes()))
            .await?;
        tracing::trace!(peer = %self.peer, text = %text.escape_debug(), "<<");
        Ok(text)
    }

    /// Shuts the connection down. Calling it again does nothing.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                tracing::debug!(peer = %self.peer, error = %e, "Error shutting down connection");
            }
            tracing::debug!(peer = %self.peer, "Connection closed");
        }
        self.buffer.clear();
    }

    async fn write_raw(&mut self, line: &str) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        let mut data = String::with_capacity(line.len() + LINE_TERMINATOR.len());
        data.push_str(line);
        data.push_str(LINE_TERMINATOR);
        stream.write_all(data.as_bytes()).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Reads from the socket until `take` extracts a result from the buffer.
    async fn read_with<F>(&mut self, timeout: Duration, mut take: F) -> Result<String, TransportError>
    where
        F: FnMut(&mut Vec<u8>) -> Option<String>,
    {
        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            if let Some(found) = take(&mut self.buffer) {
                return Ok(found);
            }

            let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
            let read = tokio::time::timeout_at(deadline, stream.read(&mut chunk))
                .await
                .map_err(|_| TransportError::Timeout(millis(timeout)))??;

            if read == 0 {
                self.stream = None;
                return Err(TransportError::Closed);
            }
            self.push_bytes(&chunk[..read]);
        }
    }

    /// Appends inbound bytes to the buffer, dropping telnet commands and NULs.
    fn push_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.telnet = match (self.telnet, byte) {
                (Telnet::Data, IAC) => Telnet::Command,
                (Telnet::Data, 0) => Telnet::Data,
                (Telnet::Data, _) | (Telnet::Command, IAC) => {
                    self.buffer.push(byte);
                    Telnet::Data
                }
                (Telnet::Command, WILL..=DONT) => Telnet::Option,
                (Telnet::Command, SB) => Telnet::Subnegotiation,
                (Telnet::Command | Telnet::Option, _) | (Telnet::SubnegotiationIac, SE) => {
                    Telnet::Data
                }
                (Telnet::Subnegotiation, IAC) => Telnet::SubnegotiationIac,
                (Telnet::Subnegotiation | Telnet::SubnegotiationIac, _) => Telnet::Subnegotiation,
            };
        }
    }
}

/// Removes the first `\n`-terminated line from `buffer`.
fn take_line(buffer: &mut Vec<u8>) -> Option<String> {
    let end = buffer.iter().position(|&b| b == b'\n')?;
    let raw: Vec<u8> = buffer.drain(..=end).collect();
    let line = String::from_utf8_lossy(&raw);
    Some(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Removes everything up to and including `marker` from `buffer`.
fn take_through(buffer: &mut Vec<u8>, marker: &[u8]) -> Option<String> {
    if marker.is_empty() {
        return Some(String::new());
    }
    let start = buffer
        .windows(marker.len())
        .position(|window| window == marker)?;
    let raw: Vec<u8> = buffer.drain(..start + marker.len()).collect();
    Some(String::from_utf8_lossy(&raw).into_owned())
}

// Timeouts in practical use never exceed u64::MAX milliseconds.
#[allow(clippy::cast_possible_truncation)]
fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
