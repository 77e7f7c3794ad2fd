// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated command session.
//!
//! A [`Session`] wraps one [`LineTransport`], performs the login handshake
//! and then exchanges commands for replies. It also provides the units of
//! work the device facade runs, each as a sequence of round trips on the
//! same session.

use std::fmt;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::command::{Command, ExitCommand, OutletSetCommand, Query};
use crate::config::DeviceConfig;
use crate::error::{Error, ProtocolError, Result};
use crate::protocol::transport::LineTransport;
use crate::response::{
    Reply, parse_flag, parse_outlet_names, parse_outlet_status, parse_power_metrics,
    parse_text, parse_ups_status,
};
use crate::state::{DeviceInfo, DeviceStatus};
use crate::types::{OutletAction, OutletId, OutletState, PowerMetrics, UpsMetrics};

/// Prompt that precedes the username.
pub const USERNAME_PROMPT: &str = "Username:";
/// Prompt that precedes the password.
pub const PASSWORD_PROMPT: &str = "Password:";
/// Substring of the line sent after rejected credentials.
pub const INVALID_LOGIN_MARKER: &str = "Invalid";

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// No transport is open.
    #[default]
    Disconnected,
    /// The transport is open, login has not started.
    Connecting,
    /// Waiting for the username prompt.
    AwaitingUsername,
    /// Username sent, waiting for the password prompt.
    AwaitingPassword,
    /// Login accepted, commands may be sent.
    Authenticated,
    /// Logging out.
    Closing,
}

impl SessionState {
    /// Returns `true` if commands may be sent.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingUsername => "awaiting username",
            Self::AwaitingPassword => "awaiting password",
            Self::Authenticated => "authenticated",
            Self::Closing => "closing",
        };
        f.write_str(s)
    }
}

/// One conversation with the device.
///
/// Sessions are normally obtained through
/// [`SessionManager::run_exclusive`](crate::protocol::SessionManager::run_exclusive),
/// which guarantees logout and exclusive access.
#[derive(Debug)]
pub struct Session<S = TcpStream> {
    transport: LineTransport<S>,
    state: SessionState,
    read_timeout: Duration,
}

impl Session<TcpStream> {
    /// Connects to the configured device and logs in.
    ///
    /// If login fails the transport is closed without sending any command.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` if the device cannot be reached and
    /// `Error::Authentication` if the credentials are rejected.
    pub async fn open(config: &DeviceConfig) -> Result<Self> {
        let transport =
            LineTransport::connect(config.host(), config.port(), config.connect_timeout()).await?;
        let mut session = Self::new(transport, config.read_timeout());

        if let Err(e) = session.login(config.username(), config.password()).await {
            tracing::debug!(host = %config.host(), error = %e, "Login failed");
            session.close().await;
            return Err(e);
        }
        Ok(session)
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an open transport. The session starts unauthenticated.
    pub fn new(transport: LineTransport<S>, read_timeout: Duration) -> Self {
        let state = if transport.is_open() {
            SessionState::Connecting
        } else {
            SessionState::Disconnected
        };
        Self {
            transport,
            state,
            read_timeout,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Performs the login handshake.
    ///
    /// The greeting and the username prompt may arrive together or in
    /// separate reads. After the password, the next non-empty line decides
    /// the outcome: one containing `Invalid` is a rejection, anything else is
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns `Error::Authentication` on rejection and `Error::Connection`
    /// if a prompt does not arrive in time.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.state = SessionState::AwaitingUsername;
        self.transport
            .read_until(USERNAME_PROMPT, self.read_timeout)
            .await?;
        self.transport.write_line(username).await?;

        self.state = SessionState::AwaitingPassword;
        self.transport
            .read_until(PASSWORD_PROMPT, self.read_timeout)
            .await?;
        self.transport.write_secret_line(password).await?;

        let outcome = self.next_line().await?;
        if outcome.contains(INVALID_LOGIN_MARKER) {
            self.state = SessionState::Connecting;
            return Err(Error::Authentication(outcome.trim().to_string()));
        }

        self.state = SessionState::Authenticated;
        tracing::debug!(peer = %self.transport.peer(), "Session authenticated");
        Ok(())
    }

    /// Sends a command and returns its reply line.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::NotAuthenticated` before login has succeeded,
    /// and `Error::Connection` if the exchange fails.
    pub async fn send<C: Command + ?Sized>(&mut self, command: &C) -> Result<Reply> {
        if !self.state.is_authenticated() {
            return Err(ProtocolError::NotAuthenticated.into());
        }
        self.transport.write_line(&command.to_line()).await?;
        let line = self.next_line().await?;
        Ok(Reply::new(line))
    }

    /// Fetches model, service tag, firmware, outlet names and UPS presence.
    ///
    /// # Errors
    ///
    /// Returns an error only if the exchange itself fails; unexpected replies
    /// fall back to defaults.
    pub async fn device_info(&mut self) -> Result<DeviceInfo> {
        let model = parse_text(&self.send(&Query::Model).await?, Query::Model);
        let service_tag = parse_text(&self.send(&Query::ServiceTag).await?, Query::ServiceTag);
        let firmware = parse_text(&self.send(&Query::Firmware).await?, Query::Firmware);
        let outlet_names = parse_outlet_names(&self.send(&Query::OutletName).await?);
        let ups_connected = parse_flag(
            &self.send(&Query::UpsConnection).await?,
            Query::UpsConnection,
        );

        Ok(DeviceInfo {
            model,
            service_tag,
            firmware,
            outlet_names,
            ups_connected,
        })
    }

    /// Fetches the state of every outlet.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the reply cannot be decoded.
    pub async fn outlet_status(&mut self) -> Result<Vec<OutletState>> {
        let reply = self.send(&Query::OutletStatus).await?;
        Ok(parse_outlet_status(&reply)?)
    }

    /// Fetches per-outlet metering for outlets `1..=count`.
    ///
    /// Returns `None` when the first outlet's reply does not decode, which is
    /// how models without metering answer. Later outlets that fail to decode
    /// read as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails.
    pub async fn outlet_power(&mut self, count: usize) -> Result<Option<Vec<PowerMetrics>>> {
        let mut readings = Vec::with_capacity(count);

        for index in 0..count {
            let outlet = OutletId::from_index(index);
            let reply = self.send(&Query::OutletPowerStatus(outlet)).await?;
            match parse_power_metrics(&reply, outlet) {
                Some(metrics) => readings.push(metrics),
                None if index == 0 => {
                    tracing::debug!(reply = %reply, "Device does not report outlet metering");
                    return Ok(None);
                }
                None => {
                    tracing::debug!(outlet = %outlet, reply = %reply, "Unreadable outlet metering");
                    readings.push(PowerMetrics::default());
                }
            }
        }

        Ok(Some(readings))
    }

    /// Fetches UPS readings, or `None` if no UPS reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails.
    pub async fn ups_metrics(&mut self) -> Result<Option<UpsMetrics>> {
        let reply = self.send(&Query::UpsStatus).await?;
        Ok(parse_ups_status(&reply))
    }

    /// Fetches a full status snapshot.
    ///
    /// The outlet count comes from the status reply, so metering is queried
    /// for exactly as many outlets as the device has.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the outlet status cannot be decoded.
    pub async fn device_status(&mut self) -> Result<DeviceStatus> {
        let outlets = self.outlet_status().await?;
        let power = self.outlet_power(outlets.len()).await?;
        let ups = self.ups_metrics().await?;

        let mut status = DeviceStatus::new(outlets);
        if let Some(power) = power {
            status = status.with_outlet_power(power);
        }
        if let Some(ups) = &ups {
            status = status.with_ups(ups);
        }
        Ok(status)
    }

    /// Applies an action to one outlet.
    ///
    /// # Errors
    ///
    /// Returns `Error::Command` if the device answers with `#Error`.
    pub async fn set_outlet(&mut self, outlet: OutletId, action: OutletAction) -> Result<()> {
        let command = OutletSetCommand::new(outlet, action);
        let reply = self.send(&command).await?;
        reply.acknowledge(&command)?;
        tracing::info!(outlet = %outlet, action = %action, "Outlet action applied");
        Ok(())
    }

    /// Sends `!Exit` if authenticated, then closes the transport.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn logout(&mut self) {
        if self.state.is_authenticated() {
            self.state = SessionState::Closing;
            if let Err(e) = self.transport.write_line(&ExitCommand.to_line()).await {
                tracing::debug!(peer = %self.transport.peer(), error = %e, "Failed to send logout");
            }
        }
        self.close().await;
    }

    /// Closes the transport without logging out.
    pub async fn close(&mut self) {
        self.transport.close().await;
        self.state = SessionState::Disconnected;
    }

    /// Reads the next line that is not blank.
    async fn next_line(&mut self) -> Result<String> {
        loop {
            let line = self.transport.read_line(self.read_timeout).await?;
            if !line.trim().is_empty() {
                return Ok(line);
            }
        }
    }
}
