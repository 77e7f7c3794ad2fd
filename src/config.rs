// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection and polling configuration for a `WattBox` device.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

/// Configuration for one `WattBox` device.
///
/// Built in code with the `with_*` methods, or deserialized from a host
/// application's own configuration (durations are given in seconds).
///
/// # Examples
///
/// ```
/// use wattbox_lib::DeviceConfig;
/// use std::time::Duration;
///
/// // Defaults: port 23, wattbox/wattbox, 10s timeouts, 30s polling
/// let config = DeviceConfig::new("192.168.1.50");
///
/// // With all options
/// let config = DeviceConfig::new("192.168.1.50")
///     .with_port(2323)
///     .with_credentials("admin", "secret")
///     .with_connect_timeout(Duration::from_secs(5))
///     .with_read_timeout(Duration::from_secs(5))
///     .with_poll_interval(Duration::from_secs(15));
/// assert_eq!(config.address(), "192.168.1.50:2323");
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_username")]
    username: String,
    #[serde(default = "default_password")]
    password: String,
    #[serde(default = "default_connect_timeout", with = "seconds")]
    connect_timeout: Duration,
    #[serde(default = "default_read_timeout", with = "seconds")]
    read_timeout: Duration,
    #[serde(default = "default_poll_interval", with = "seconds")]
    poll_interval: Duration,
}

impl DeviceConfig {
    /// Default telnet port.
    pub const DEFAULT_PORT: u16 = 23;
    /// Factory default username.
    pub const DEFAULT_USERNAME: &'static str = "wattbox";
    /// Factory default password.
    pub const DEFAULT_PASSWORD: &'static str = "wattbox";
    /// Default timeout for establishing the TCP connection.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default timeout for each read.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default status polling interval.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

    /// Creates a configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the device
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            username: Self::DEFAULT_USERNAME.to_string(),
            password: Self::DEFAULT_PASSWORD.to_string(),
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets login credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Sets the TCP connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-read timeout.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the status polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the `host:port` address.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the TCP connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the per-read timeout.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Returns the status polling interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Checks that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` for an empty host, a zero port,
    /// or a zero timeout or polling interval.
    pub fn validate(&self) -> Result<(), Error> {
        if self.host.trim().is_empty() {
            return Err(Error::InvalidConfiguration("host is required".to_string()));
        }
        if self.port == 0 {
            return Err(Error::InvalidConfiguration("port must not be 0".to_string()));
        }
        if self.connect_timeout.is_zero() || self.read_timeout.is_zero() {
            return Err(Error::InvalidConfiguration(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfiguration(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

fn default_port() -> u16 {
    DeviceConfig::DEFAULT_PORT
}

fn default_username() -> String {
    DeviceConfig::DEFAULT_USERNAME.to_string()
}

fn default_password() -> String {
    DeviceConfig::DEFAULT_PASSWORD.to_string()
}

fn default_connect_timeout() -> Duration {
    DeviceConfig::DEFAULT_CONNECT_TIMEOUT
}

fn default_read_timeout() -> Duration {
    DeviceConfig::DEFAULT_READ_TIMEOUT
}

fn default_poll_interval() -> Duration {
    DeviceConfig::DEFAULT_POLL_INTERVAL
}

/// Durations expressed as (possibly fractional) seconds.
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
