// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exclusive access to a device's single session.
//!
//! The device accepts one telnet login at a time and interleaved commands
//! would mix up replies, so every unit of work runs on a fresh session while
//! holding a per-device lock. Waiters are served in arrival order.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::Mutex;

use crate::config::DeviceConfig;
use crate::error::Result;
use crate::protocol::session::Session;

/// Boxed future returned by a unit of work borrowing the session.
pub type UnitOfWork<'s, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 's>>;

/// Serializes all conversations with one device.
///
/// # Examples
///
/// ```no_run
/// use wattbox_lib::DeviceConfig;
/// use wattbox_lib::protocol::SessionManager;
///
/// # async fn example() -> wattbox_lib::Result<()> {
/// let manager = SessionManager::new(DeviceConfig::new("192.168.1.50"));
/// let info = manager
///     .run_exclusive(|session| Box::pin(session.device_info()))
///     .await?;
/// println!("{} ({})", info.model, info.firmware);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SessionManager {
    config: DeviceConfig,
    // tokio's mutex queues waiters fairly.
    lock: Mutex<()>,
}

impl SessionManager {
    /// Creates a manager for the configured device.
    #[must_use]
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    /// Returns the device configuration.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Runs `work` on a fresh authenticated session with exclusive access.
    ///
    /// The lock is taken before connecting and released only after the
    /// session has logged out and closed, whether `work` succeeded or not.
    /// If login fails, `work` is not run and nothing is written after the
    /// password.
    ///
    /// # Errors
    ///
    /// Returns the connection or login error, or whatever `work` returns.
    pub async fn run_exclusive<T, F>(&self, work: F) -> Result<T>
    where
        F: for<'s> FnOnce(&'s mut Session) -> UnitOfWork<'s, T>,
    {
        let _guard = self.lock.lock().await;
        tracing::debug!(host = %self.config.host(), "Session lock acquired");

        let mut session = Session::open(&self.config).await?;
        let result = work(&mut session).await;
        session.logout().await;

        if let Err(e) = &result {
            tracing::debug!(host = %self.config.host(), error = %e, "Unit of work failed");
        }
        result
    }

    /// Logs in and out once to verify reachability and credentials.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` or `Error::Authentication`.
    pub async fn check_connection(&self) -> Result<()> {
        self.run_exclusive(|_| Box::pin(async { Ok(()) })).await?;
        tracing::debug!(host = %self.config.host(), "Device reachable");
        Ok(())
    }
}
