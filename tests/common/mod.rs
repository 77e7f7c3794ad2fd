// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process mock of a `WattBox` telnet server.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use wattbox_lib::DeviceConfig;

pub const USERNAME: &str = "wattbox";
pub const PASSWORD: &str = "wattbox";

/// How the greeting and username prompt are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    /// Greeting and prompt in one write.
    Joined,
    /// Greeting and prompt in separate writes, with a pause between them.
    Split,
}

#[derive(Default)]
struct Shared {
    replies: Mutex<HashMap<String, String>>,
    /// Every line received after a successful login, in arrival order.
    received: Mutex<Vec<String>>,
    /// Lines received after a rejected login.
    after_rejection: Mutex<Vec<String>>,
    connections: AtomicUsize,
    open: AtomicUsize,
    logged_in: AtomicUsize,
    max_logged_in: AtomicUsize,
}

/// Mock device answering like a WB-800 with three metered outlets and a UPS.
pub struct MockWattBox {
    address: SocketAddr,
    shared: Arc<Shared>,
}

impl MockWattBox {
    pub async fn start() -> Self {
        Self::start_with(Greeting::Joined, PASSWORD, Duration::ZERO).await
    }

    pub async fn start_with(greeting: Greeting, password: &str, reply_delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let shared = Arc::new(Shared::default());
        {
            let mut replies = shared.replies.lock();
            for (command, reply) in default_replies() {
                replies.insert(command.to_string(), reply.to_string());
            }
        }

        let password = password.to_string();
        let server = Arc::clone(&shared);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let shared = Arc::clone(&server);
                let password = password.clone();
                tokio::spawn(async move {
                    shared.connections.fetch_add(1, Ordering::SeqCst);
                    shared.open.fetch_add(1, Ordering::SeqCst);
                    serve(stream, &shared, greeting, &password, reply_delay).await;
                    shared.open.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        Self { address, shared }
    }

    /// Configuration pointing at this mock with short timeouts.
    pub fn config(&self) -> DeviceConfig {
        DeviceConfig::new("127.0.0.1")
            .with_port(self.address.port())
            .with_credentials(USERNAME, PASSWORD)
            .with_connect_timeout(Duration::from_secs(2))
            .with_read_timeout(Duration::from_secs(2))
    }

    /// Overrides the reply to one command line.
    pub fn reply(&self, command: &str, reply: &str) {
        self.shared
            .replies
            .lock()
            .insert(command.to_string(), reply.to_string());
    }

    pub fn received(&self) -> Vec<String> {
        self.shared.received.lock().clone()
    }

    pub fn received_after_rejection(&self) -> Vec<String> {
        self.shared.after_rejection.lock().clone()
    }

    pub fn connections(&self) -> usize {
        self.shared.connections.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_sessions(&self) -> usize {
        self.shared.max_logged_in.load(Ordering::SeqCst)
    }

    /// Waits until every connection has been closed.
    pub async fn wait_idle(&self) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.shared.open.load(Ordering::SeqCst) > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("mock device still has open connections");
    }
}

fn default_replies() -> Vec<(&'static str, &'static str)> {
    vec![
        ("?Model", "?Model=WB-800-IPVM-6"),
        ("?ServiceTag", "?ServiceTag=ST191500681E8422"),
        ("?Firmware", "?Firmware=2.4.0.1"),
        ("?OutletName", r#"?OutletName="Router","NAS","TV""#),
        ("?UPSConnection", "?UPSConnection=1"),
        ("?OutletStatus", "?OutletStatus=1,0,1"),
        ("?OutletPowerStatus=1", "?OutletPowerStatus=1,10.5,0.09,120.2"),
        ("?OutletPowerStatus=2", "?OutletPowerStatus=2,0.0,0.00,120.1"),
        ("?OutletPowerStatus=3", "?OutletPowerStatus=3,55.2,0.46,120.3"),
        ("?UPSStatus", "?UPSStatus=80,25,Good,False,42,True,False"),
    ]
}

async fn serve(
    stream: TcpStream,
    shared: &Shared,
    greeting: Greeting,
    password: &str,
    reply_delay: Duration,
) {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    match greeting {
        Greeting::Joined => {
            let _ = write.write_all(b"Please Login to Access\r\nUsername: ").await;
        }
        Greeting::Split => {
            let _ = write.write_all(b"Please Login to Access\r\n").await;
            tokio::time::sleep(Duration::from_millis(20)).await;
            let _ = write.write_all(b"Username: ").await;
        }
    }

    let Ok(Some(user)) = lines.next_line().await else {
        return;
    };
    let _ = write.write_all(b"Password: ").await;
    let Ok(Some(pass)) = lines.next_line().await else {
        return;
    };

    if user.trim() != USERNAME || pass.trim() != password {
        let _ = write.write_all(b"\r\nInvalid Login\r\n").await;
        while let Ok(Some(line)) = lines.next_line().await {
            shared.after_rejection.lock().push(line);
        }
        return;
    }

    let _ = write.write_all(b"\r\nSuccessfully Logged In!\r\n").await;
    let now = shared.logged_in.fetch_add(1, Ordering::SeqCst) + 1;
    shared.max_logged_in.fetch_max(now, Ordering::SeqCst);

    // The session ends as soon as `!Exit` or EOF is read, before anything
    // else is recorded, so max_concurrent_sessions never counts a session
    // that the client has already released.
    loop {
        let Ok(Some(line)) = lines.next_line().await else {
            shared.logged_in.fetch_sub(1, Ordering::SeqCst);
            return;
        };
        let line = line.trim().to_string();
        if line == "!Exit" {
            shared.logged_in.fetch_sub(1, Ordering::SeqCst);
            shared.received.lock().push(line);
            return;
        }
        shared.received.lock().push(line.clone());

        if !reply_delay.is_zero() {
            tokio::time::sleep(reply_delay).await;
        }
        let reply = shared.replies.lock().get(&line).cloned();
        let reply = reply.unwrap_or_else(|| {
            if line.starts_with("!OutletSet=") {
                "OK".to_string()
            } else {
                "#Error".to_string()
            }
        });
        if write.write_all(format!("{reply}\r\n").as_bytes()).await.is_err() {
            shared.logged_in.fetch_sub(1, Ordering::SeqCst);
            return;
        }
    }
}
