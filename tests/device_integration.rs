// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against a mock `WattBox` telnet server.

mod common;

use std::time::Duration;

use common::{Greeting, MockWattBox};
use tokio::sync::mpsc;
use wattbox_lib::subscription::Subscribable;
use wattbox_lib::types::{OutletAction, OutletId, OutletState};
use wattbox_lib::{DeviceConfig, Error, ProtocolError, TransportError, ValueError, WattBoxDevice};

fn id(value: u16) -> OutletId {
    OutletId::new(value).unwrap()
}

// ============================================================================
// Session handling
// ============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn connect_logs_in_and_out() {
        let mock = MockWattBox::start().await;
        let device = WattBoxDevice::new(mock.config()).unwrap();

        device.connect().await.unwrap();
        mock.wait_idle().await;

        assert_eq!(mock.connections(), 1);
        assert_eq!(mock.received(), vec!["!Exit"]);
    }

    #[tokio::test]
    async fn greeting_split_across_reads() {
        let mock = MockWattBox::start_with(Greeting::Split, common::PASSWORD, Duration::ZERO).await;
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let info = device.get_device_info().await.unwrap();
        assert_eq!(info.model, "WB-800-IPVM-6");
    }

    #[tokio::test]
    async fn invalid_login_sends_no_commands() {
        let mock = MockWattBox::start_with(Greeting::Joined, "other", Duration::ZERO).await;
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let err = device.get_device_status().await.unwrap_err();
        assert!(matches!(err, Error::Authentication(ref msg) if msg.contains("Invalid")));

        mock.wait_idle().await;
        assert!(mock.received_after_rejection().is_empty());
        assert!(mock.received().is_empty());
    }

    #[tokio::test]
    async fn failed_unit_of_work_still_logs_out() {
        let mock = MockWattBox::start().await;
        mock.reply("?OutletStatus", "?OutletStatus=1,x,0");
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let err = device.get_device_status().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::UnexpectedReply { .. })
        ));

        mock.wait_idle().await;
        assert_eq!(mock.received(), vec!["?OutletStatus", "!Exit"]);
    }

    #[tokio::test]
    async fn refused_connection_is_a_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let device = WattBoxDevice::new(DeviceConfig::new("127.0.0.1").with_port(port)).unwrap();
        let err = device.connect().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(TransportError::Connect { .. })
        ));
    }

    #[tokio::test]
    async fn silent_device_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let config = DeviceConfig::new("127.0.0.1")
            .with_port(port)
            .with_read_timeout(Duration::from_millis(200));
        let device = WattBoxDevice::new(config).unwrap();

        let err = device.connect().await.unwrap_err();
        assert!(matches!(err, Error::Connection(TransportError::Timeout(200))));
    }

    #[tokio::test]
    async fn concurrent_calls_never_share_the_device() {
        let mock =
            MockWattBox::start_with(Greeting::Joined, common::PASSWORD, Duration::from_millis(5))
                .await;
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..6 {
            let device = device.clone();
            tasks.spawn(async move { device.get_device_status().await });
        }
        for _ in 0..2 {
            let device = device.clone();
            tasks.spawn(async move {
                device
                    .set_outlet_action(id(2), OutletAction::Toggle)
                    .await
                    .map(|()| Default::default())
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        mock.wait_idle().await;
        assert_eq!(mock.connections(), 8);
        assert_eq!(mock.max_concurrent_sessions(), 1);
        let exits = mock.received().iter().filter(|l| *l == "!Exit").count();
        assert_eq!(exits, 8);
    }

    #[tokio::test]
    async fn waiting_calls_run_in_arrival_order() {
        let mock =
            MockWattBox::start_with(Greeting::Joined, common::PASSWORD, Duration::from_millis(20))
                .await;
        let device = WattBoxDevice::new(mock.config()).unwrap();

        // Holds the device while the actions queue up behind it.
        let mut tasks = Vec::new();
        let holder = device.clone();
        tasks.push(tokio::spawn(async move {
            holder.get_device_status().await.map(|_| ())
        }));
        tokio::task::yield_now().await;

        for outlet in 1..=4 {
            let device = device.clone();
            tasks.push(tokio::spawn(async move {
                device.set_outlet_action(id(outlet), OutletAction::Toggle).await
            }));
            tokio::task::yield_now().await;
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        mock.wait_idle().await;
        let actions: Vec<String> = mock
            .received()
            .into_iter()
            .filter(|l| l.starts_with("!OutletSet="))
            .collect();
        assert_eq!(
            actions,
            vec![
                "!OutletSet=1,TOGGLE",
                "!OutletSet=2,TOGGLE",
                "!OutletSet=3,TOGGLE",
                "!OutletSet=4,TOGGLE",
            ]
        );
        assert_eq!(mock.max_concurrent_sessions(), 1);
    }
}

// ============================================================================
// Queries
// ============================================================================

mod queries {
    use super::*;

    #[tokio::test]
    async fn device_info() {
        let mock = MockWattBox::start().await;
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let info = device.get_device_info().await.unwrap();
        assert_eq!(info.model, "WB-800-IPVM-6");
        assert_eq!(info.service_tag, "ST191500681E8422");
        assert_eq!(info.firmware, "2.4.0.1");
        assert_eq!(info.outlet_names, vec!["Router", "NAS", "TV"]);
        assert!(info.ups_connected);

        mock.wait_idle().await;
        assert_eq!(
            mock.received(),
            vec![
                "?Model",
                "?ServiceTag",
                "?Firmware",
                "?OutletName",
                "?UPSConnection",
                "!Exit"
            ]
        );
    }

    #[tokio::test]
    async fn device_info_falls_back_on_unexpected_replies() {
        let mock = MockWattBox::start().await;
        mock.reply("?Model", "#Error");
        mock.reply("?Firmware", "?Model=WB-150");
        mock.reply("?OutletName", "#Error");
        mock.reply("?UPSConnection", "#Error");
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let info = device.get_device_info().await.unwrap();
        assert_eq!(info.model, "Unknown");
        assert_eq!(info.service_tag, "ST191500681E8422");
        assert_eq!(info.firmware, "Unknown");
        assert!(info.outlet_names.is_empty());
        assert!(!info.ups_connected);
    }

    #[tokio::test]
    async fn device_status() {
        let mock = MockWattBox::start().await;
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let status = device.get_device_status().await.unwrap();
        assert_eq!(
            status.outlet_status,
            vec![OutletState::On, OutletState::Off, OutletState::On]
        );

        let power = status.outlet_power.as_ref().unwrap();
        assert_eq!(power.len(), 3);
        assert!((power[0].watts - 10.5).abs() < f32::EPSILON);
        assert!((power[0].amps - 0.09).abs() < f32::EPSILON);
        assert!((power[2].volts - 120.3).abs() < f32::EPSILON);
        assert_eq!(status.battery_level, Some(80));
        assert_eq!(status.power_lost, Some(false));

        mock.wait_idle().await;
        assert_eq!(
            mock.received(),
            vec![
                "?OutletStatus",
                "?OutletPowerStatus=1",
                "?OutletPowerStatus=2",
                "?OutletPowerStatus=3",
                "?UPSStatus",
                "!Exit"
            ]
        );
    }

    #[tokio::test]
    async fn outlet_count_follows_status_reply() {
        let mock = MockWattBox::start().await;
        mock.reply("?OutletStatus", "?OutletStatus=0,0,0,0,1");
        mock.reply("?OutletPowerStatus=4", "?OutletPowerStatus=4,1.0,0.01,119.9");
        mock.reply("?OutletPowerStatus=5", "?OutletPowerStatus=5,2.0,0.02,119.9");
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let status = device.get_device_status().await.unwrap();
        assert_eq!(status.outlet_count(), 5);
        assert_eq!(status.outlet(id(5)), OutletState::On);
        assert_eq!(status.outlet_power.map(|p| p.len()), Some(5));
    }

    #[tokio::test]
    async fn device_status_without_metering_or_ups() {
        let mock = MockWattBox::start().await;
        mock.reply("?OutletPowerStatus=1", "#Error");
        mock.reply("?UPSStatus", "#Error");
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let status = device.get_device_status().await.unwrap();
        assert_eq!(status.outlet_count(), 3);
        assert!(status.outlet_power.is_none());
        assert!(status.battery_level.is_none());
        assert!(status.power_lost.is_none());
    }

    #[tokio::test]
    async fn outlet_state() {
        let mock = MockWattBox::start().await;
        let device = WattBoxDevice::new(mock.config()).unwrap();

        assert_eq!(device.get_outlet_state(id(1)).await.unwrap(), OutletState::On);
        assert_eq!(device.get_outlet_state(id(2)).await.unwrap(), OutletState::Off);

        let err = device.get_outlet_state(id(9)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::OutletOutOfRange { id: 9, count: 3 })
        ));
    }

    #[tokio::test]
    async fn ups_metrics() {
        let mock = MockWattBox::start().await;
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let ups = device.get_ups_metrics().await.unwrap().unwrap();
        assert_eq!(ups.battery_charge, 80);
        assert_eq!(ups.battery_load, 25);
        assert_eq!(ups.battery_health, "Good");
        assert!(!ups.power_lost);
        assert_eq!(ups.battery_runtime_minutes, 42);
        assert!(ups.alarm_enabled);
        assert!(!ups.alarm_muted);
    }
}

// ============================================================================
// Outlet actions
// ============================================================================

mod actions {
    use super::*;

    #[tokio::test]
    async fn reset_outlet() {
        let mock = MockWattBox::start().await;
        let device = WattBoxDevice::new(mock.config()).unwrap();

        device
            .set_outlet_action(id(3), OutletAction::Reset)
            .await
            .unwrap();

        mock.wait_idle().await;
        assert_eq!(mock.received(), vec!["!OutletSet=3,RESET", "!Exit"]);
    }

    #[tokio::test]
    async fn rejected_action_is_a_command_error() {
        let mock = MockWattBox::start().await;
        mock.reply("!OutletSet=3,RESET", "#Error");
        let device = WattBoxDevice::new(mock.config()).unwrap();

        let err = device
            .set_outlet_action(id(3), OutletAction::Reset)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Command(ref msg) if msg.contains("#Error")));

        mock.wait_idle().await;
        assert_eq!(mock.received(), vec!["!OutletSet=3,RESET", "!Exit"]);
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

mod subscriptions {
    use super::*;

    #[tokio::test]
    async fn snapshots_reach_every_subscriber() {
        let mock = MockWattBox::start().await;
        let config = mock.config().with_poll_interval(Duration::from_millis(200));
        let device = WattBoxDevice::new(config).unwrap();

        let (first_tx, mut first_rx) = mpsc::unbounded_channel();
        let (second_tx, mut second_rx) = mpsc::unbounded_channel();
        let first = device.subscribe("ST191500681E8422", move |status| {
            let _ = first_tx.send(status.clone());
        });
        let second = device.subscribe("ST191500681E8422", move |status| {
            let _ = second_tx.send(status.clone());
        });
        assert_eq!(device.subscriber_count("ST191500681E8422"), 2);

        let wait = Duration::from_secs(5);
        let a = tokio::time::timeout(wait, first_rx.recv()).await.unwrap().unwrap();
        let b = tokio::time::timeout(wait, second_rx.recv()).await.unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.outlet_count(), 3);
        assert_eq!(a.battery_level, Some(80));

        assert!(device.unsubscribe(first));
        assert!(device.unsubscribe(second));
        tokio::time::timeout(wait, async {
            while device.is_polling("ST191500681E8422") {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn polling_survives_device_errors() {
        let mock = MockWattBox::start().await;
        mock.reply("?OutletStatus", "#Error");
        let config = mock.config().with_poll_interval(Duration::from_millis(100));
        let device = WattBoxDevice::new(config).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        device.subscribe("ST-1", move |status| {
            let _ = tx.send(status.outlet_count());
        });

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(rx.try_recv().is_err());
        assert!(device.is_polling("ST-1"));

        mock.reply("?OutletStatus", "?OutletStatus=1,1,1");
        let count = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(count, 3);
    }
}
