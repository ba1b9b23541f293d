// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator tests against an in-memory device.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use gixie_lib::command::{Command, CommandId, OperationKind, WriteCommand};
use gixie_lib::coordinator::{Coordinator, CoordinatorConfig, FixedClock};
use gixie_lib::error::{Error, OperationError};
use gixie_lib::event::CoordinatorEvent;
use gixie_lib::protocol::Protocol;
use gixie_lib::state::StateChange;
use gixie_lib::types::{
    Brightness, DisplayMode, DstPolicy, PowerState, RgbColor, TimeFormat, TimezoneIndex,
    UtcOffset,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::broadcast::error::TryRecvError;

// ============================================================================
// Mock device
// ============================================================================

#[derive(Default)]
struct DeviceRegisters {
    registers: HashMap<CommandId, Value>,
    writes: Vec<WriteCommand>,
    reads: Vec<CommandId>,
    failing_reads: HashSet<CommandId>,
    silent_reads: HashSet<CommandId>,
    brightness_limit: Option<u8>,
    forced_timezone: Option<i32>,
}

/// Registers that behave like the clock: writes are stored and echoed back
/// by reads, optionally clamped or overridden.
#[derive(Clone, Default)]
struct MockDevice {
    inner: Arc<Mutex<DeviceRegisters>>,
}

impl MockDevice {
    fn with_registers() -> Self {
        let device = Self::default();
        {
            let mut inner = device.inner.lock();
            let color = json!({"red": 255, "green": 0, "blue": 0});
            inner
                .registers
                .insert(CommandId::Color, json!([color, color, color, color]));
            inner.registers.insert(CommandId::Brightness, json!(200));
            inner.registers.insert(CommandId::Power, json!(1));
            inner.registers.insert(CommandId::Timezone, json!(15));
            inner.registers.insert(CommandId::Mode, json!(4));
            inner.registers.insert(CommandId::TimeFormat, json!(1));
        }
        device
    }

    fn set_register(&self, command: CommandId, value: Value) {
        self.inner.lock().registers.insert(command, value);
    }

    fn fail_reads(&self, command: CommandId) {
        self.inner.lock().failing_reads.insert(command);
    }

    fn silence_reads(&self, command: CommandId) {
        self.inner.lock().silent_reads.insert(command);
    }

    fn limit_brightness(&self, max: u8) {
        self.inner.lock().brightness_limit = Some(max);
    }

    fn force_timezone(&self, index: i32) {
        self.inner.lock().forced_timezone = Some(index);
    }

    fn writes(&self) -> Vec<WriteCommand> {
        self.inner.lock().writes.clone()
    }

    fn timezone_writes(&self) -> Vec<TimezoneIndex> {
        self.writes()
            .into_iter()
            .filter_map(|w| match w {
                WriteCommand::Timezone(index) => Some(index),
                _ => None,
            })
            .collect()
    }
}

impl Protocol for MockDevice {
    async fn read_with_timeout(
        &self,
        command: CommandId,
        _timeout: Duration,
    ) -> Result<Option<Value>, OperationError> {
        let mut inner = self.inner.lock();
        inner.reads.push(command);
        if inner.failing_reads.contains(&command) {
            return Err(OperationError::read(command, "request timed out after 2000 ms"));
        }
        if inner.silent_reads.contains(&command) {
            return Ok(None);
        }
        Ok(inner.registers.get(&command).cloned())
    }

    async fn write_with_timeout(
        &self,
        command: &WriteCommand,
        _timeout: Duration,
    ) -> Result<(), OperationError> {
        let mut inner = self.inner.lock();
        inner.writes.push(*command);

        let stored = match *command {
            WriteCommand::Brightness(b) => {
                let limit = inner.brightness_limit.unwrap_or(u8::MAX);
                json!(b.value().min(limit))
            }
            WriteCommand::Timezone(index) => json!(inner.forced_timezone.unwrap_or(index.value())),
            _ => match command.context() {
                Some(Value::Object(ctx)) => ctx["value"].clone(),
                Some(other) => other,
                None => Value::Null,
            },
        };
        inner.registers.insert(command.command_id(), stored);
        Ok(())
    }
}

fn coordinator(
    device: &MockDevice,
    policy: DstPolicy,
    clock: &FixedClock,
) -> Coordinator<MockDevice, FixedClock> {
    Coordinator::with_clock(
        device.clone(),
        clock.clone(),
        CoordinatorConfig::default().with_dst_policy(policy),
    )
}

// ============================================================================
// Polling
// ============================================================================

mod polling {
    use super::*;

    #[tokio::test]
    async fn refresh_merges_every_register() {
        let device = MockDevice::with_registers();
        let coordinator = coordinator(&device, DstPolicy::Off, &FixedClock::from_hours(0));

        coordinator.first_refresh().await.unwrap();

        let state = coordinator.state();
        assert_eq!(state.rgb_color(), Some(RgbColor::new(255, 0, 0)));
        assert_eq!(state.brightness(), Some(Brightness::new(200)));
        assert!(state.is_on());
        assert_eq!(state.timezone_index(), Some(TimezoneIndex::new(15)));
        assert_eq!(state.base_offset(), Some(UtcOffset::clamped(3)));
        assert_eq!(state.display_mode(), Some(DisplayMode::Wordline));
        assert_eq!(state.time_format(), Some(TimeFormat::TwentyFourHour));
        assert_eq!(state.dst_policy(), Some(DstPolicy::Off));
        assert!(coordinator.is_available());
    }

    #[tokio::test]
    async fn refresh_reads_registers_in_order() {
        let device = MockDevice::with_registers();
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(0));

        coordinator.refresh().await.unwrap();

        assert_eq!(device.inner.lock().reads, CommandId::ALL.to_vec());
    }

    #[tokio::test]
    async fn failed_read_merges_nothing() {
        let device = MockDevice::with_registers();
        let coordinator = coordinator(&device, DstPolicy::Off, &FixedClock::from_hours(0));
        coordinator.refresh().await.unwrap();
        let before = coordinator.state();

        // Change what the device reports, then fail the fourth read
        device.set_register(CommandId::Brightness, json!(10));
        device.set_register(CommandId::Power, json!(0));
        device.fail_reads(CommandId::Timezone);

        let mut events = coordinator.subscribe();
        let err = coordinator.refresh().await.unwrap_err();

        assert!(matches!(err, Error::Refresh(_)));
        let op = err.operation().unwrap();
        assert_eq!(op.command(), CommandId::Timezone);
        assert_eq!(op.kind(), OperationKind::Read);

        assert_eq!(coordinator.state(), before);
        assert!(!coordinator.is_available());

        assert!(matches!(
            events.try_recv().unwrap(),
            CoordinatorEvent::AvailabilityChanged { available: false }
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            CoordinatorEvent::RefreshFailed { .. }
        ));
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn first_refresh_fails_when_unreachable() {
        let device = MockDevice::with_registers();
        device.fail_reads(CommandId::Color);
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(0));

        assert!(coordinator.first_refresh().await.is_err());
        assert!(coordinator.state().is_empty());
        assert!(coordinator.last_refresh().is_none());
    }

    #[tokio::test]
    async fn refresh_publishes_one_batch() {
        let device = MockDevice::with_registers();
        let coordinator = coordinator(&device, DstPolicy::Off, &FixedClock::from_hours(0));
        let mut events = coordinator.subscribe();

        coordinator.refresh().await.unwrap();

        let CoordinatorEvent::StateChanged { change, new_state } = events.try_recv().unwrap()
        else {
            panic!("expected state change first");
        };
        assert!(change.is_batch());
        assert_eq!(new_state, coordinator.state());
        assert!(matches!(
            events.try_recv().unwrap(),
            CoordinatorEvent::AvailabilityChanged { available: true }
        ));

        // Identical second poll changes nothing
        coordinator.refresh().await.unwrap();
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn refresh_derives_base_under_forced_dst() {
        let device = MockDevice::with_registers();
        device.set_register(CommandId::Timezone, json!(17));
        let coordinator = coordinator(&device, DstPolicy::On, &FixedClock::from_hours(0));

        coordinator.refresh().await.unwrap();

        assert_eq!(coordinator.state().base_offset(), Some(UtcOffset::clamped(4)));
    }

    #[tokio::test]
    async fn empty_register_is_left_unchanged() {
        let device = MockDevice::with_registers();
        let coordinator = coordinator(&device, DstPolicy::Off, &FixedClock::from_hours(0));
        coordinator.refresh().await.unwrap();

        device.set_register(CommandId::Mode, json!(7));
        device.silence_reads(CommandId::Mode);
        coordinator.refresh().await.unwrap();

        assert_eq!(coordinator.state().display_mode(), Some(DisplayMode::Wordline));
    }
}

// ============================================================================
// Mutations
// ============================================================================

mod mutations {
    use super::*;

    #[tokio::test]
    async fn confirmed_value_wins_when_device_clamps() {
        let device = MockDevice::with_registers();
        device.limit_brightness(100);
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(0));

        coordinator.set_brightness(250).await.unwrap();

        assert_eq!(device.writes(), vec![WriteCommand::Brightness(Brightness::new(250))]);
        assert_eq!(coordinator.state().brightness(), Some(Brightness::new(100)));
    }

    #[tokio::test]
    async fn color_is_written_as_four_entries() {
        let device = MockDevice::default();
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(0));

        coordinator.set_color(10, 20, 30).await.unwrap();

        let stored = device.inner.lock().registers[&CommandId::Color].clone();
        let entries = stored.as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| *e == json!({"red": 10, "green": 20, "blue": 30})));

        let state = coordinator.state();
        assert_eq!(state.rgb_color(), Some(RgbColor::new(10, 20, 30)));
        assert_eq!(state.color().unwrap().entries().len(), 4);
    }

    #[tokio::test]
    async fn time_format_is_not_inverted() {
        let device = MockDevice::default();
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(0));

        coordinator
            .set_time_format(TimeFormat::TwelveHour)
            .await
            .unwrap();
        assert_eq!(device.inner.lock().registers[&CommandId::TimeFormat], json!(0));
        assert_eq!(coordinator.state().time_format(), Some(TimeFormat::TwelveHour));

        coordinator
            .set_time_format(TimeFormat::TwentyFourHour)
            .await
            .unwrap();
        assert_eq!(device.inner.lock().registers[&CommandId::TimeFormat], json!(1));
    }

    #[tokio::test]
    async fn mode_is_written_by_value() {
        let device = MockDevice::default();
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(0));

        coordinator.set_mode(DisplayMode::FanCount).await.unwrap();

        assert_eq!(device.inner.lock().registers[&CommandId::Mode], json!(7));
        assert_eq!(coordinator.state().mode(), Some(7));
    }

    #[tokio::test]
    async fn failed_confirmation_leaves_snapshot() {
        let device = MockDevice::default();
        device.fail_reads(CommandId::Power);
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(0));

        let err = coordinator.set_power(true).await.unwrap_err();

        assert!(matches!(err, Error::Operation(_)));
        assert_eq!(coordinator.state().power(), None);
    }

    #[tokio::test]
    async fn turn_on_writes_power_then_brightness_then_color() {
        let device = MockDevice::default();
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(0));

        coordinator
            .turn_on(Some(80), Some(RgbColor::new(0, 0, 255)))
            .await
            .unwrap();

        assert_eq!(
            device.writes(),
            vec![
                WriteCommand::Power(PowerState::On),
                WriteCommand::Brightness(Brightness::new(80)),
                WriteCommand::Color(RgbColor::new(0, 0, 255)),
            ]
        );

        coordinator.turn_off().await.unwrap();
        assert!(!coordinator.state().is_on());
    }

    #[tokio::test]
    async fn unchanged_confirmation_publishes_nothing() {
        let device = MockDevice::default();
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(0));
        let mut events = coordinator.subscribe();

        coordinator.set_power(true).await.unwrap();
        let CoordinatorEvent::StateChanged { change, .. } = events.try_recv().unwrap() else {
            panic!("expected state change");
        };
        assert_eq!(change, StateChange::Power(PowerState::On));

        coordinator.set_power(true).await.unwrap();
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }
}

// ============================================================================
// Timezone reconciliation
// ============================================================================

mod timezone {
    use super::*;

    #[tokio::test]
    async fn off_with_base_three_writes_fifteen() {
        let device = MockDevice::default();
        let coordinator = coordinator(&device, DstPolicy::Off, &FixedClock::from_hours(0));

        coordinator.set_base_timezone(3).await.unwrap();

        assert_eq!(device.timezone_writes(), vec![TimezoneIndex::new(15)]);
        let state = coordinator.state();
        assert_eq!(state.timezone_index(), Some(TimezoneIndex::new(15)));
        assert_eq!(state.base_offset(), Some(UtcOffset::clamped(3)));
    }

    #[tokio::test]
    async fn on_with_base_three_writes_sixteen() {
        let device = MockDevice::default();
        let coordinator = coordinator(&device, DstPolicy::On, &FixedClock::from_hours(0));

        coordinator.set_base_timezone(3).await.unwrap();

        assert_eq!(device.timezone_writes(), vec![TimezoneIndex::new(16)]);
        let state = coordinator.state();
        assert_eq!(state.base_offset(), Some(UtcOffset::clamped(3)));
        assert_eq!(state.dst_policy(), Some(DstPolicy::On));
    }

    #[tokio::test]
    async fn repeated_reconciliation_writes_once() {
        let device = MockDevice::default();
        let coordinator = coordinator(&device, DstPolicy::Off, &FixedClock::from_hours(0));

        coordinator.set_base_timezone(3).await.unwrap();
        coordinator.set_base_timezone(3).await.unwrap();
        assert!(!coordinator.apply_timezone().await.unwrap());

        assert_eq!(device.timezone_writes().len(), 1);
    }

    #[tokio::test]
    async fn base_rederived_from_confirmed_index() {
        let device = MockDevice::default();
        // The device settles on UTC+5 whatever is written
        device.force_timezone(17);
        let coordinator = coordinator(&device, DstPolicy::On, &FixedClock::from_hours(0));

        coordinator.set_base_timezone(0).await.unwrap();

        let state = coordinator.state();
        assert_eq!(state.timezone_index(), Some(TimezoneIndex::new(17)));
        assert_eq!(state.base_offset(), Some(UtcOffset::clamped(4)));
    }

    #[tokio::test]
    async fn empty_confirmation_assumes_written_index() {
        let device = MockDevice::default();
        device.silence_reads(CommandId::Timezone);
        let coordinator = coordinator(&device, DstPolicy::Off, &FixedClock::from_hours(0));

        coordinator.set_base_timezone(-5).await.unwrap();

        assert_eq!(coordinator.state().timezone_index(), Some(TimezoneIndex::new(7)));
        assert!(!coordinator.apply_timezone().await.unwrap());
    }

    #[tokio::test]
    async fn base_offset_is_clamped() {
        let device = MockDevice::default();
        let coordinator = coordinator(&device, DstPolicy::Off, &FixedClock::from_hours(0));

        coordinator.set_base_timezone(15).await.unwrap();
        assert_eq!(device.timezone_writes(), vec![TimezoneIndex::new(24)]);

        coordinator.set_base_timezone(-40).await.unwrap();
        assert_eq!(
            device.timezone_writes(),
            vec![TimezoneIndex::new(24), TimezoneIndex::new(0)]
        );
    }

    #[tokio::test]
    async fn unknown_base_does_nothing() {
        let device = MockDevice::default();
        let coordinator = coordinator(&device, DstPolicy::Off, &FixedClock::from_hours(0));

        assert!(!coordinator.apply_timezone().await.unwrap());
        assert!(device.writes().is_empty());
    }

    #[tokio::test]
    async fn auto_follows_host_clock() {
        let device = MockDevice::default();
        let clock = FixedClock::from_hours(1);
        let coordinator = coordinator(&device, DstPolicy::Auto, &clock);

        assert!(coordinator.apply_timezone().await.unwrap());
        clock.set_hours(2);
        assert!(coordinator.apply_timezone().await.unwrap());
        assert!(!coordinator.apply_timezone().await.unwrap());

        assert_eq!(
            device.timezone_writes(),
            vec![TimezoneIndex::new(13), TimezoneIndex::new(14)]
        );
    }

    #[tokio::test]
    async fn first_poll_seeds_reconciliation_memory() {
        let device = MockDevice::with_registers();
        device.set_register(CommandId::Timezone, json!(14));
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(2));

        coordinator.refresh().await.unwrap();

        assert!(!coordinator.apply_timezone().await.unwrap());
        assert!(device.writes().is_empty());
    }

    #[tokio::test]
    async fn later_polls_do_not_reseed_memory() {
        let device = MockDevice::with_registers();
        device.set_register(CommandId::Timezone, json!(14));
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(2));
        coordinator.refresh().await.unwrap();

        // Someone changes the timezone on the clock itself
        device.set_register(CommandId::Timezone, json!(20));
        coordinator.refresh().await.unwrap();

        assert!(!coordinator.apply_timezone().await.unwrap());
        assert_eq!(coordinator.state().timezone_index(), Some(TimezoneIndex::new(20)));
    }

    #[tokio::test]
    async fn forced_dst_builds_on_polled_base() {
        let device = MockDevice::with_registers();
        device.set_register(CommandId::Timezone, json!(14));
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(0));
        coordinator.refresh().await.unwrap();

        // Base 2 from the poll, forced +1
        coordinator.set_dst_policy(DstPolicy::On).await.unwrap();

        assert_eq!(device.timezone_writes(), vec![TimezoneIndex::new(15)]);
        let state = coordinator.state();
        assert_eq!(state.base_offset(), Some(UtcOffset::clamped(2)));
        assert_eq!(state.dst_policy(), Some(DstPolicy::On));
        assert!(!state.base_offset_controlled_by_system());
    }

    #[tokio::test]
    async fn base_set_under_auto_is_kept_for_later_policy() {
        let device = MockDevice::with_registers();
        device.set_register(CommandId::Timezone, json!(14));
        let coordinator = coordinator(&device, DstPolicy::Auto, &FixedClock::from_hours(2));
        coordinator.refresh().await.unwrap();

        // Host clock already matches the device, nothing to write
        coordinator.set_base_timezone(5).await.unwrap();
        assert!(device.writes().is_empty());
        assert_eq!(coordinator.state().base_offset(), Some(UtcOffset::clamped(5)));

        coordinator.set_dst_policy(DstPolicy::Off).await.unwrap();

        assert_eq!(device.timezone_writes(), vec![TimezoneIndex::new(17)]);
        let state = coordinator.state();
        assert_eq!(state.base_offset(), Some(UtcOffset::clamped(5)));
        assert_eq!(state.dst_policy(), Some(DstPolicy::Off));
    }

    #[tokio::test]
    async fn base_matching_applied_index_is_kept() {
        let device = MockDevice::with_registers();
        device.set_register(CommandId::Timezone, json!(24));
        let coordinator = coordinator(&device, DstPolicy::On, &FixedClock::from_hours(0));
        coordinator.refresh().await.unwrap();
        assert_eq!(coordinator.state().base_offset(), Some(UtcOffset::clamped(11)));

        // UTC+12 with forced DST clamps to the index already applied
        coordinator.set_base_timezone(12).await.unwrap();
        assert_eq!(coordinator.state().base_offset(), Some(UtcOffset::clamped(12)));

        coordinator.set_dst_policy(DstPolicy::Off).await.unwrap();

        assert!(device.writes().is_empty());
        let state = coordinator.state();
        assert_eq!(state.base_offset(), Some(UtcOffset::clamped(12)));
        assert_eq!(state.dst_policy(), Some(DstPolicy::Off));
    }

    #[tokio::test]
    async fn failed_timezone_confirmation_is_retried() {
        let device = MockDevice::default();
        device.fail_reads(CommandId::Timezone);
        let coordinator = coordinator(&device, DstPolicy::Off, &FixedClock::from_hours(0));

        let err = coordinator.set_base_timezone(1).await.unwrap_err();
        assert_eq!(err.operation().unwrap().command(), CommandId::Timezone);

        // Not confirmed, so the next attempt writes again
        device.inner.lock().failing_reads.clear();
        coordinator.set_base_timezone(1).await.unwrap();
        assert_eq!(device.timezone_writes().len(), 2);
    }
}

// ============================================================================
// Schedules
// ============================================================================

mod schedules {
    use super::*;

    fn scheduled(
        device: &MockDevice,
        policy: DstPolicy,
        clock: &FixedClock,
        poll: Duration,
    ) -> Coordinator<MockDevice, FixedClock> {
        Coordinator::with_clock(
            device.clone(),
            clock.clone(),
            CoordinatorConfig::default()
                .with_dst_policy(policy)
                .with_poll_interval(poll),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn dst_timer_follows_clock_change() {
        let device = MockDevice::default();
        let clock = FixedClock::from_hours(1);
        let coordinator =
            scheduled(&device, DstPolicy::Auto, &clock, Duration::from_secs(86_400));
        coordinator.apply_timezone().await.unwrap();

        let mut events = coordinator.subscribe();
        coordinator.start_schedules();
        clock.set_hours(2);

        let event = tokio::time::timeout(Duration::from_secs(2 * 3600), events.recv())
            .await
            .unwrap()
            .unwrap();
        let CoordinatorEvent::StateChanged { change, .. } = event else {
            panic!("expected state change");
        };
        assert!(matches!(change, StateChange::Timezone { .. }));
        assert_eq!(
            device.timezone_writes(),
            vec![TimezoneIndex::new(13), TimezoneIndex::new(14)]
        );

        coordinator.shutdown();
        assert!(!coordinator.schedules_running());
    }

    #[tokio::test(start_paused = true)]
    async fn dst_timer_idle_without_auto_policy() {
        let device = MockDevice::default();
        let clock = FixedClock::from_hours(1);
        let coordinator = scheduled(&device, DstPolicy::Off, &clock, Duration::from_secs(86_400));
        coordinator.set_base_timezone(3).await.unwrap();

        coordinator.start_schedules();
        clock.set_hours(5);
        tokio::time::sleep(Duration::from_secs(3 * 3600)).await;

        assert_eq!(device.timezone_writes(), vec![TimezoneIndex::new(15)]);
        coordinator.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn poll_timer_refreshes_and_reports_failures() {
        let device = MockDevice::with_registers();
        let coordinator = scheduled(
            &device,
            DstPolicy::Off,
            &FixedClock::from_hours(0),
            Duration::from_secs(30),
        );
        let mut events = coordinator.subscribe();
        coordinator.start_schedules();
        assert!(coordinator.schedules_running());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(coordinator.is_available());
        assert_eq!(coordinator.state().brightness(), Some(Brightness::new(200)));

        device.fail_reads(CommandId::Mode);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!coordinator.is_available());

        let mut saw_failure = false;
        while let Ok(event) = events.try_recv() {
            saw_failure |= matches!(event, CoordinatorEvent::RefreshFailed { .. });
        }
        assert!(saw_failure);

        coordinator.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_polling() {
        let device = MockDevice::with_registers();
        let coordinator = scheduled(
            &device,
            DstPolicy::Off,
            &FixedClock::from_hours(0),
            Duration::from_secs(30),
        );
        coordinator.start_schedules();
        // Second start is a no-op
        coordinator.start_schedules();
        coordinator.shutdown();

        tokio::time::sleep(Duration::from_secs(120)).await;

        assert!(device.inner.lock().reads.is_empty());
    }
}
