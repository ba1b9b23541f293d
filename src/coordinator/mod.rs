// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling coordinator for a single Gixie clock.
//!
//! The [`Coordinator`] owns the cached [`DeviceState`], polls the device on
//! an interval, and exposes mutations that write a register and then read it
//! back so the snapshot only ever holds values the device confirmed.
//!
//! It also owns timezone reconciliation: the clock's timezone register is
//! derived from a base offset and a [`DstPolicy`](crate::types::DstPolicy),
//! and is only written when the derived value differs from the last one
//! applied.
//!
//! # Examples
//!
//! ```no_run
//! use gixie_lib::Coordinator;
//! use gixie_lib::types::{DisplayMode, DstPolicy};
//!
//! # async fn example() -> gixie_lib::Result<()> {
//! let coordinator = Coordinator::websocket("192.168.1.60").build().await?;
//!
//! coordinator.set_power(true).await?;
//! coordinator.set_mode(DisplayMode::Wordline).await?;
//! coordinator.set_base_timezone(1).await?;
//! coordinator.set_dst_policy(DstPolicy::On).await?;
//!
//! let state = coordinator.state();
//! println!("base offset: {:?}", state.base_offset());
//!
//! coordinator.shutdown();
//! # Ok(())
//! # }
//! ```

mod builder;
mod clock;
mod config;
mod schedule;
mod timezone;

pub use builder::CoordinatorBuilder;
pub use clock::{FixedClock, LocalClock, SystemClock};
pub use config::CoordinatorConfig;
pub use timezone::{base_offset_for, effective_offset};

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::command::{Command, CommandId, WriteCommand};
use crate::error::{Error, OperationError, Result};
use crate::event::{CoordinatorEvent, EventBus};
use crate::protocol::Protocol;
use crate::response::ReadValue;
use crate::state::{DeviceState, StateChange};
use crate::types::{Brightness, DisplayMode, DstPolicy, PowerState, RgbColor, TimeFormat};

use self::timezone::{Plan, TimezoneState};

/// Coordinates polling, mutations and timezone reconciliation for one clock.
///
/// Cloning is cheap; clones share the snapshot, the event bus and the
/// schedules.
///
/// # Type Parameters
///
/// - `P`: the transport, usually [`WsClient`](crate::protocol::WsClient)
/// - `C`: the host clock consulted under `DstPolicy::Auto`
pub struct Coordinator<P, C = LocalClock> {
    inner: Arc<Inner<P, C>>,
}

struct Inner<P, C> {
    protocol: P,
    clock: C,
    config: CoordinatorConfig,
    state: RwLock<DeviceState>,
    timezone: Mutex<TimezoneState>,
    health: Mutex<Health>,
    events: EventBus,
    schedules: Mutex<Vec<JoinHandle<()>>>,
}

#[derive(Debug, Default)]
struct Health {
    available: bool,
    last_refresh: Option<DateTime<Utc>>,
}

impl<P, C> Drop for Inner<P, C> {
    fn drop(&mut self) {
        for handle in self.schedules.get_mut().drain(..) {
            handle.abort();
        }
    }
}

impl<P, C> Clone for Coordinator<P, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, C> fmt::Debug for Coordinator<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let health = self.inner.health.lock();
        f.debug_struct("Coordinator")
            .field("config", &self.inner.config)
            .field("state", &*self.inner.state.read())
            .field("available", &health.available)
            .field("last_refresh", &health.last_refresh)
            .finish_non_exhaustive()
    }
}

impl<P: Protocol> Coordinator<P> {
    /// Creates a coordinator using the host's local timezone.
    ///
    /// Nothing is read from the device until [`refresh`](Self::refresh) or
    /// [`first_refresh`](Self::first_refresh) is called.
    #[must_use]
    pub fn new(protocol: P, config: CoordinatorConfig) -> Self {
        Self::with_clock(protocol, LocalClock, config)
    }
}

impl<P: Protocol, C: SystemClock> Coordinator<P, C> {
    /// Creates a coordinator with a custom host clock.
    #[must_use]
    pub fn with_clock(protocol: P, clock: C, config: CoordinatorConfig) -> Self {
        let timezone = TimezoneState::new(config.dst_policy());
        Self {
            inner: Arc::new(Inner {
                protocol,
                clock,
                config,
                state: RwLock::new(DeviceState::new()),
                timezone: Mutex::new(timezone),
                health: Mutex::new(Health::default()),
                events: EventBus::new(),
                schedules: Mutex::new(Vec::new()),
            }),
        }
    }

    // ========== Accessors ==========

    /// Returns a copy of the current snapshot.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.inner.state.read().clone()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    /// Returns the DST policy currently in effect.
    ///
    /// Unlike the snapshot, this is known before the first poll.
    #[must_use]
    pub fn dst_policy(&self) -> DstPolicy {
        self.inner.timezone.lock().policy()
    }

    /// Subscribes to coordinator events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.inner.events.subscribe()
    }

    /// Returns `true` if the last poll cycle succeeded.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.inner.health.lock().available
    }

    /// Returns when the last poll cycle succeeded.
    #[must_use]
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.health.lock().last_refresh
    }

    // ========== Polling ==========

    /// Reads all six registers and merges them as one change.
    ///
    /// If any read fails the snapshot is left untouched and the coordinator
    /// is marked unavailable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Refresh` wrapping the first failed operation.
    pub async fn refresh(&self) -> Result<()> {
        match self.poll().await {
            Ok(values) => {
                let mut changes = Vec::with_capacity(values.len());
                let mut observed = None;
                for value in values.into_iter().flatten() {
                    match value {
                        ReadValue::Timezone(index) => observed = Some(index),
                        other => changes.extend(StateChange::from_read(other)),
                    }
                }

                let timezone = {
                    let mut tz = self.inner.timezone.lock();
                    match observed {
                        Some(index) => tz.observe_poll(index),
                        None => StateChange::DstPolicy(tz.policy()),
                    }
                };
                changes.push(timezone);

                self.merge(StateChange::Batch(changes));
                self.set_available(true);
                tracing::debug!("Poll cycle complete");
                Ok(())
            }
            Err(e) => {
                let error = Error::Refresh(Box::new(e.into()));
                tracing::debug!(error = %error, "Poll cycle failed");
                self.set_available(false);
                self.inner.events.publish(CoordinatorEvent::RefreshFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Performs the initial poll.
    ///
    /// # Errors
    ///
    /// Returns `Error::Refresh` if the device cannot be read, which means
    /// setup should be retried later.
    pub async fn first_refresh(&self) -> Result<()> {
        self.refresh().await?;
        tracing::info!("Initial state loaded");
        Ok(())
    }

    async fn poll(&self) -> std::result::Result<Vec<Option<ReadValue>>, OperationError> {
        let mut values = Vec::with_capacity(CommandId::ALL.len());
        for command in CommandId::ALL {
            values.push(self.read_value(command).await?);
        }
        Ok(values)
    }

    // ========== Mutations ==========

    /// Turns the display on or off.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` if the write or the confirmation read fails.
    pub async fn set_power(&self, on: bool) -> Result<()> {
        self.write_and_confirm(WriteCommand::Power(PowerState::from(on)))
            .await
    }

    /// Sets the brightness.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` if the write or the confirmation read fails.
    pub async fn set_brightness(&self, brightness: u8) -> Result<()> {
        self.write_and_confirm(WriteCommand::Brightness(Brightness::new(brightness)))
            .await
    }

    /// Sets all digits to one color.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` if the write or the confirmation read fails.
    pub async fn set_color(&self, red: u8, green: u8, blue: u8) -> Result<()> {
        self.set_rgb_color(RgbColor::new(red, green, blue)).await
    }

    /// Sets all digits to one color.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` if the write or the confirmation read fails.
    pub async fn set_rgb_color(&self, color: RgbColor) -> Result<()> {
        self.write_and_confirm(WriteCommand::Color(color)).await
    }

    /// Sets the animation mode.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` if the write or the confirmation read fails.
    pub async fn set_mode(&self, mode: DisplayMode) -> Result<()> {
        self.write_and_confirm(WriteCommand::Mode(mode)).await
    }

    /// Sets the hour format.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` if the write or the confirmation read fails.
    pub async fn set_time_format(&self, format: TimeFormat) -> Result<()> {
        self.write_and_confirm(WriteCommand::TimeFormat(format))
            .await
    }

    /// Turns the display on, then optionally sets brightness and color.
    ///
    /// Stops at the first failing step; earlier steps stay applied.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` from the first failing step.
    pub async fn turn_on(&self, brightness: Option<u8>, color: Option<RgbColor>) -> Result<()> {
        self.set_power(true).await?;
        if let Some(brightness) = brightness {
            self.set_brightness(brightness).await?;
        }
        if let Some(color) = color {
            self.set_rgb_color(color).await?;
        }
        Ok(())
    }

    /// Turns the display off.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` if the write or the confirmation read fails.
    pub async fn turn_off(&self) -> Result<()> {
        self.set_power(false).await
    }

    // ========== Timezone ==========

    /// Sets the standard-time offset, clamped to `-12..=12`, and reconciles.
    ///
    /// Under `DstPolicy::Auto` the host clock wins and the value is replaced
    /// on the next poll.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` if reconciliation fails.
    pub async fn set_base_timezone(&self, hours: i32) -> Result<()> {
        self.inner.timezone.lock().set_base_offset(hours);
        self.reconcile_and_settle().await
    }

    /// Changes the DST policy and reconciles.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` if reconciliation fails.
    pub async fn set_dst_policy(&self, policy: DstPolicy) -> Result<()> {
        self.inner.timezone.lock().set_policy(policy);
        self.reconcile_and_settle().await
    }

    /// Writes the effective timezone to the device if it changed.
    ///
    /// Returns `Ok(false)` without touching the device when the effective
    /// offset cannot be determined yet, or when it encodes to the index this
    /// coordinator last applied.
    ///
    /// # Errors
    ///
    /// Returns `Error::Operation` if the write or the confirmation read fails.
    pub async fn apply_timezone(&self) -> Result<bool> {
        let system = self.inner.clock.utc_offset();
        let observed = self.inner.state.read().timezone_index();
        let plan = self.inner.timezone.lock().plan(observed, system);

        let index = match plan {
            Plan::Indeterminate => {
                tracing::debug!("Base offset unknown, skipping timezone reconciliation");
                return Ok(false);
            }
            Plan::Unchanged(index) => {
                tracing::debug!(index = %index, "Timezone already applied");
                return Ok(false);
            }
            Plan::Write(index) => index,
        };

        tracing::debug!(index = %index, system = %system, "Applying timezone");
        self.write(&WriteCommand::Timezone(index)).await?;

        let confirmed = self
            .read_value(CommandId::Timezone)
            .await?
            .and_then(|value| value.timezone())
            .unwrap_or(index);

        let change = self.inner.timezone.lock().confirm(confirmed);
        tracing::debug!(index = %confirmed, change = ?change, "Timezone confirmed");
        self.merge(change);
        Ok(true)
    }

    /// Reconciles, and when nothing was written publishes the stored base
    /// offset and policy as they are.
    async fn reconcile_and_settle(&self) -> Result<()> {
        if !self.apply_timezone().await? {
            let change = self.inner.timezone.lock().settings();
            self.merge(change);
        }
        Ok(())
    }

    // ========== Internals ==========

    async fn write_and_confirm(&self, command: WriteCommand) -> Result<()> {
        let id = command.command_id();
        self.write(&command).await?;

        match self.read_value(id).await? {
            Some(value) => {
                if let Some(change) = StateChange::from_read(value) {
                    self.merge(change);
                }
            }
            None => tracing::debug!(command = %id, "Confirmation read returned no data"),
        }
        Ok(())
    }

    async fn write(&self, command: &WriteCommand) -> std::result::Result<(), OperationError> {
        match self.inner.config.request_timeout() {
            Some(timeout) => {
                self.inner
                    .protocol
                    .write_with_timeout(command, timeout)
                    .await
            }
            None => self.inner.protocol.write(command).await,
        }
    }

    async fn read_raw(
        &self,
        command: CommandId,
    ) -> std::result::Result<Option<Value>, OperationError> {
        match self.inner.config.request_timeout() {
            Some(timeout) => {
                self.inner
                    .protocol
                    .read_with_timeout(command, timeout)
                    .await
            }
            None => self.inner.protocol.read(command).await,
        }
    }

    /// Reads and decodes a register; a malformed payload is a read failure.
    async fn read_value(
        &self,
        command: CommandId,
    ) -> std::result::Result<Option<ReadValue>, OperationError> {
        self.read_raw(command)
            .await?
            .map(|data| ReadValue::decode(command, &data))
            .transpose()
            .map_err(|e| OperationError::read(command, e.to_string()))
    }

    /// Applies a change to the snapshot and publishes it if anything moved.
    fn merge(&self, change: StateChange) -> bool {
        let new_state = {
            let mut state = self.inner.state.write();
            if !state.apply(&change) {
                return false;
            }
            state.clone()
        };
        self.inner
            .events
            .publish(CoordinatorEvent::StateChanged { change, new_state });
        true
    }

    fn set_available(&self, available: bool) {
        let was_available = {
            let mut health = self.inner.health.lock();
            if available {
                health.last_refresh = Some(Utc::now());
            }
            std::mem::replace(&mut health.available, available)
        };

        if was_available != available {
            if available {
                tracing::info!("Device available");
            } else {
                tracing::warn!("Device unavailable");
            }
            self.inner
                .events
                .publish(CoordinatorEvent::AvailabilityChanged { available });
        }
    }
}
