// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use crate::response::ColorResponse;
use crate::types::{
    Brightness, DisplayMode, DstPolicy, PowerState, RgbColor, TimeFormat, TimezoneIndex,
    UtcOffset,
};

use super::StateChange;

/// Cached view of a Gixie clock.
///
/// All fields are optional because nothing is known until the first poll.
/// Fields are only ever modified through [`apply`](Self::apply).
///
/// # Examples
///
/// ```
/// use gixie_lib::state::{DeviceState, StateChange};
/// use gixie_lib::types::{Brightness, PowerState};
///
/// let mut state = DeviceState::new();
/// state.apply(&StateChange::Batch(vec![
///     StateChange::Power(PowerState::On),
///     StateChange::Brightness(Brightness::new(120)),
/// ]));
///
/// assert!(state.is_on());
/// assert_eq!(state.brightness(), Some(Brightness::new(120)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceState {
    color: Option<ColorResponse>,
    brightness: Option<Brightness>,
    power: Option<PowerState>,
    timezone_index: Option<TimezoneIndex>,
    base_offset: Option<UtcOffset>,
    mode: Option<u8>,
    time_format: Option<TimeFormat>,
    dst_policy: Option<DstPolicy>,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` until the first value has been merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    // ========== Light ==========

    /// Returns the color register as reported.
    #[must_use]
    pub fn color(&self) -> Option<&ColorResponse> {
        self.color.as_ref()
    }

    /// Returns the canonical color (first reported entry).
    #[must_use]
    pub fn rgb_color(&self) -> Option<RgbColor> {
        self.color.as_ref().and_then(ColorResponse::primary)
    }

    /// Returns the brightness.
    #[must_use]
    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    /// Returns the power state.
    #[must_use]
    pub fn power(&self) -> Option<PowerState> {
        self.power
    }

    /// Returns `true` if the display is known to be on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.power.is_some_and(|p| p.is_on())
    }

    // ========== Display ==========

    /// Returns the raw mode register.
    #[must_use]
    pub fn mode(&self) -> Option<u8> {
        self.mode
    }

    /// Returns the mode, if it is one of the known modes.
    #[must_use]
    pub fn display_mode(&self) -> Option<DisplayMode> {
        self.mode.and_then(|m| DisplayMode::try_from(m).ok())
    }

    /// Returns the hour format.
    #[must_use]
    pub fn time_format(&self) -> Option<TimeFormat> {
        self.time_format
    }

    // ========== Timezone ==========

    /// Returns the last observed timezone register.
    #[must_use]
    pub fn timezone_index(&self) -> Option<TimezoneIndex> {
        self.timezone_index
    }

    /// Returns the standard-time offset.
    #[must_use]
    pub fn base_offset(&self) -> Option<UtcOffset> {
        self.base_offset
    }

    /// Returns the DST policy.
    #[must_use]
    pub fn dst_policy(&self) -> Option<DstPolicy> {
        self.dst_policy
    }

    /// Returns `true` when the offset follows the host clock, so a manually
    /// entered base offset has no effect.
    #[must_use]
    pub fn base_offset_controlled_by_system(&self) -> bool {
        self.dst_policy == Some(DstPolicy::Auto)
    }

    // ========== State Changes ==========

    /// Applies a state change and returns whether the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Color(color) => replace(&mut self.color, color.clone()),
            StateChange::Brightness(brightness) => replace(&mut self.brightness, *brightness),
            StateChange::Power(state) => replace(&mut self.power, *state),
            StateChange::Timezone {
                index,
                base_offset,
                policy,
            } => {
                let index_changed = replace(&mut self.timezone_index, *index);
                let base_changed = replace(&mut self.base_offset, *base_offset);
                let policy_changed = replace(&mut self.dst_policy, *policy);
                index_changed || base_changed || policy_changed
            }
            StateChange::BaseOffset(base_offset) => replace(&mut self.base_offset, *base_offset),
            StateChange::DstPolicy(policy) => replace(&mut self.dst_policy, *policy),
            StateChange::Mode(mode) => replace(&mut self.mode, *mode),
            StateChange::TimeFormat(format) => replace(&mut self.time_format, *format),
            StateChange::Batch(changes) => changes
                .iter()
                .fold(false, |changed, change| self.apply(change) || changed),
        }
    }
}

/// Stores `value` and reports whether it differed.
fn replace<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        false
    } else {
        *slot = Some(value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let state = DeviceState::new();
        assert!(state.is_empty());
        assert!(!state.is_on());
        assert_eq!(state.rgb_color(), None);
        assert_eq!(state.dst_policy(), None);
    }

    #[test]
    fn apply_reports_changes() {
        let mut state = DeviceState::new();
        assert!(state.apply(&StateChange::Mode(2)));
        assert!(!state.apply(&StateChange::Mode(2)));
        assert_eq!(state.display_mode(), Some(DisplayMode::SingleRainbowClock));
    }

    #[test]
    fn unknown_mode_keeps_raw_value() {
        let mut state = DeviceState::new();
        state.apply(&StateChange::Mode(42));
        assert_eq!(state.mode(), Some(42));
        assert_eq!(state.display_mode(), None);
    }

    #[test]
    fn timezone_change_updates_all_three_fields() {
        let mut state = DeviceState::new();
        let changed = state.apply(&StateChange::Timezone {
            index: TimezoneIndex::new(16),
            base_offset: UtcOffset::clamped(3),
            policy: DstPolicy::On,
        });

        assert!(changed);
        assert_eq!(state.timezone_index(), Some(TimezoneIndex::new(16)));
        assert_eq!(state.base_offset(), Some(UtcOffset::clamped(3)));
        assert_eq!(state.dst_policy(), Some(DstPolicy::On));
        assert!(!state.base_offset_controlled_by_system());
    }

    #[test]
    fn batch_applies_every_change() {
        let mut state = DeviceState::new();
        let changed = state.apply(&StateChange::Batch(vec![
            StateChange::Power(PowerState::On),
            StateChange::color(RgbColor::new(10, 20, 30)),
            StateChange::TimeFormat(TimeFormat::TwentyFourHour),
        ]));

        assert!(changed);
        assert!(state.is_on());
        assert_eq!(state.rgb_color(), Some(RgbColor::new(10, 20, 30)));
        assert_eq!(state.time_format(), Some(TimeFormat::TwentyFourHour));
    }

    #[test]
    fn batch_without_differences_reports_unchanged() {
        let mut state = DeviceState::new();
        let batch = StateChange::Batch(vec![
            StateChange::Power(PowerState::Off),
            StateChange::Brightness(Brightness::new(10)),
        ]);
        assert!(state.apply(&batch));
        assert!(!state.apply(&batch));
    }
}
