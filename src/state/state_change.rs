// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] is the only way to modify a
//! [`DeviceState`](super::DeviceState). Each variant carries the fields that
//! must move together; a poll cycle is applied as one [`StateChange::Batch`].
//!
//! # Examples
//!
//! ```
//! use gixie_lib::state::{DeviceState, StateChange};
//! use gixie_lib::types::PowerState;
//!
//! let mut state = DeviceState::new();
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::Power(PowerState::On)));
//! assert!(!state.apply(&StateChange::Power(PowerState::On)));
//! ```

use crate::response::{ColorResponse, ReadValue};
use crate::types::{
    Brightness, DstPolicy, PowerState, RgbColor, TimeFormat, TimezoneIndex, UtcOffset,
};

/// Represents a change in device state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Color register changed; stored as reported.
    Color(ColorResponse),

    /// Brightness changed.
    Brightness(Brightness),

    /// Power changed.
    Power(PowerState),

    /// Timezone register, base offset and policy, updated together.
    Timezone {
        /// Observed register value.
        index: TimezoneIndex,
        /// Base offset consistent with `index` under `policy`.
        base_offset: UtcOffset,
        /// Policy in effect.
        policy: DstPolicy,
    },

    /// Base offset set without a register write.
    BaseOffset(UtcOffset),

    /// Policy changed without a timezone observation.
    DstPolicy(DstPolicy),

    /// Raw mode register changed.
    Mode(u8),

    /// Hour format changed.
    TimeFormat(TimeFormat),

    /// Multiple changes at once.
    ///
    /// Used for a complete poll cycle.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a color change holding four copies of `color`.
    #[must_use]
    pub fn color(color: RgbColor) -> Self {
        Self::Color(ColorResponse::new(vec![color; 4]))
    }

    /// Maps a non-timezone register read to its change.
    ///
    /// Timezone reads need the base offset derived alongside them and return
    /// `None` here.
    #[must_use]
    pub fn from_read(value: ReadValue) -> Option<Self> {
        match value {
            ReadValue::Color(color) => Some(Self::Color(color)),
            ReadValue::Brightness(brightness) => Some(Self::Brightness(brightness)),
            ReadValue::Power(state) => Some(Self::Power(state)),
            ReadValue::Mode(mode) => Some(Self::Mode(mode)),
            ReadValue::TimeFormat(format) => Some(Self::TimeFormat(format)),
            ReadValue::Timezone(_) => None,
        }
    }

    /// Returns `true` if this is a batch.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Flattens nested batches into individual changes.
    #[must_use]
    pub fn flatten(self) -> Vec<StateChange> {
        match self {
            Self::Batch(changes) => changes.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
