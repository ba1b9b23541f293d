// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator event types.

use crate::state::{DeviceState, StateChange};

/// Events emitted by a [`Coordinator`](crate::Coordinator).
///
/// # Examples
///
/// ```
/// use gixie_lib::event::CoordinatorEvent;
/// use gixie_lib::state::{DeviceState, StateChange};
/// use gixie_lib::types::PowerState;
///
/// let event = CoordinatorEvent::StateChanged {
///     change: StateChange::Power(PowerState::On),
///     new_state: DeviceState::new(),
/// };
/// assert!(event.is_state_change());
/// ```
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum CoordinatorEvent {
    /// A change was merged into the snapshot.
    ///
    /// Emitted once per poll cycle and once per confirmed mutation, but only
    /// when the merge actually modified the snapshot.
    StateChanged {
        /// The merged change.
        change: StateChange,
        /// The complete snapshot after the merge.
        new_state: DeviceState,
    },

    /// A poll cycle failed and nothing was merged.
    RefreshFailed {
        /// Description of the failure.
        error: String,
    },

    /// The snapshot switched between fresh and stale.
    AvailabilityChanged {
        /// Whether the last poll cycle succeeded.
        available: bool,
    },
}

impl CoordinatorEvent {
    /// Returns a short name for the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StateChanged { .. } => "state_changed",
            Self::RefreshFailed { .. } => "refresh_failed",
            Self::AvailabilityChanged { .. } => "availability_changed",
        }
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns the new snapshot carried by a state change event.
    #[must_use]
    pub fn new_state(&self) -> Option<&DeviceState> {
        match self {
            Self::StateChanged { new_state, .. } => Some(new_state),
            _ => None,
        }
    }
}
