// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`DeviceState`] is the cached snapshot of a clock, and [`StateChange`] is
//! the merge-update applied to it. The coordinator is the only writer; it
//! merges one change per confirmed operation and one batch per poll.
//!
//! # Examples
//!
//! ```
//! use gixie_lib::state::{DeviceState, StateChange};
//! use gixie_lib::types::RgbColor;
//!
//! let mut state = DeviceState::new();
//! state.apply(&StateChange::color(RgbColor::new(255, 0, 0)));
//!
//! assert_eq!(state.rgb_color(), Some(RgbColor::new(255, 0, 0)));
//! ```

mod device_state;
mod state_change;

pub use device_state::DeviceState;
pub use state_change::StateChange;
