// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type-safe wrappers for Gixie register values.
//!
//! These types validate or clamp their values at construction so that
//! commands built from them always carry something the device understands.

mod display;
mod power;
mod rgb_color;
mod timezone;

pub use display::{DisplayMode, TimeFormat};
pub use power::{Brightness, PowerState};
pub use rgb_color::RgbColor;
pub use timezone::{DstPolicy, TimezoneIndex, UtcOffset};
