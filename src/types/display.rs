// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display mode and time format registers.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Animation mode of the clock display (register 211).
///
/// # Examples
///
/// ```
/// use gixie_lib::types::DisplayMode;
///
/// let mode = DisplayMode::try_from(4_u8).unwrap();
/// assert_eq!(mode, DisplayMode::Wordline);
/// assert_eq!(mode.label(), "wordline");
/// assert_eq!("fan-count".parse::<DisplayMode>().unwrap().value(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DisplayMode {
    /// Clock in a single fixed color.
    FixedColorClock,
    /// Clock with all digits cycling the rainbow together.
    OverallRainbowClock,
    /// Clock with each digit cycling the rainbow separately.
    SingleRainbowClock,
    /// Flashing numbers.
    NumberFlash,
    /// Wordline animation.
    Wordline,
    /// User-defined number.
    CustomNumber,
    /// Random zeros and ones.
    ZeroOneRandom,
    /// Follower counter.
    FanCount,
}

impl DisplayMode {
    /// Every mode, in register order.
    pub const ALL: [Self; 8] = [
        Self::FixedColorClock,
        Self::OverallRainbowClock,
        Self::SingleRainbowClock,
        Self::NumberFlash,
        Self::Wordline,
        Self::CustomNumber,
        Self::ZeroOneRandom,
        Self::FanCount,
    ];

    /// Returns the register value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        match self {
            Self::FixedColorClock => 0,
            Self::OverallRainbowClock => 1,
            Self::SingleRainbowClock => 2,
            Self::NumberFlash => 3,
            Self::Wordline => 4,
            Self::CustomNumber => 5,
            Self::ZeroOneRandom => 6,
            Self::FanCount => 7,
        }
    }

    /// Returns the user-facing label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FixedColorClock => "fixed-color-clock",
            Self::OverallRainbowClock => "overall-rainbow-clock",
            Self::SingleRainbowClock => "single-rainbow-clock",
            Self::NumberFlash => "number-flash",
            Self::Wordline => "wordline",
            Self::CustomNumber => "custom-number",
            Self::ZeroOneRandom => "zero-one-random",
            Self::FanCount => "fan-count",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for DisplayMode {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.value() == value)
            .ok_or_else(|| ValueError::InvalidDisplayMode(value.to_string()))
    }
}

impl FromStr for DisplayMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValueError::InvalidDisplayMode(s.to_string()))
    }
}

/// Hour format of the clock (register 213).
///
/// The register holds `0` for 12-hour and `1` for 24-hour display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TimeFormat {
    /// 12-hour clock.
    TwelveHour,
    /// 24-hour clock.
    TwentyFourHour,
}

impl TimeFormat {
    /// Returns the register value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        match self {
            Self::TwelveHour => 0,
            Self::TwentyFourHour => 1,
        }
    }

    /// Returns the user-facing label (`"12h"` or `"24h"`).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TwelveHour => "12h",
            Self::TwentyFourHour => "24h",
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for TimeFormat {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::TwelveHour),
            1 => Ok(Self::TwentyFourHour),
            other => Err(ValueError::InvalidTimeFormat(other.to_string())),
        }
    }
}

impl FromStr for TimeFormat {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "12h" | "12" => Ok(Self::TwelveHour),
            "24h" | "24" => Ok(Self::TwentyFourHour),
            _ => Err(ValueError::InvalidTimeFormat(s.to_string())),
        }
    }
}
