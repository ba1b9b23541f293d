// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power and brightness types.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Power state of the clock display.
///
/// The device register holds `0` for off and `1` for on.
///
/// # Examples
///
/// ```
/// use gixie_lib::types::PowerState;
///
/// assert_eq!(PowerState::On.as_num(), 1);
/// assert_eq!(PowerState::from(false), PowerState::Off);
/// assert_eq!("on".parse::<PowerState>().unwrap(), PowerState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PowerState {
    /// Display is off.
    Off,
    /// Display is on.
    On,
}

impl PowerState {
    /// Returns the numeric register value.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Returns `true` if the display is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Decodes a register value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPowerState` for anything other than 0 or 1.
    pub fn from_num(value: i64) -> Result<Self, ValueError> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(ValueError::InvalidPowerState(other.to_string())),
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "OFF",
            Self::On => "ON",
        })
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

/// Display brightness as the raw register value.
///
/// The device accepts the full 8-bit range; what it actually applies is
/// whatever the confirming read reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Brightness(u8);

impl Brightness {
    /// Lowest brightness.
    pub const MIN: Self = Self(0);

    /// Highest brightness.
    pub const MAX: Self = Self(u8::MAX);

    /// Creates a brightness value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the register value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Brightness {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| ValueError::OutOfRange {
                min: 0,
                max: i64::from(u8::MAX),
                actual: value,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_from_num() {
        assert_eq!(PowerState::from_num(0).unwrap(), PowerState::Off);
        assert_eq!(PowerState::from_num(1).unwrap(), PowerState::On);
        assert!(PowerState::from_num(2).is_err());
    }

    #[test]
    fn power_from_str() {
        assert_eq!("TRUE".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!(" off ".parse::<PowerState>().unwrap(), PowerState::Off);
        assert!("maybe".parse::<PowerState>().is_err());
    }

    #[test]
    fn brightness_try_from_range() {
        assert_eq!(Brightness::try_from(200_i64).unwrap().value(), 200);
        assert!(Brightness::try_from(256_i64).is_err());
        assert!(Brightness::try_from(-1_i64).is_err());
    }
}
