// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timezone offset, device index and DST policy types.
//!
//! The clock stores its timezone in a single register holding
//! `offset + 12`, so the whole-hour offsets `-12..=12` map to the indices
//! `0..=24`. Clamping happens at both boundaries: [`UtcOffset::clamped`] when
//! encoding and [`TimezoneIndex::offset`] when decoding.
//!
//! # Examples
//!
//! ```
//! use gixie_lib::types::{TimezoneIndex, UtcOffset};
//!
//! let index = UtcOffset::clamped(3).to_index();
//! assert_eq!(index.value(), 15);
//! assert_eq!(index.offset().hours(), 3);
//!
//! // Offsets beyond the device range are clamped before encoding
//! assert_eq!(UtcOffset::clamped(15).to_index(), TimezoneIndex::new(24));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Whole-hour offset from UTC, always within `-12..=12`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct UtcOffset(i8);

impl UtcOffset {
    /// Smallest offset the device can represent.
    pub const MIN_HOURS: i32 = -12;

    /// Largest offset the device can represent.
    pub const MAX_HOURS: i32 = 12;

    /// UTC itself.
    pub const UTC: Self = Self(0);

    /// Creates an offset, rejecting values outside `-12..=12`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` for offsets the device cannot hold.
    pub fn new(hours: i32) -> Result<Self, ValueError> {
        if (Self::MIN_HOURS..=Self::MAX_HOURS).contains(&hours) {
            Ok(Self::clamped(hours))
        } else {
            Err(ValueError::OutOfRange {
                min: i64::from(Self::MIN_HOURS),
                max: i64::from(Self::MAX_HOURS),
                actual: i64::from(hours),
            })
        }
    }

    /// Creates an offset, clamping to `-12..=12`.
    #[must_use]
    pub fn clamped(hours: i32) -> Self {
        let hours = hours.clamp(Self::MIN_HOURS, Self::MAX_HOURS);
        // Safe: clamped to -12..=12
        #[allow(clippy::cast_possible_truncation)]
        Self(hours as i8)
    }

    /// Returns the offset in hours.
    #[must_use]
    pub fn hours(&self) -> i32 {
        i32::from(self.0)
    }

    /// Shifts the offset, clamping the result.
    #[must_use]
    pub fn shifted(self, hours: i32) -> Self {
        Self::clamped(self.hours().saturating_add(hours))
    }

    /// Encodes the offset as the device register value.
    #[must_use]
    pub fn to_index(self) -> TimezoneIndex {
        TimezoneIndex(self.hours() - Self::MIN_HOURS)
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UTC{:+}", self.0)
    }
}

/// Raw value of the device timezone register.
///
/// Holds whatever the device reported. Values written by this library are
/// always in `0..=24`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TimezoneIndex(i32);

impl TimezoneIndex {
    /// Wraps a raw register value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw register value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Returns `true` if the value is a valid encoding.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (0..=24).contains(&self.0)
    }

    /// Decodes the register into a clamped offset.
    #[must_use]
    pub fn offset(&self) -> UtcOffset {
        UtcOffset::clamped(self.0.saturating_add(UtcOffset::MIN_HOURS))
    }
}

impl fmt::Display for TimezoneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UtcOffset> for TimezoneIndex {
    fn from(offset: UtcOffset) -> Self {
        offset.to_index()
    }
}

/// How the effective timezone is derived from the base offset.
///
/// # Examples
///
/// ```
/// use gixie_lib::types::DstPolicy;
///
/// assert_eq!(DstPolicy::default(), DstPolicy::Auto);
/// assert_eq!("on".parse::<DstPolicy>().unwrap(), DstPolicy::On);
/// assert_eq!(DstPolicy::Off.as_str(), "off");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DstPolicy {
    /// Use the base offset unchanged.
    Off,
    /// Force the base offset forward by one hour.
    On,
    /// Follow the host clock's current UTC offset and ignore the base offset.
    #[default]
    Auto,
}

impl DstPolicy {
    /// Every policy, in display order.
    pub const ALL: [Self; 3] = [Self::Off, Self::On, Self::Auto];

    /// Returns the lowercase option name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for DstPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DstPolicy {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            "auto" => Ok(Self::Auto),
            _ => Err(ValueError::InvalidDstPolicy(s.to_string())),
        }
    }
}
