// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host clock abstraction.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::UtcOffset;

const SECONDS_PER_HOUR: i32 = 3600;

/// Source of the host's current UTC offset.
///
/// Consulted every time the coordinator reconciles under
/// [`DstPolicy::Auto`](crate::types::DstPolicy::Auto).
pub trait SystemClock: Send + Sync + 'static {
    /// Returns the current UTC offset in seconds.
    fn utc_offset_seconds(&self) -> i32;

    /// Returns the current UTC offset in whole hours, rounded down and
    /// clamped to the device range.
    fn utc_offset(&self) -> UtcOffset {
        UtcOffset::clamped(self.utc_offset_seconds().div_euclid(SECONDS_PER_HOUR))
    }
}

/// Clock backed by the operating system's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl SystemClock for LocalClock {
    fn utc_offset_seconds(&self) -> i32 {
        chrono::Local::now().offset().local_minus_utc()
    }
}

/// Clock with a settable offset.
///
/// Clones share the same offset, so a test can keep a handle and simulate a
/// DST transition while the coordinator owns another.
///
/// # Examples
///
/// ```
/// use gixie_lib::coordinator::{FixedClock, SystemClock};
///
/// let clock = FixedClock::from_hours(1);
/// let handle = clock.clone();
/// handle.set_hours(2);
/// assert_eq!(clock.utc_offset().hours(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    seconds: Arc<Mutex<i32>>,
}

impl FixedClock {
    /// Creates a clock reporting `seconds` east of UTC.
    #[must_use]
    pub fn from_seconds(seconds: i32) -> Self {
        Self {
            seconds: Arc::new(Mutex::new(seconds)),
        }
    }

    /// Creates a clock reporting `hours` east of UTC.
    #[must_use]
    pub fn from_hours(hours: i32) -> Self {
        Self::from_seconds(hours.saturating_mul(SECONDS_PER_HOUR))
    }

    /// Changes the reported offset.
    pub fn set_seconds(&self, seconds: i32) {
        *self.seconds.lock() = seconds;
    }

    /// Changes the reported offset to whole hours.
    pub fn set_hours(&self, hours: i32) {
        self.set_seconds(hours.saturating_mul(SECONDS_PER_HOUR));
    }
}

impl SystemClock for FixedClock {
    fn utc_offset_seconds(&self) -> i32 {
        *self.seconds.lock()
    }
}
