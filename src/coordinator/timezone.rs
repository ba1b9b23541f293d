// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timezone and DST reconciliation.
//!
//! The clock only knows a single timezone register. The coordinator keeps a
//! *base offset* (standard time) and a [`DstPolicy`], and derives the
//! *effective offset* the register should hold from them:
//!
//! | Policy | Effective offset           |
//! |--------|----------------------------|
//! | `Off`  | base                       |
//! | `On`   | base + 1                   |
//! | `Auto` | host UTC offset, floored   |
//!
//! Everything is clamped to `-12..=12` hours. After a write the base offset is
//! re-derived from what the device confirmed, so a forced `+1` never leaks
//! into the base.

use crate::state::StateChange;
use crate::types::{DstPolicy, TimezoneIndex, UtcOffset};

/// Computes the offset the device should display.
///
/// Returns `None` when the policy needs a base offset that is not known.
///
/// # Examples
///
/// ```
/// use gixie_lib::coordinator::effective_offset;
/// use gixie_lib::types::{DstPolicy, UtcOffset};
///
/// let base = Some(UtcOffset::clamped(3));
/// let system = UtcOffset::clamped(-5);
///
/// assert_eq!(effective_offset(DstPolicy::Off, base, system), Some(UtcOffset::clamped(3)));
/// assert_eq!(effective_offset(DstPolicy::On, base, system), Some(UtcOffset::clamped(4)));
/// assert_eq!(effective_offset(DstPolicy::Auto, None, system), Some(system));
/// assert_eq!(effective_offset(DstPolicy::On, None, system), None);
/// ```
#[must_use]
pub fn effective_offset(
    policy: DstPolicy,
    base: Option<UtcOffset>,
    system: UtcOffset,
) -> Option<UtcOffset> {
    match policy {
        DstPolicy::Auto => Some(system),
        DstPolicy::On => base.map(|b| b.shifted(1)),
        DstPolicy::Off => base,
    }
}

/// Derives the base offset consistent with a register value under `policy`.
///
/// # Examples
///
/// ```
/// use gixie_lib::coordinator::base_offset_for;
/// use gixie_lib::types::{DstPolicy, TimezoneIndex};
///
/// // Index 17 displays UTC+5; with DST forced on the base is UTC+4
/// assert_eq!(base_offset_for(TimezoneIndex::new(17), DstPolicy::On).hours(), 4);
/// assert_eq!(base_offset_for(TimezoneIndex::new(17), DstPolicy::Off).hours(), 5);
/// ```
#[must_use]
pub fn base_offset_for(index: TimezoneIndex, policy: DstPolicy) -> UtcOffset {
    let displayed = index.value().saturating_add(UtcOffset::MIN_HOURS);
    match policy {
        DstPolicy::On => UtcOffset::clamped(displayed.saturating_sub(1)),
        DstPolicy::Off | DstPolicy::Auto => UtcOffset::clamped(displayed),
    }
}

/// Outcome of planning a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Plan {
    /// No base offset is known and the policy needs one.
    Indeterminate,
    /// The register already holds the target, as far as this process knows.
    Unchanged(TimezoneIndex),
    /// The register must be written.
    Write(TimezoneIndex),
}

/// Coordinator-private timezone bookkeeping.
#[derive(Debug, Clone)]
pub(crate) struct TimezoneState {
    policy: DstPolicy,
    base_offset: Option<UtcOffset>,
    /// Last index written and confirmed, or seeded by the first poll.
    last_applied: Option<TimezoneIndex>,
}

impl TimezoneState {
    pub(crate) fn new(policy: DstPolicy) -> Self {
        Self {
            policy,
            base_offset: None,
            last_applied: None,
        }
    }

    pub(crate) fn policy(&self) -> DstPolicy {
        self.policy
    }

    pub(crate) fn set_policy(&mut self, policy: DstPolicy) {
        self.policy = policy;
    }

    pub(crate) fn set_base_offset(&mut self, hours: i32) {
        self.base_offset = Some(UtcOffset::clamped(hours));
    }

    /// Decides whether the register needs writing.
    ///
    /// An unknown base is seeded from the observed register first.
    pub(crate) fn plan(&mut self, observed: Option<TimezoneIndex>, system: UtcOffset) -> Plan {
        if self.base_offset.is_none() {
            self.base_offset = observed.map(|index| index.offset());
        }

        let Some(target) = effective_offset(self.policy, self.base_offset, system) else {
            return Plan::Indeterminate;
        };

        let index = target.to_index();
        if self.last_applied == Some(index) {
            Plan::Unchanged(index)
        } else {
            Plan::Write(index)
        }
    }

    /// Records an index the device confirmed after a write.
    pub(crate) fn confirm(&mut self, index: TimezoneIndex) -> StateChange {
        self.last_applied = Some(index);
        self.observe(index)
    }

    /// Records an index read by a poll cycle.
    ///
    /// Only the first poll seeds the reconciliation memory.
    pub(crate) fn observe_poll(&mut self, index: TimezoneIndex) -> StateChange {
        if self.last_applied.is_none() {
            self.last_applied = Some(index);
        }
        self.observe(index)
    }

    /// Reports the stored base offset and policy without touching either.
    pub(crate) fn settings(&self) -> StateChange {
        match self.base_offset {
            Some(base_offset) => StateChange::Batch(vec![
                StateChange::BaseOffset(base_offset),
                StateChange::DstPolicy(self.policy),
            ]),
            None => StateChange::DstPolicy(self.policy),
        }
    }

    fn observe(&mut self, index: TimezoneIndex) -> StateChange {
        let base_offset = base_offset_for(index, self.policy);
        self.base_offset = Some(base_offset);
        StateChange::Timezone {
            index,
            base_offset,
            policy: self.policy,
        }
    }
}
