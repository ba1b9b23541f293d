// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting coordinator events.

use tokio::sync::broadcast;

use super::CoordinatorEvent;

/// Events buffered per subscriber before the oldest are dropped.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fan-out channel for [`CoordinatorEvent`]s.
///
/// A subscriber that falls more than the channel capacity behind loses the
/// oldest events and sees `RecvError::Lagged` on its next receive. Events
/// published while nobody is subscribed are dropped.
///
/// # Examples
///
/// ```
/// use gixie_lib::event::{CoordinatorEvent, EventBus};
///
/// let bus = EventBus::new();
/// let _rx = bus.subscribe();
///
/// let delivered = bus.publish(CoordinatorEvent::RefreshFailed {
///     error: "read failed for command power (15): request timed out after 2000 ms".to_string(),
/// });
/// assert_eq!(delivered, 1);
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoordinatorEvent>,
}

impl EventBus {
    /// Creates a bus with room for 256 pending events per subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus with a custom per-subscriber capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns a receiver for every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Sends an event to every subscriber and returns how many got it.
    pub fn publish(&self, event: CoordinatorEvent) -> usize {
        let kind = event.kind();
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(event = kind, delivered, "Published coordinator event");
        delivered
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
