// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recurring refresh and DST tasks.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::protocol::Protocol;
use crate::types::DstPolicy;

use super::{Coordinator, Inner, SystemClock};

/// Shortest period a ticker accepts; tokio rejects a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

impl<P: Protocol + 'static, C: SystemClock> Coordinator<P, C> {
    /// Starts the periodic poll and the DST re-evaluation timer.
    ///
    /// The first tick of each fires one interval from now. Calling this while
    /// the schedules are already running does nothing.
    ///
    /// Tasks hold only a weak reference, so they end on their own once every
    /// clone of the coordinator is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start_schedules(&self) {
        let mut schedules = self.inner.schedules.lock();
        if !schedules.is_empty() {
            return;
        }

        let poll_interval = self.inner.config.poll_interval();
        let dst_interval = self.inner.config.dst_interval();

        schedules.push(spawn_ticker(
            Arc::downgrade(&self.inner),
            poll_interval,
            |coordinator| async move {
                if let Err(e) = coordinator.refresh().await {
                    tracing::warn!(error = %e, "Scheduled refresh failed");
                }
            },
        ));

        schedules.push(spawn_ticker(
            Arc::downgrade(&self.inner),
            dst_interval,
            |coordinator| async move {
                if coordinator.dst_policy() != DstPolicy::Auto {
                    return;
                }
                if let Err(e) = coordinator.apply_timezone().await {
                    tracing::warn!(error = %e, "Scheduled DST adjustment failed");
                }
            },
        ));

        tracing::info!(
            poll_secs = poll_interval.as_secs(),
            dst_secs = dst_interval.as_secs(),
            "Schedules started"
        );
    }

    /// Returns `true` while the schedules are running.
    #[must_use]
    pub fn schedules_running(&self) -> bool {
        !self.inner.schedules.lock().is_empty()
    }

    /// Cancels both schedules.
    ///
    /// An operation already in flight is aborted at its next suspension
    /// point. The coordinator itself stays usable.
    pub fn shutdown(&self) {
        let handles: Vec<_> = self.inner.schedules.lock().drain(..).collect();
        if handles.is_empty() {
            return;
        }
        for handle in handles {
            handle.abort();
        }
        tracing::info!("Schedules stopped");
    }
}

fn spawn_ticker<P, C, F, Fut>(
    inner: Weak<Inner<P, C>>,
    period: Duration,
    mut tick: F,
) -> JoinHandle<()>
where
    P: Protocol + 'static,
    C: SystemClock,
    F: FnMut(Coordinator<P, C>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let period = period.max(MIN_PERIOD);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let Some(inner) = inner.upgrade() else {
                break;
            };
            tick(Coordinator { inner }).await;
        }
    })
}
