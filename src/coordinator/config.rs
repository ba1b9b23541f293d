// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator configuration.

use std::time::Duration;

use crate::types::DstPolicy;

/// Scheduling and policy settings for a [`Coordinator`](super::Coordinator).
///
/// # Examples
///
/// ```
/// use gixie_lib::CoordinatorConfig;
/// use gixie_lib::types::DstPolicy;
/// use std::time::Duration;
///
/// let config = CoordinatorConfig::default()
///     .with_poll_interval(Duration::from_secs(10))
///     .with_dst_policy(DstPolicy::Off);
///
/// assert_eq!(config.poll_interval(), Duration::from_secs(10));
/// assert_eq!(config.dst_interval(), Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    poll_interval: Duration,
    dst_interval: Duration,
    dst_policy: DstPolicy,
    request_timeout: Option<Duration>,
}

impl CoordinatorConfig {
    /// Default interval between poll cycles.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
    /// Default interval between automatic DST re-evaluations.
    pub const DEFAULT_DST_INTERVAL: Duration = Duration::from_secs(3600);

    /// Sets the interval between poll cycles.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the interval between DST re-evaluations.
    #[must_use]
    pub fn with_dst_interval(mut self, interval: Duration) -> Self {
        self.dst_interval = interval;
        self
    }

    /// Sets the policy the coordinator starts with.
    #[must_use]
    pub fn with_dst_policy(mut self, policy: DstPolicy) -> Self {
        self.dst_policy = policy;
        self
    }

    /// Overrides the transport's own timeout for every request.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Returns the interval between poll cycles.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the interval between DST re-evaluations.
    #[must_use]
    pub fn dst_interval(&self) -> Duration {
        self.dst_interval
    }

    /// Returns the initial DST policy.
    #[must_use]
    pub fn dst_policy(&self) -> DstPolicy {
        self.dst_policy
    }

    /// Returns the request timeout override, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            dst_interval: Self::DEFAULT_DST_INTERVAL,
            dst_policy: DstPolicy::Auto,
            request_timeout: None,
        }
    }
}
