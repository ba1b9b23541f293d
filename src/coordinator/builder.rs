// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WebSocket coordinator builder.

use std::time::Duration;

use crate::error::Error;
use crate::protocol::{WsClient, WsConfig};
use crate::types::DstPolicy;

use super::{Coordinator, CoordinatorConfig};

impl Coordinator<WsClient> {
    /// Creates a builder for a clock reachable at `host`.
    #[must_use]
    pub fn websocket(host: impl Into<String>) -> CoordinatorBuilder {
        CoordinatorBuilder::new(WsConfig::new(host))
    }

    /// Creates a builder from a full connection configuration.
    #[must_use]
    pub fn websocket_config(config: WsConfig) -> CoordinatorBuilder {
        CoordinatorBuilder::new(config)
    }
}

/// Builder for WebSocket-backed coordinators.
///
/// # Examples
///
/// ```no_run
/// use gixie_lib::Coordinator;
/// use gixie_lib::types::DstPolicy;
/// use std::time::Duration;
///
/// # async fn example() -> gixie_lib::Result<()> {
/// // Reads the device and starts polling
/// let coordinator = Coordinator::websocket("192.168.1.60")
///     .with_dst_policy(DstPolicy::Off)
///     .with_poll_interval(Duration::from_secs(60))
///     .build()
///     .await?;
///
/// // No network access until the first refresh
/// let offline = Coordinator::websocket("192.168.1.61").build_without_refresh()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CoordinatorBuilder {
    connection: WsConfig,
    config: CoordinatorConfig,
}

impl CoordinatorBuilder {
    pub(crate) fn new(connection: WsConfig) -> Self {
        Self {
            connection,
            config: CoordinatorConfig::default(),
        }
    }

    /// Sets the WebSocket port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.connection = self.connection.with_port(port);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connection = self.connection.with_timeout(timeout);
        self
    }

    /// Sets the interval between poll cycles.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_poll_interval(interval);
        self
    }

    /// Sets the initial DST policy.
    #[must_use]
    pub fn with_dst_policy(mut self, policy: DstPolicy) -> Self {
        self.config = self.config.with_dst_policy(policy);
        self
    }

    /// Replaces the whole coordinator configuration.
    #[must_use]
    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the connection configuration.
    #[must_use]
    pub fn connection(&self) -> &WsConfig {
        &self.connection
    }

    /// Builds the coordinator, loads the initial state and starts the
    /// schedules.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The host or port is invalid
    /// - The initial poll fails
    pub async fn build(self) -> Result<Coordinator<WsClient>, Error> {
        let coordinator = self.build_without_refresh()?;
        coordinator.first_refresh().await?;
        coordinator.start_schedules();
        Ok(coordinator)
    }

    /// Builds the coordinator without contacting the device.
    ///
    /// Schedules are not started; call
    /// [`start_schedules`](Coordinator::start_schedules) when ready.
    ///
    /// # Errors
    ///
    /// Returns error if the host or port is invalid.
    pub fn build_without_refresh(self) -> Result<Coordinator<WsClient>, Error> {
        let client = self.connection.into_client()?;
        tracing::debug!(url = %client.url(), "Created coordinator");
        Ok(Coordinator::new(client, self.config))
    }
}
