// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WebSocket protocol implementation for Gixie clocks.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::command::{Command, CommandId, ReadCommand, WriteCommand};
use crate::error::{Error, OperationError, ParseError, ProtocolError};
use crate::protocol::{DEFAULT_REQUEST_TIMEOUT, Protocol};
use crate::response::Response;

type DeviceStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// WsConfig
// ============================================================================

/// Connection parameters for a Gixie clock.
///
/// # Examples
///
/// ```
/// use gixie_lib::protocol::WsConfig;
/// use std::time::Duration;
///
/// let config = WsConfig::new("192.168.1.60");
/// assert_eq!(config.url(), "ws://192.168.1.60:81");
///
/// let config = WsConfig::new("clock.local")
///     .with_port(8081)
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.unique_id(), "gixie_clock.local");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsConfig {
    host: String,
    port: u16,
    timeout: Duration,
    drain_grace: Duration,
}

impl WsConfig {
    /// Default WebSocket port of the clock.
    pub const DEFAULT_PORT: u16 = 81;
    /// Default response timeout.
    pub const DEFAULT_TIMEOUT: Duration = DEFAULT_REQUEST_TIMEOUT;
    /// Default time allowed for discarding an unsolicited message.
    pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_millis(500);

    /// Creates a configuration for the specified host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into().trim().to_string(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
            drain_grace: Self::DEFAULT_DRAIN_GRACE,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the response timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how long to wait for an unsolicited message before each request.
    #[must_use]
    pub fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the response timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the drain grace period.
    #[must_use]
    pub fn drain_grace(&self) -> Duration {
        self.drain_grace
    }

    /// Returns a stable identifier for this device.
    #[must_use]
    pub fn unique_id(&self) -> String {
        format!("gixie_{}", self.host)
    }

    /// Builds the WebSocket URL.
    #[must_use]
    pub fn url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("ws://[{}]:{}", self.host, self.port)
        } else {
            format!("ws://{}:{}", self.host, self.port)
        }
    }

    /// Creates a [`WsClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is empty or
    /// malformed, or the port is zero.
    pub fn into_client(self) -> Result<WsClient, ProtocolError> {
        if self.host.is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }
        if self.host.contains(['/', ' ', '?', '#']) {
            return Err(ProtocolError::InvalidAddress(format!(
                "invalid host: {}",
                self.host
            )));
        }
        if self.port == 0 {
            return Err(ProtocolError::InvalidAddress("port must be non-zero".to_string()));
        }

        let url = self.url();
        Ok(WsClient { config: self, url })
    }
}

// ============================================================================
// WsClient
// ============================================================================

/// WebSocket client for a Gixie clock.
///
/// Each operation opens its own connection, discards any message the device
/// pushes on connect, sends one request, waits for one response and closes
/// the connection again, whatever the outcome.
///
/// # Examples
///
/// ```no_run
/// use gixie_lib::command::CommandId;
/// use gixie_lib::protocol::{Protocol, WsClient};
///
/// # async fn example() -> gixie_lib::Result<()> {
/// let client = WsClient::new("192.168.1.60")?;
/// let brightness = client.read(CommandId::Brightness).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WsClient {
    config: WsConfig,
    url: String,
}

impl WsClient {
    /// Creates a client for the specified host on the default port.
    ///
    /// # Errors
    ///
    /// Returns error if the host is invalid.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        WsConfig::new(host).into_client()
    }

    /// Returns the WebSocket URL of the device.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &WsConfig {
        &self.config
    }

    async fn request<C: Command + Sync>(
        &self,
        command: &C,
        timeout: Duration,
    ) -> Result<Option<Value>, Error> {
        let frame = command.to_frame()?;
        let mut stream = self.connect(timeout).await?;
        let outcome = self.transact(&mut stream, frame, timeout).await;
        self.close(stream).await;
        outcome
    }

    async fn connect(&self, timeout: Duration) -> Result<DeviceStream, ProtocolError> {
        let (stream, _) = tokio::time::timeout(timeout, connect_async(self.url.as_str()))
            .await
            .map_err(|_| ProtocolError::Timeout(millis(timeout)))??;
        Ok(stream)
    }

    async fn transact(
        &self,
        stream: &mut DeviceStream,
        frame: String,
        timeout: Duration,
    ) -> Result<Option<Value>, Error> {
        self.drain(stream).await;

        tracing::debug!(url = %self.url, frame = %frame, "Sending request");

        tokio::time::timeout(timeout, stream.send(Message::text(frame)))
            .await
            .map_err(|_| ProtocolError::Timeout(millis(timeout)))?
            .map_err(ProtocolError::from)?;

        let raw = tokio::time::timeout(timeout, next_frame(stream))
            .await
            .map_err(|_| ProtocolError::Timeout(millis(timeout)))??;

        tracing::debug!(url = %self.url, frame = %raw, "Received response");

        Response::parse(&raw)?.into_data()
    }

    /// Discards a message the device may push right after connecting.
    async fn drain(&self, stream: &mut DeviceStream) {
        match tokio::time::timeout(self.config.drain_grace, stream.next()).await {
            Ok(Some(Ok(message))) => {
                tracing::debug!(len = message.len(), "Discarded unsolicited message");
            }
            Ok(Some(Err(e))) => tracing::debug!(error = %e, "Ignoring error while draining"),
            Ok(None) | Err(_) => {}
        }
    }

    async fn close(&self, mut stream: DeviceStream) {
        match tokio::time::timeout(self.config.drain_grace, stream.close(None)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "Close handshake failed"),
            Err(_) => tracing::debug!("Close handshake timed out"),
        }
    }
}

impl Protocol for WsClient {
    fn request_timeout(&self) -> Duration {
        self.config.timeout
    }

    async fn read_with_timeout(
        &self,
        command: CommandId,
        timeout: Duration,
    ) -> Result<Option<Value>, OperationError> {
        self.request(&ReadCommand::new(command), timeout)
            .await
            .map_err(|e| OperationError::read(command, e.to_string()))
    }

    async fn write_with_timeout(
        &self,
        command: &WriteCommand,
        timeout: Duration,
    ) -> Result<(), OperationError> {
        self.request(command, timeout)
            .await
            .map(|_| ())
            .map_err(|e| OperationError::write(command.command_id(), e.to_string()))
    }
}

/// Waits for the next data frame, skipping control frames.
async fn next_frame(stream: &mut DeviceStream) -> Result<String, Error> {
    while let Some(message) = stream.next().await {
        match message.map_err(ProtocolError::from)? {
            Message::Text(text) => return Ok(text.as_str().to_owned()),
            Message::Binary(bytes) => {
                return String::from_utf8(bytes.to_vec()).map_err(|e| {
                    ParseError::UnexpectedFormat(format!("binary frame is not UTF-8: {e}")).into()
                });
            }
            Message::Close(_) => return Err(ProtocolError::Closed.into()),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }
    Err(ProtocolError::Closed.into())
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
