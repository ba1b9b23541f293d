// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementations for communicating with Gixie clocks.
//!
//! - [`WsClient`]: one WebSocket connection per operation
//!
//! The [`Protocol`] trait is the seam the [`Coordinator`](crate::Coordinator)
//! drives. Implementations perform exactly one read or one write per call
//! and report every failure as an [`OperationError`].

mod websocket;

pub use websocket::{WsClient, WsConfig};

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use crate::command::{CommandId, WriteCommand};
use crate::error::OperationError;

/// Default time to wait for a response.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Trait for transports that can read and write device registers.
pub trait Protocol: Send + Sync {
    /// Returns the timeout used by [`read`](Self::read) and
    /// [`write`](Self::write).
    fn request_timeout(&self) -> Duration {
        DEFAULT_REQUEST_TIMEOUT
    }

    /// Reads a register.
    ///
    /// Returns `Ok(None)` when the device answered successfully without a
    /// payload.
    ///
    /// # Errors
    ///
    /// Returns `OperationError` on any transport, status or format failure,
    /// including the timeout elapsing.
    fn read_with_timeout(
        &self,
        command: CommandId,
        timeout: Duration,
    ) -> impl Future<Output = Result<Option<Value>, OperationError>> + Send;

    /// Writes a register.
    ///
    /// Success means the device accepted the command, not that the register
    /// now holds the written value.
    ///
    /// # Errors
    ///
    /// Returns `OperationError` on any transport or status failure.
    fn write_with_timeout(
        &self,
        command: &WriteCommand,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), OperationError>> + Send;

    /// Reads a register with the default timeout.
    ///
    /// # Errors
    ///
    /// See [`read_with_timeout`](Self::read_with_timeout).
    fn read(
        &self,
        command: CommandId,
    ) -> impl Future<Output = Result<Option<Value>, OperationError>> + Send {
        self.read_with_timeout(command, self.request_timeout())
    }

    /// Writes a register with the default timeout.
    ///
    /// # Errors
    ///
    /// See [`write_with_timeout`](Self::write_with_timeout).
    fn write(
        &self,
        command: &WriteCommand,
    ) -> impl Future<Output = Result<(), OperationError>> + Send {
        self.write_with_timeout(command, self.request_timeout())
    }
}
