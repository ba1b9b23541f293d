// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Gixie library.
//!
//! Transport failures ([`ProtocolError`]) and malformed responses
//! ([`ParseError`]) are collapsed into a single [`OperationError`] at the
//! protocol boundary, so callers of the coordinator only ever see which
//! command failed and a human-readable cause.

use thiserror::Error;

use crate::command::{CommandId, OperationKind};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A single read or write against the device failed.
    #[error("{0}")]
    Operation(#[from] OperationError),

    /// A poll cycle failed; nothing from that cycle was merged.
    #[error("refresh failed: {0}")]
    Refresh(#[source] Box<Error>),
}

impl Error {
    /// Returns the failed device operation, if this error wraps one.
    #[must_use]
    pub fn operation(&self) -> Option<&OperationError> {
        match self {
            Self::Operation(op) => Some(op),
            Self::Refresh(inner) => inner.operation(),
            _ => None,
        }
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An unknown display mode label or value was provided.
    #[error("invalid display mode: {0}")]
    InvalidDisplayMode(String),

    /// An unknown time format label or value was provided.
    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),

    /// An unknown DST policy was provided.
    #[error("invalid DST policy: {0}")]
    InvalidDstPolicy(String),

    /// A hex color string could not be parsed.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// A command number outside the supported set.
    #[error("unknown command number: {0}")]
    UnknownCommand(u16),
}

/// Errors related to the WebSocket transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// WebSocket handshake or frame I/O failed.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The device closed the connection before answering.
    #[error("connection closed by device")]
    Closed,

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid host or port.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The device answered with a non-success status code.
    #[error("device returned status {0}")]
    Rejected(i64),
}

/// Errors related to parsing device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// A failed read or write against the device.
///
/// Every transport, status and decoding failure of a single operation is
/// normalized into this type. Only the message text keeps the distinction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} failed for command {command}: {cause}")]
pub struct OperationError {
    kind: OperationKind,
    command: CommandId,
    cause: String,
}

impl OperationError {
    /// Creates an operation error.
    #[must_use]
    pub fn new(kind: OperationKind, command: CommandId, cause: impl Into<String>) -> Self {
        Self {
            kind,
            command,
            cause: cause.into(),
        }
    }

    /// Creates a read failure.
    #[must_use]
    pub fn read(command: CommandId, cause: impl Into<String>) -> Self {
        Self::new(OperationKind::Read, command, cause)
    }

    /// Creates a write failure.
    #[must_use]
    pub fn write(command: CommandId, cause: impl Into<String>) -> Self {
        Self::new(OperationKind::Write, command, cause)
    }

    /// Returns whether the failed operation was a read or a write.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the command that failed.
    #[must_use]
    pub fn command(&self) -> CommandId {
        self.command
    }

    /// Returns the underlying cause.
    #[must_use]
    pub fn cause(&self) -> &str {
        &self.cause
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
