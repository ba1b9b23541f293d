// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gixie command definitions.
//!
//! Every device operation addresses one register by number and is either a
//! read or a write. Requests are JSON objects:
//!
//! | Operation | Frame |
//! |-----------|-------|
//! | Read | `{"cmdType": 0, "cmdNum": N}` |
//! | Write | `{"cmdType": 1, "cmdNum": N, "cmdCtx": CTX}` |
//!
//! # Examples
//!
//! ```
//! use gixie_lib::command::{Command, CommandId, ReadCommand, WriteCommand};
//! use gixie_lib::types::PowerState;
//!
//! let read = ReadCommand::new(CommandId::Power);
//! assert_eq!(read.to_frame().unwrap(), r#"{"cmdType":0,"cmdNum":15}"#);
//!
//! let write = WriteCommand::Power(PowerState::On);
//! assert_eq!(
//!     write.to_frame().unwrap(),
//!     r#"{"cmdType":1,"cmdNum":15,"cmdCtx":{"value":1}}"#
//! );
//! ```

mod write;

pub use write::WriteCommand;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ParseError, ValueError};

/// Register addressed by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CommandId {
    /// Display color, four RGB entries.
    Color,
    /// Display brightness.
    Brightness,
    /// Display power.
    Power,
    /// Timezone index (`offset + 12`).
    Timezone,
    /// Animation mode.
    Mode,
    /// 12/24-hour format.
    TimeFormat,
}

impl CommandId {
    /// Every register, in poll order.
    pub const ALL: [Self; 6] = [
        Self::Color,
        Self::Brightness,
        Self::Power,
        Self::Timezone,
        Self::Mode,
        Self::TimeFormat,
    ];

    /// Returns the command number sent as `cmdNum`.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::Color => 9,
            Self::Brightness => 14,
            Self::Power => 15,
            Self::Timezone => 16,
            Self::Mode => 211,
            Self::TimeFormat => 213,
        }
    }

    /// Returns a short lowercase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Brightness => "brightness",
            Self::Power => "power",
            Self::Timezone => "timezone",
            Self::Mode => "mode",
            Self::TimeFormat => "time-format",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl TryFrom<u16> for CommandId {
    type Error = ValueError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|id| id.code() == code)
            .ok_or(ValueError::UnknownCommand(code))
    }
}

/// Whether a request reads or writes its register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OperationKind {
    /// `cmdType: 0`
    Read,
    /// `cmdType: 1`
    Write,
}

impl OperationKind {
    /// Returns the value sent as `cmdType`.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Read => 0,
            Self::Write => 1,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

/// Request envelope as sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    cmd_type: u8,
    cmd_num: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    cmd_ctx: Option<Value>,
}

impl Request {
    /// Returns the operation kind code.
    #[must_use]
    pub fn cmd_type(&self) -> u8 {
        self.cmd_type
    }

    /// Returns the command number.
    #[must_use]
    pub fn cmd_num(&self) -> u16 {
        self.cmd_num
    }

    /// Returns the write context, if any.
    #[must_use]
    pub fn cmd_ctx(&self) -> Option<&Value> {
        self.cmd_ctx.as_ref()
    }
}

/// A command that can be sent to a Gixie clock.
pub trait Command {
    /// Returns the addressed register.
    fn command_id(&self) -> CommandId;

    /// Returns whether this reads or writes the register.
    fn kind(&self) -> OperationKind;

    /// Returns the write context, `None` for reads.
    fn context(&self) -> Option<Value>;

    /// Builds the request envelope.
    fn to_request(&self) -> Request {
        Request {
            cmd_type: self.kind().code(),
            cmd_num: self.command_id().code(),
            cmd_ctx: self.context(),
        }
    }

    /// Serializes the request envelope to a text frame.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if serialization fails.
    fn to_frame(&self) -> Result<String, ParseError> {
        serde_json::to_string(&self.to_request()).map_err(ParseError::Json)
    }
}

/// Read of a single register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadCommand(CommandId);

impl ReadCommand {
    /// Creates a read of the given register.
    #[must_use]
    pub const fn new(id: CommandId) -> Self {
        Self(id)
    }
}

impl From<CommandId> for ReadCommand {
    fn from(id: CommandId) -> Self {
        Self(id)
    }
}

impl Command for ReadCommand {
    fn command_id(&self) -> CommandId {
        self.0
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Read
    }

    fn context(&self) -> Option<Value> {
        None
    }
}
