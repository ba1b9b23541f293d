// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response envelope and typed register payloads.
//!
//! The device answers every request with `{"resCode": N, "data": ANY}`.
//! Only `resCode == 200` is success; `data` may be absent or `null`, which
//! is a valid empty result rather than a failure.

mod color;

pub use color::ColorResponse;

use serde::Deserialize;
use serde_json::Value;

use crate::command::CommandId;
use crate::error::{Error, ParseError, ProtocolError};
use crate::types::{Brightness, PowerState, TimeFormat, TimezoneIndex};

/// Status code the device uses for success.
pub const SUCCESS_CODE: i64 = 200;

/// Response envelope as received on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    res_code: Option<i64>,
    #[serde(default)]
    data: Option<Value>,
}

impl Response {
    /// Parses a response frame.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the frame is not a JSON object.
    pub fn parse(frame: &str) -> Result<Self, ParseError> {
        serde_json::from_str(frame).map_err(ParseError::Json)
    }

    /// Returns the status code, if present.
    #[must_use]
    pub fn res_code(&self) -> Option<i64> {
        self.res_code
    }

    /// Returns `true` if the device reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.res_code == Some(SUCCESS_CODE)
    }

    /// Checks the status and returns the payload.
    ///
    /// A `null` payload is returned as `None`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Rejected` for a non-200 status and
    /// `ParseError::MissingField` if the status is absent.
    pub fn into_data(self) -> Result<Option<Value>, Error> {
        match self.res_code {
            Some(SUCCESS_CODE) => Ok(self.data.filter(|data| !data.is_null())),
            Some(code) => Err(ProtocolError::Rejected(code).into()),
            None => Err(ParseError::MissingField("resCode".to_string()).into()),
        }
    }
}

/// Decoded payload of a register read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadValue {
    /// Color register contents.
    Color(ColorResponse),
    /// Brightness register.
    Brightness(Brightness),
    /// Power register.
    Power(PowerState),
    /// Timezone register.
    Timezone(TimezoneIndex),
    /// Raw mode register; values outside the known label set are kept.
    Mode(u8),
    /// Hour format register.
    TimeFormat(TimeFormat),
}

impl ReadValue {
    /// Decodes the payload of a read of `command`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the payload does not have the register's shape.
    pub fn decode(command: CommandId, data: &Value) -> Result<Self, ParseError> {
        let invalid = |message: String| ParseError::InvalidValue {
            field: command.name().to_string(),
            message,
        };

        match command {
            CommandId::Color => ColorResponse::from_value(data).map(Self::Color),
            CommandId::Brightness => {
                let raw = integer(command, data)?;
                Brightness::try_from(raw)
                    .map(Self::Brightness)
                    .map_err(|e| invalid(e.to_string()))
            }
            CommandId::Power => {
                let raw = integer(command, data)?;
                PowerState::from_num(raw)
                    .map(Self::Power)
                    .map_err(|e| invalid(e.to_string()))
            }
            CommandId::Timezone => {
                let raw = integer(command, data)?;
                i32::try_from(raw)
                    .map(|value| Self::Timezone(TimezoneIndex::new(value)))
                    .map_err(|_| invalid(format!("{raw} does not fit a timezone index")))
            }
            CommandId::Mode => {
                let raw = integer(command, data)?;
                u8::try_from(raw)
                    .map(Self::Mode)
                    .map_err(|_| invalid(format!("{raw} is not a mode value")))
            }
            CommandId::TimeFormat => {
                let raw = integer(command, data)?;
                u8::try_from(raw)
                    .map_err(|_| invalid(format!("{raw} is not a time format")))
                    .and_then(|value| {
                        TimeFormat::try_from(value).map_err(|e| invalid(e.to_string()))
                    })
                    .map(Self::TimeFormat)
            }
        }
    }

    /// Returns the timezone index, if this is a timezone read.
    #[must_use]
    pub fn timezone(&self) -> Option<TimezoneIndex> {
        match self {
            Self::Timezone(index) => Some(*index),
            _ => None,
        }
    }

    /// Returns the register this value was read from.
    #[must_use]
    pub fn command_id(&self) -> CommandId {
        match self {
            Self::Color(_) => CommandId::Color,
            Self::Brightness(_) => CommandId::Brightness,
            Self::Power(_) => CommandId::Power,
            Self::Timezone(_) => CommandId::Timezone,
            Self::Mode(_) => CommandId::Mode,
            Self::TimeFormat(_) => CommandId::TimeFormat,
        }
    }
}

/// Extracts an integer from a scalar payload.
///
/// Accepts a bare number, a numeric string, or a `{"value": n}` object.
fn integer(command: CommandId, data: &Value) -> Result<i64, ParseError> {
    match data {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(whole_number))
            .ok_or_else(|| ParseError::InvalidValue {
                field: command.name().to_string(),
                message: format!("{n} is not an integer"),
            }),
        Value::String(s) => s.trim().parse().map_err(|_| ParseError::InvalidValue {
            field: command.name().to_string(),
            message: format!("{s:?} is not an integer"),
        }),
        Value::Object(map) => map
            .get("value")
            .ok_or_else(|| ParseError::MissingField(format!("{}.value", command.name())))
            .and_then(|inner| match inner {
                Value::Object(_) => Err(ParseError::UnexpectedFormat(format!(
                    "nested object in {} payload",
                    command.name()
                ))),
                other => integer(command, other),
            }),
        other => Err(ParseError::UnexpectedFormat(format!(
            "{} payload: {other}",
            command.name()
        ))),
    }
}

/// Converts an integral float such as `16.0`.
#[allow(clippy::cast_possible_truncation)]
fn whole_number(f: f64) -> Option<i64> {
    // Safe: integral and well inside the i64 range
    (f.fract() == 0.0 && f.abs() < 1e15).then(|| f as i64)
}
