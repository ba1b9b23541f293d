// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Register writes with typed contexts.

use serde_json::{Value, json};

use crate::types::{Brightness, DisplayMode, PowerState, RgbColor, TimeFormat, TimezoneIndex};

use super::{Command, CommandId, OperationKind};

/// Number of color entries the device stores.
pub(crate) const COLOR_ENTRIES: usize = 4;

/// Write of a single register.
///
/// Color is written as a list of four identical `{red, green, blue}`
/// entries; every other register takes `{"value": n}`.
///
/// # Examples
///
/// ```
/// use gixie_lib::command::{Command, WriteCommand};
/// use gixie_lib::types::RgbColor;
///
/// let cmd = WriteCommand::Color(RgbColor::new(10, 20, 30));
/// let ctx = cmd.context().unwrap();
/// assert_eq!(ctx.as_array().unwrap().len(), 4);
/// assert_eq!(ctx[3]["blue"], 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCommand {
    /// Set the display color.
    Color(RgbColor),
    /// Set the brightness.
    Brightness(Brightness),
    /// Turn the display on or off.
    Power(PowerState),
    /// Set the timezone register.
    Timezone(TimezoneIndex),
    /// Set the animation mode.
    Mode(DisplayMode),
    /// Set the hour format.
    TimeFormat(TimeFormat),
}

impl Command for WriteCommand {
    fn command_id(&self) -> CommandId {
        match self {
            Self::Color(_) => CommandId::Color,
            Self::Brightness(_) => CommandId::Brightness,
            Self::Power(_) => CommandId::Power,
            Self::Timezone(_) => CommandId::Timezone,
            Self::Mode(_) => CommandId::Mode,
            Self::TimeFormat(_) => CommandId::TimeFormat,
        }
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Write
    }

    fn context(&self) -> Option<Value> {
        let value = match self {
            Self::Color(color) => {
                let entry = json!({
                    "red": color.red(),
                    "green": color.green(),
                    "blue": color.blue(),
                });
                return Some(Value::Array(vec![entry; COLOR_ENTRIES]));
            }
            Self::Brightness(brightness) => i64::from(brightness.value()),
            Self::Power(state) => i64::from(state.as_num()),
            Self::Timezone(index) => i64::from(index.value()),
            Self::Mode(mode) => i64::from(mode.value()),
            Self::TimeFormat(format) => i64::from(format.value()),
        };
        Some(json!({ "value": value }))
    }
}
