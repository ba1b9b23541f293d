// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color register payload.

use serde_json::Value;

use crate::error::ParseError;
use crate::types::RgbColor;

/// Contents of the color register.
///
/// The device always reports four entries even though only one logical
/// color exists. The list is stored as reported; the first entry is the
/// canonical color.
///
/// # Examples
///
/// ```
/// use gixie_lib::response::ColorResponse;
/// use gixie_lib::types::RgbColor;
///
/// let json = serde_json::json!([
///     {"red": 10, "green": 20, "blue": 30},
///     {"red": 10, "green": 20, "blue": 30},
///     {"red": 10, "green": 20, "blue": 30},
///     {"red": 10, "green": 20, "blue": 30}
/// ]);
/// let color = ColorResponse::from_value(&json).unwrap();
/// assert_eq!(color.primary(), Some(RgbColor::new(10, 20, 30)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ColorResponse {
    entries: Vec<RgbColor>,
}

impl ColorResponse {
    /// Wraps a list of entries.
    #[must_use]
    pub fn new(entries: Vec<RgbColor>) -> Self {
        Self { entries }
    }

    /// Parses the register payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedFormat` if the payload is not a list of
    /// `{red, green, blue}` objects.
    pub fn from_value(data: &Value) -> Result<Self, ParseError> {
        if !data.is_array() {
            return Err(ParseError::UnexpectedFormat(format!(
                "color payload is not a list: {data}"
            )));
        }
        serde_json::from_value(data.clone()).map_err(|e| ParseError::InvalidValue {
            field: "color".to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the canonical color (the first entry).
    #[must_use]
    pub fn primary(&self) -> Option<RgbColor> {
        self.entries.first().copied()
    }

    /// Returns every reported entry.
    #[must_use]
    pub fn entries(&self) -> &[RgbColor] {
        &self.entries
    }
}
