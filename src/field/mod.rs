// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field identifiers and typed field writes.
//!
//! A [`Field`] is one characteristic write coming from the accessory side,
//! e.g. "brightness is now 80%". Writes are collected into a
//! [`PendingBatch`] until the debounce window closes.
//!
//! | Field | Characteristic | Value |
//! |-------|----------------|-------|
//! | [`FieldId::Power`] | `On` | `bool` |
//! | [`FieldId::Brightness`] | `Brightness` | [`Brightness`] (0-100%) |
//! | [`FieldId::Hue`] | `Hue` | [`Hue`] (0-360°) |
//! | [`FieldId::Saturation`] | `Saturation` | [`Saturation`] (0-100%) |
//! | [`FieldId::ColorTemperature`] | `ColorTemperature` | [`ColorTemperature`] (140-500 mired) |
//!
//! # Examples
//!
//! ```
//! use accessory_coalescer::field::{Field, FieldId};
//! use accessory_coalescer::types::Brightness;
//!
//! let write = Field::Brightness(Brightness::new(80).unwrap());
//! assert_eq!(write.id(), FieldId::Brightness);
//!
//! let id: FieldId = "ColorTemperature".parse().unwrap();
//! assert_eq!(id, FieldId::ColorTemperature);
//! ```

mod batch;
mod set;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, ParseError, ValueError};
use crate::types::{Brightness, ColorTemperature, Hue, Saturation};

pub use batch::PendingBatch;
pub use set::{ConflictGroups, FieldSet};

/// Identifier of a controllable light attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldId {
    /// On/off switch.
    Power,
    /// Brightness percentage.
    Brightness,
    /// Hue in degrees.
    Hue,
    /// Saturation percentage.
    Saturation,
    /// Color temperature in mireds.
    ColorTemperature,
}

impl FieldId {
    /// All identifiers, in batch iteration order.
    pub const ALL: [Self; 5] = [
        Self::Power,
        Self::Brightness,
        Self::Hue,
        Self::Saturation,
        Self::ColorTemperature,
    ];

    /// Returns the kebab-case identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Brightness => "brightness",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::ColorTemperature => "color-temperature",
        }
    }

    /// Returns the accessory-protocol characteristic name.
    #[must_use]
    pub const fn characteristic(&self) -> &'static str {
        match self {
            Self::Power => "On",
            Self::Brightness => "Brightness",
            Self::Hue => "Hue",
            Self::Saturation => "Saturation",
            Self::ColorTemperature => "ColorTemperature",
        }
    }

    pub(crate) const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| s == id.as_str() || s == id.characteristic())
            .ok_or_else(|| ParseError::UnknownField(s.to_string()))
    }
}

/// A single characteristic write with its typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "kebab-case")]
pub enum Field {
    /// `false` requests power-off.
    Power(bool),
    /// 0% requests power-off.
    Brightness(Brightness),
    /// Hue write.
    Hue(Hue),
    /// Saturation write.
    Saturation(Saturation),
    /// Color temperature write.
    ColorTemperature(ColorTemperature),
}

impl Field {
    /// Returns the identifier of this write.
    #[must_use]
    pub const fn id(&self) -> FieldId {
        match self {
            Self::Power(_) => FieldId::Power,
            Self::Brightness(_) => FieldId::Brightness,
            Self::Hue(_) => FieldId::Hue,
            Self::Saturation(_) => FieldId::Saturation,
            Self::ColorTemperature(_) => FieldId::ColorTemperature,
        }
    }

    /// Returns `true` if this write asks for the light to be switched off:
    /// `Power(false)` or the `Brightness(0)` sentinel.
    #[must_use]
    pub const fn is_off_request(&self) -> bool {
        match self {
            Self::Power(on) => !*on,
            Self::Brightness(b) => b.is_off(),
            _ => false,
        }
    }

    /// Builds a field from a characteristic write as it arrives on the wire.
    ///
    /// `Power` accepts booleans and `0`/`1`; numeric characteristics accept
    /// integers and floats (rounded).
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` for non-matching JSON types and a
    /// `ValueError` for out-of-range numbers.
    ///
    /// ```
    /// use accessory_coalescer::field::{Field, FieldId};
    /// use serde_json::json;
    ///
    /// let on = Field::from_json(FieldId::Power, &json!(1)).unwrap();
    /// assert_eq!(on, Field::Power(true));
    ///
    /// assert!(Field::from_json(FieldId::Hue, &json!(400)).is_err());
    /// ```
    pub fn from_json(id: FieldId, value: &Value) -> Result<Self, Error> {
        let invalid = || ParseError::InvalidValue {
            field: id,
            value: value.to_string(),
        };
        let number = || -> Result<u16, ParseError> {
            let n = value
                .as_f64()
                .filter(|n| (0.0..=f64::from(u16::MAX)).contains(n))
                .ok_or_else(invalid)?;
            // Safe: range checked above
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let n = n.round() as u16;
            Ok(n)
        };
        let percent = || -> Result<u8, Error> {
            let n = number()?;
            u8::try_from(n).map_err(|_| {
                ValueError::OutOfRange {
                    min: 0,
                    max: 100,
                    actual: n,
                }
                .into()
            })
        };

        let field = match id {
            FieldId::Power => match value {
                Value::Bool(on) => Self::Power(*on),
                Value::Number(n) => Self::Power(n.as_f64().is_some_and(|v| v != 0.0)),
                _ => return Err(invalid().into()),
            },
            FieldId::Brightness => Self::Brightness(Brightness::new(percent()?)?),
            FieldId::Hue => Self::Hue(Hue::new(number()?)?),
            FieldId::Saturation => Self::Saturation(Saturation::new(percent()?)?),
            FieldId::ColorTemperature => Self::ColorTemperature(ColorTemperature::new(number()?)?),
        };
        Ok(field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Power(on) => write!(f, "power={on}"),
            Self::Brightness(b) => write!(f, "brightness={b}"),
            Self::Hue(h) => write!(f, "hue={h}"),
            Self::Saturation(s) => write!(f, "saturation={s}"),
            Self::ColorTemperature(ct) => write!(f, "color-temperature={ct}"),
        }
    }
}
