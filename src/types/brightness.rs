// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for light characteristics.
//!
//! The accessory protocol expresses brightness as a percentage while the
//! platform reports it as an 8-bit level. This type holds the percentage and
//! converts between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Brightness level as a percentage (0-100).
///
/// 0 is a special value: a write of 0% means "turn off".
///
/// # Examples
///
/// ```
/// use accessory_coalescer::types::Brightness;
///
/// let dim = Brightness::new(75).unwrap();
/// assert_eq!(dim.value(), 75);
///
/// assert!(Brightness::OFF.is_off());
/// assert_eq!(Brightness::MAX.value(), 100);
///
/// assert!(Brightness::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Brightness(u8);

impl Brightness {
    /// The zero sentinel (0%), treated as a power-off request.
    pub const OFF: Self = Self(0);

    /// Lowest brightness that still means "on" (1%).
    pub const MIN_ON: Self = Self(1);

    /// Maximum brightness (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidBrightness` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::InvalidBrightness(value));
        }
        Ok(Self(value))
    }

    /// Creates a brightness value, clamping to the valid range.
    ///
    /// ```
    /// use accessory_coalescer::types::Brightness;
    ///
    /// assert_eq!(Brightness::clamped(150).value(), 100);
    /// ```
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Converts a platform brightness level (0-255) to a percentage.
    ///
    /// ```
    /// use accessory_coalescer::types::Brightness;
    ///
    /// assert_eq!(Brightness::from_level(255).value(), 100);
    /// assert_eq!(Brightness::from_level(128).value(), 50);
    /// assert_eq!(Brightness::from_level(1).value(), 0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_level(level: u8) -> Self {
        // Safe: level <= 255 so the rounded result is in 0..=100
        Self((f32::from(level) / 255.0 * 100.0).round() as u8)
    }

    /// Converts the percentage to a platform brightness level (0-255).
    ///
    /// ```
    /// use accessory_coalescer::types::Brightness;
    ///
    /// assert_eq!(Brightness::MAX.to_level(), 255);
    /// assert_eq!(Brightness::new(50).unwrap().to_level(), 128);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_level(&self) -> u8 {
        // Safe: self.0 <= 100 so the rounded result is in 0..=255
        (f32::from(self.0) * 255.0 / 100.0).round() as u8
    }

    /// Returns the brightness percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` for the 0% sentinel.
    #[must_use]
    pub const fn is_off(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Brightness {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Brightness> for u8 {
    fn from(value: Brightness) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_valid_values() {
        for v in 0..=100 {
            assert_eq!(Brightness::new(v).unwrap().value(), v);
        }
    }

    #[test]
    fn brightness_invalid_value() {
        assert_eq!(Brightness::new(101), Err(ValueError::InvalidBrightness(101)));
    }

    #[test]
    fn brightness_clamped() {
        assert_eq!(Brightness::clamped(50).value(), 50);
        assert_eq!(Brightness::clamped(255).value(), 100);
    }

    #[test]
    fn level_conversion_round_trips_full_scale() {
        assert_eq!(Brightness::from_level(0), Brightness::OFF);
        assert_eq!(Brightness::from_level(255), Brightness::MAX);
        assert_eq!(Brightness::new(80).unwrap().to_level(), 204);
        assert_eq!(Brightness::OFF.to_level(), 0);
    }

    #[test]
    fn off_sentinel() {
        assert!(Brightness::OFF.is_off());
        assert!(!Brightness::MIN_ON.is_off());
    }

    #[test]
    fn brightness_display() {
        assert_eq!(Brightness::new(75).unwrap().to_string(), "75%");
    }

    #[test]
    fn brightness_serde_rejects_out_of_range() {
        let ok: Brightness = serde_json::from_str("42").unwrap();
        assert_eq!(ok.value(), 42);
        assert!(serde_json::from_str::<Brightness>("120").is_err());
    }
}
