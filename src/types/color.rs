// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color types for light characteristics.
//!
//! This module provides hue, saturation and color temperature (CCT) values as
//! the accessory protocol defines them, plus the black-body approximation used
//! to present a color temperature as a hue/saturation pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Hue in degrees (0-360).
///
/// # Examples
///
/// ```
/// use accessory_coalescer::types::Hue;
///
/// let green = Hue::new(120).unwrap();
/// assert_eq!(green.value(), 120);
/// assert!(Hue::new(361).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Hue(u16);

impl Hue {
    /// Maximum hue value (360 wraps back to red).
    pub const MAX: u16 = 360;

    /// Creates a new hue value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidHue` if hue is greater than 360.
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if value > Self::MAX {
            return Err(ValueError::InvalidHue(value));
        }
        Ok(Self(value))
    }

    /// Rounds a floating point hue, clamping to the valid range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_degrees(degrees: f32) -> Self {
        // Safe: clamped to 0..=360 before the cast
        Self(degrees.round().clamp(0.0, f32::from(Self::MAX)) as u16)
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Hue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl TryFrom<u16> for Hue {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hue> for u16 {
    fn from(value: Hue) -> Self {
        value.0
    }
}

/// Saturation as a percentage (0-100).
///
/// ```
/// use accessory_coalescer::types::Saturation;
///
/// assert_eq!(Saturation::new(50).unwrap().value(), 50);
/// assert!(Saturation::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Saturation(u8);

impl Saturation {
    /// Maximum saturation value.
    pub const MAX: u8 = 100;

    /// Creates a new saturation value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidSaturation` if saturation is greater than 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > Self::MAX {
            return Err(ValueError::InvalidSaturation(value));
        }
        Ok(Self(value))
    }

    /// Creates a saturation value, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > Self::MAX { Self(Self::MAX) } else { Self(value) }
    }

    /// Rounds a floating point saturation, clamping to the valid range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_percent(percent: f32) -> Self {
        // Safe: clamped to 0..=100 before the cast
        Self(percent.round().clamp(0.0, f32::from(Self::MAX)) as u8)
    }

    /// Returns the saturation percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Saturation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Saturation {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Saturation> for u8 {
    fn from(value: Saturation) -> Self {
        value.0
    }
}

/// Color temperature in mireds (140-500).
///
/// Lower values are cooler (bluer), higher values are warmer.
///
/// - 140 (~7100K) - Coolest the accessory protocol allows
/// - 250 (4000K) - Neutral white
/// - 500 (2000K) - Warm candlelight
///
/// # Examples
///
/// ```
/// use accessory_coalescer::types::ColorTemperature;
///
/// let ct = ColorTemperature::new(250).unwrap();
/// assert_eq!(ct.to_kelvin(), 4000);
///
/// assert!(ColorTemperature::new(100).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct ColorTemperature(u16);

impl ColorTemperature {
    /// Minimum color temperature in mireds (coolest).
    pub const MIN: u16 = 140;

    /// Maximum color temperature in mireds (warmest).
    pub const MAX: u16 = 500;

    /// Coolest supported value.
    pub const COOLEST: Self = Self(Self::MIN);

    /// Neutral white (~4000K).
    pub const NEUTRAL: Self = Self(250);

    /// Warm white (~2700K).
    pub const WARM: Self = Self(370);

    /// Candlelight (~2000K).
    pub const CANDLE: Self = Self(Self::MAX);

    /// Creates a new color temperature value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [140, 500].
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Creates a color temperature, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u16) -> Self {
        if value < Self::MIN {
            Self(Self::MIN)
        } else if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Returns the color temperature value in mireds.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns the approximate color temperature in Kelvin.
    #[must_use]
    pub fn to_kelvin(&self) -> u16 {
        #[allow(clippy::cast_possible_truncation)]
        let kelvin = (1_000_000 / u32::from(self.0)) as u16;
        kelvin
    }

    /// Creates a color temperature from a Kelvin value, clamping to the
    /// supported mired range.
    ///
    /// ```
    /// use accessory_coalescer::types::ColorTemperature;
    ///
    /// assert_eq!(ColorTemperature::from_kelvin(4000).value(), 250);
    /// assert_eq!(ColorTemperature::from_kelvin(10_000), ColorTemperature::COOLEST);
    /// ```
    #[must_use]
    pub fn from_kelvin(kelvin: u16) -> Self {
        if kelvin == 0 {
            return Self::CANDLE;
        }
        let mireds = 1_000_000 / u32::from(kelvin);
        Self::clamped(u16::try_from(mireds).unwrap_or(u16::MAX))
    }

    /// Returns the hue/saturation pair that approximates this white point.
    #[must_use]
    pub fn to_hue_saturation(&self) -> (Hue, Saturation) {
        let (hue, saturation) = kelvin_to_hue_saturation(self.to_kelvin());
        (Hue::from_degrees(hue), Saturation::from_percent(saturation))
    }
}

impl Default for ColorTemperature {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for ColorTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mired", self.0)
    }
}

impl TryFrom<u16> for ColorTemperature {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColorTemperature> for u16 {
    fn from(value: ColorTemperature) -> Self {
        value.0
    }
}

/// Approximates the color of a black-body radiator as hue (degrees) and
/// saturation (percent).
///
/// Uses the curve-fitted RGB approximation for 1000K-40000K, then converts
/// RGB to HSV.
///
/// ```
/// use accessory_coalescer::types::kelvin_to_hue_saturation;
///
/// let (hue, saturation) = kelvin_to_hue_saturation(2700);
/// assert!((20.0..40.0).contains(&hue));
/// assert!((55.0..75.0).contains(&saturation));
/// ```
#[must_use]
pub fn kelvin_to_hue_saturation(kelvin: u16) -> (f32, f32) {
    let (red, green, blue) = kelvin_to_rgb(kelvin);
    rgb_to_hue_saturation(red, green, blue)
}

fn kelvin_to_rgb(kelvin: u16) -> (f32, f32, f32) {
    let temp = f32::from(kelvin).clamp(1000.0, 40_000.0) / 100.0;

    let red = if temp <= 66.0 {
        255.0
    } else {
        329.698_73 * (temp - 60.0).powf(-0.133_204_76)
    };

    let green = if temp <= 66.0 {
        99.470_8 * temp.ln() - 161.119_57
    } else {
        288.122_17 * (temp - 60.0).powf(-0.075_514_85)
    };

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        138.517_73 * (temp - 10.0).ln() - 305.044_8
    };

    (
        red.clamp(0.0, 255.0),
        green.clamp(0.0, 255.0),
        blue.clamp(0.0, 255.0),
    )
}

fn rgb_to_hue_saturation(red: f32, green: f32, blue: f32) -> (f32, f32) {
    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let delta = max - min;

    if max <= 0.0 || delta <= f32::EPSILON {
        return (0.0, 0.0);
    }

    let saturation = delta / max * 100.0;
    #[allow(clippy::float_cmp)]
    let sector = if max == red {
        ((green - blue) / delta).rem_euclid(6.0)
    } else if max == green {
        (blue - red) / delta + 2.0
    } else {
        (red - green) / delta + 4.0
    };

    (sector * 60.0, saturation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_bounds() {
        assert!(Hue::new(0).is_ok());
        assert!(Hue::new(360).is_ok());
        assert_eq!(Hue::new(361), Err(ValueError::InvalidHue(361)));
    }

    #[test]
    fn hue_from_degrees_rounds_and_clamps() {
        assert_eq!(Hue::from_degrees(119.6).value(), 120);
        assert_eq!(Hue::from_degrees(-4.0).value(), 0);
        assert_eq!(Hue::from_degrees(400.0).value(), 360);
    }

    #[test]
    fn saturation_bounds() {
        assert!(Saturation::new(100).is_ok());
        assert_eq!(Saturation::new(101), Err(ValueError::InvalidSaturation(101)));
        assert_eq!(Saturation::from_percent(49.5).value(), 50);
    }

    #[test]
    fn color_temperature_valid() {
        for v in 140..=500 {
            assert_eq!(ColorTemperature::new(v).unwrap().value(), v);
        }
    }

    #[test]
    fn color_temperature_invalid() {
        assert!(ColorTemperature::new(139).is_err());
        assert!(ColorTemperature::new(501).is_err());
    }

    #[test]
    fn color_temperature_clamped() {
        assert_eq!(ColorTemperature::clamped(100).value(), 140);
        assert_eq!(ColorTemperature::clamped(600).value(), 500);
        assert_eq!(ColorTemperature::clamped(300).value(), 300);
    }

    #[test]
    fn color_temperature_kelvin_conversion() {
        assert_eq!(ColorTemperature::CANDLE.to_kelvin(), 2000);
        assert_eq!(ColorTemperature::from_kelvin(2000), ColorTemperature::CANDLE);
        assert_eq!(ColorTemperature::from_kelvin(1000), ColorTemperature::CANDLE);
        assert_eq!(ColorTemperature::from_kelvin(0), ColorTemperature::CANDLE);
    }

    #[test]
    fn warm_white_is_orange() {
        let (hue, saturation) = kelvin_to_hue_saturation(2700);
        assert!((20.0..40.0).contains(&hue), "hue was {hue}");
        assert!((55.0..75.0).contains(&saturation), "saturation was {saturation}");
    }

    #[test]
    fn daylight_is_nearly_unsaturated() {
        let (_, saturation) = kelvin_to_hue_saturation(6600);
        assert!(saturation < 10.0, "saturation was {saturation}");
    }

    #[test]
    fn very_warm_light_is_fully_saturated() {
        // Below 1900K the blue channel is zero.
        let (_, saturation) = kelvin_to_hue_saturation(1500);
        assert!((saturation - 100.0).abs() < 0.01);
    }

    #[test]
    fn grey_has_no_hue() {
        assert_eq!(rgb_to_hue_saturation(10.0, 10.0, 10.0), (0.0, 0.0));
    }

    #[test]
    fn color_temperature_to_hue_saturation() {
        let (hue, saturation) = ColorTemperature::WARM.to_hue_saturation();
        assert!(hue.value() < 60);
        assert!(saturation.value() > 40);
    }
}
