// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light state snapshots as reported by the platform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::PowerState;

/// Color mode reported by the platform's light entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// On/off only.
    OnOff,
    /// Dimmable, no color.
    Brightness,
    /// Tunable white.
    ColorTemp,
    /// Hue/saturation color.
    Hs,
    /// CIE xy color.
    Xy,
    /// RGB color.
    Rgb,
    /// RGB plus a white channel.
    Rgbw,
    /// RGB plus cold and warm white channels.
    Rgbww,
    /// Dedicated white channel.
    White,
}

impl ColorMode {
    /// Returns the platform string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OnOff => "onoff",
            Self::Brightness => "brightness",
            Self::ColorTemp => "color_temp",
            Self::Hs => "hs",
            Self::Xy => "xy",
            Self::Rgb => "rgb",
            Self::Rgbw => "rgbw",
            Self::Rgbww => "rgbww",
            Self::White => "white",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onoff" => Ok(Self::OnOff),
            "brightness" => Ok(Self::Brightness),
            "color_temp" => Ok(Self::ColorTemp),
            "hs" => Ok(Self::Hs),
            "xy" => Ok(Self::Xy),
            "rgb" => Ok(Self::Rgb),
            "rgbw" => Ok(Self::Rgbw),
            "rgbww" => Ok(Self::Rgbww),
            "white" => Ok(Self::White),
            other => Err(ParseError::UnknownColorMode(other.to_string())),
        }
    }
}

/// Light attributes carried by a state snapshot.
///
/// Every attribute is optional because the platform omits what the light does
/// not support and reports `null` while it is off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightAttributes {
    /// Brightness level (0-255).
    #[serde(default)]
    pub brightness: Option<f32>,
    /// Raw color mode string.
    #[serde(default)]
    pub color_mode: Option<String>,
    /// Color temperature in Kelvin.
    #[serde(default)]
    pub color_temp_kelvin: Option<f32>,
    /// Hue (degrees) and saturation (percent).
    #[serde(default)]
    pub hs_color: Option<(f32, f32)>,
}

/// A state snapshot of a platform light entity.
///
/// # Examples
///
/// ```
/// use accessory_coalescer::state::{ColorMode, LightState};
///
/// let state = LightState::from_json(
///     r#"{"state": "on", "attributes": {"brightness": 255, "color_mode": "white"}}"#,
/// ).unwrap();
///
/// assert!(state.is_on());
/// assert_eq!(state.color_mode(), Some(ColorMode::White));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    /// Raw entity state (`"on"`, `"off"`, `"unavailable"`, ...).
    pub state: String,
    /// Light attributes.
    #[serde(default)]
    pub attributes: LightAttributes,
}

impl LightState {
    /// Creates a snapshot with the given power state and no attributes.
    #[must_use]
    pub fn new(power: PowerState) -> Self {
        Self {
            state: power.as_str().to_string(),
            attributes: LightAttributes::default(),
        }
    }

    /// Parses a snapshot from the platform's JSON state object.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the brightness level (0-255).
    #[must_use]
    pub fn with_brightness(mut self, level: f32) -> Self {
        self.attributes.brightness = Some(level);
        self
    }

    /// Sets the color mode.
    #[must_use]
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.attributes.color_mode = Some(mode.as_str().to_string());
        self
    }

    /// Sets the color temperature in Kelvin.
    #[must_use]
    pub fn with_color_temp_kelvin(mut self, kelvin: u16) -> Self {
        self.attributes.color_temp_kelvin = Some(f32::from(kelvin));
        self
    }

    /// Sets the hue/saturation color.
    #[must_use]
    pub fn with_hs_color(mut self, hue: f32, saturation: f32) -> Self {
        self.attributes.hs_color = Some((hue, saturation));
        self
    }

    /// Returns the power state. Anything other than `on` counts as off.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.state.parse().unwrap_or(PowerState::Off)
    }

    /// Returns `true` if the entity state is `on`.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.power().is_on()
    }

    /// Returns the parsed color mode, ignoring unknown modes.
    #[must_use]
    pub fn color_mode(&self) -> Option<ColorMode> {
        self.attributes
            .color_mode
            .as_deref()
            .and_then(|mode| mode.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_snapshot() {
        let state = LightState::from_json(
            r#"{
                "state": "on",
                "attributes": {
                    "brightness": 128,
                    "color_mode": "hs",
                    "hs_color": [120.5, 50.0],
                    "color_temp_kelvin": null,
                    "friendly_name": "Nightlight"
                }
            }"#,
        )
        .unwrap();

        assert!(state.is_on());
        assert_eq!(state.attributes.brightness, Some(128.0));
        assert_eq!(state.color_mode(), Some(ColorMode::Hs));
        assert_eq!(state.attributes.hs_color, Some((120.5, 50.0)));
        assert_eq!(state.attributes.color_temp_kelvin, None);
    }

    #[test]
    fn missing_attributes_default() {
        let state = LightState::from_json(r#"{"state": "off"}"#).unwrap();
        assert!(!state.is_on());
        assert_eq!(state.attributes, LightAttributes::default());
    }

    #[test]
    fn unavailable_counts_as_off() {
        let state = LightState::from_json(r#"{"state": "unavailable"}"#).unwrap();
        assert_eq!(state.power(), PowerState::Off);
    }

    #[test]
    fn unknown_color_mode_is_ignored() {
        let state = LightState::from_json(
            r#"{"state": "on", "attributes": {"color_mode": "disco"}}"#,
        )
        .unwrap();
        assert_eq!(state.color_mode(), None);
        assert!(matches!(
            "disco".parse::<ColorMode>(),
            Err(ParseError::UnknownColorMode(mode)) if mode == "disco"
        ));
    }

    #[test]
    fn fractional_kelvin_keeps_snapshot() {
        let state = LightState::from_json(
            r#"{
                "state": "on",
                "attributes": {"brightness": 64, "color_temp_kelvin": 2702.5}
            }"#,
        )
        .unwrap();

        assert!(state.is_on());
        assert_eq!(state.attributes.brightness, Some(64.0));
        assert_eq!(state.attributes.color_temp_kelvin, Some(2702.5));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            LightState::from_json("{"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn builder_round_trips_through_json() {
        let state = LightState::new(PowerState::On)
            .with_brightness(200.0)
            .with_color_mode(ColorMode::ColorTemp)
            .with_color_temp_kelvin(2700);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(LightState::from_json(&json).unwrap(), state);
    }
}
