// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory-side characteristic values derived from platform state.

use super::{ColorMode, LightState};
use crate::field::{Field, PendingBatch};
use crate::types::{Brightness, ColorTemperature, Hue, Saturation, kelvin_to_hue_saturation};

/// Saturation shown before the platform has reported a color.
const INITIAL_SATURATION: u8 = 75;

/// Characteristic values after applying a [`LightState`] snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacteristicUpdate {
    /// Values to set on the accessory, in [`FieldId`](crate::field::FieldId) order.
    pub values: Vec<Field>,
    /// The color mode changed; the bridge should re-notify every color
    /// characteristic even if its value did not change.
    pub force_notify: bool,
}

/// Last known accessory characteristic values for one light.
///
/// # Examples
///
/// ```
/// use accessory_coalescer::state::{CharacteristicState, ColorMode, LightState};
/// use accessory_coalescer::types::{ColorTemperature, PowerState};
///
/// let mut chars = CharacteristicState::new();
/// let update = chars.apply(
///     &LightState::new(PowerState::On).with_color_mode(ColorMode::White),
/// );
///
/// assert!(update.force_notify);
/// assert_eq!(chars.hue().value(), 0);
/// assert_eq!(chars.saturation().value(), 0);
/// assert_eq!(chars.color_temperature(), ColorTemperature::COOLEST);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacteristicState {
    on: bool,
    brightness: Brightness,
    hue: Hue,
    saturation: Saturation,
    color_temperature: ColorTemperature,
    color_mode: Option<ColorMode>,
}

impl CharacteristicState {
    /// Creates the state an accessory shows before the first snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on: false,
            brightness: Brightness::MAX,
            hue: Hue::default(),
            saturation: Saturation::clamped(INITIAL_SATURATION),
            color_temperature: ColorTemperature::COOLEST,
            color_mode: None,
        }
    }

    /// Current `On` value.
    #[must_use]
    pub const fn on(&self) -> bool {
        self.on
    }

    /// Current `Brightness` value.
    #[must_use]
    pub const fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Current `Hue` value.
    #[must_use]
    pub const fn hue(&self) -> Hue {
        self.hue
    }

    /// Current `Saturation` value.
    #[must_use]
    pub const fn saturation(&self) -> Saturation {
        self.saturation
    }

    /// Current `ColorTemperature` value.
    #[must_use]
    pub const fn color_temperature(&self) -> ColorTemperature {
        self.color_temperature
    }

    /// Applies a platform snapshot and returns the characteristic values to
    /// publish.
    ///
    /// Attributes missing from the snapshot leave the matching
    /// characteristic untouched.
    pub fn apply(&mut self, state: &LightState) -> CharacteristicUpdate {
        let mut values = Vec::with_capacity(5);
        let attributes = &state.attributes;
        let color_mode = state.color_mode();

        self.on = state.is_on();
        values.push(Field::Power(self.on));

        let force_notify = self.color_mode != color_mode;
        self.color_mode = color_mode;

        if let Some(level) = attributes.brightness.filter(|b| b.is_finite()) {
            // Safe: clamped to 0..=255 before the cast
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let level = level.round().clamp(0.0, 255.0) as u8;
            let mut brightness = Brightness::from_level(level);
            // 0 is the off sentinel on the accessory side
            if brightness.is_off() && self.on {
                brightness = Brightness::MIN_ON;
            }
            self.brightness = brightness;
            values.push(Field::Brightness(brightness));
        }

        // Hue and saturation must be published before color temperature.
        let kelvin = attributes
            .color_temp_kelvin
            .filter(|k| k.is_finite() && *k >= 1.0)
            // Safe: clamped to the u16 range before the cast
            .map(|k| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let k = k.round().clamp(1.0, f32::from(u16::MAX)) as u16;
                k
            });
        let hue_saturation = match kelvin {
            Some(kelvin) => Some(kelvin_to_hue_saturation(kelvin)),
            None if color_mode == Some(ColorMode::White) => Some((0.0, 0.0)),
            None => attributes.hs_color,
        };
        if let Some((hue, saturation)) = hue_saturation {
            self.hue = Hue::from_degrees(hue);
            self.saturation = Saturation::from_percent(saturation);
            values.push(Field::Hue(self.hue));
            values.push(Field::Saturation(self.saturation));
        }

        if color_mode == Some(ColorMode::White) {
            self.color_temperature = ColorTemperature::COOLEST;
            values.push(Field::ColorTemperature(self.color_temperature));
        }

        tracing::trace!(
            on = self.on,
            brightness = %self.brightness,
            hue = %self.hue,
            saturation = %self.saturation,
            force_notify,
            "Applied light state"
        );

        CharacteristicUpdate {
            values,
            force_notify,
        }
    }

    /// Records the accessory's own writes from a flushed batch.
    ///
    /// The stored values stand in for missing halves of later writes until
    /// the platform reports its state back. The brightness zero sentinel is
    /// not stored.
    pub fn record(&mut self, batch: &PendingBatch) {
        for field in batch.iter() {
            match *field {
                Field::Power(on) => self.on = on,
                Field::Brightness(brightness) if !brightness.is_off() => {
                    self.brightness = brightness;
                }
                Field::Brightness(_) => {}
                Field::Hue(hue) => self.hue = hue,
                Field::Saturation(saturation) => self.saturation = saturation,
                Field::ColorTemperature(temperature) => self.color_temperature = temperature,
            }
        }
    }
}

impl Default for CharacteristicState {
    fn default() -> Self {
        Self::new()
    }
}
