// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light commands and their derivation from a pending batch.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::command::Command;
use crate::field::{FieldSet, PendingBatch};
use crate::state::CharacteristicState;
use crate::types::{Brightness, ColorTemperature, Hue, Saturation};

/// How a color temperature write is expressed downstream.
///
/// Tunable-white lights take the temperature directly. Lights with a single
/// dedicated white channel (night-lights, projectors) instead switch to that
/// channel at the current brightness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhiteMode {
    /// Emit `color_temp` in mireds.
    #[default]
    ColorTemperature,
    /// Emit a `white` channel level derived from brightness.
    WhiteLevel,
}

/// Color part of a turn-on command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSetting {
    /// Tunable white in mireds.
    Temperature(ColorTemperature),
    /// Hue/saturation color.
    HueSaturation {
        /// Hue in degrees.
        hue: Hue,
        /// Saturation in percent.
        saturation: Saturation,
    },
    /// Dedicated white channel level (0-255).
    White {
        /// Channel level.
        level: u8,
    },
}

/// Attributes of a turn-on command. Absent attributes are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnOn {
    /// Target brightness.
    pub brightness: Option<Brightness>,
    /// Target color.
    pub color: Option<ColorSetting>,
}

/// A single downstream light command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    /// Turn the light off.
    TurnOff,
    /// Turn the light on, optionally changing attributes.
    TurnOn(TurnOn),
}

/// A command together with its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedCommand {
    /// The command to dispatch.
    pub command: LightCommand,
    /// Summary of the changes, e.g. `"Set state to on, brightness at 80%"`.
    pub description: String,
}

impl LightCommand {
    /// Derives the command for a batch of writes.
    ///
    /// A power-off write, or a write in `off_triggers` carrying its zero
    /// sentinel, yields [`LightCommand::TurnOff`] and every other write is
    /// dropped. Otherwise the writes merge into one [`TurnOn`]. Missing
    /// halves of a color are taken from `fallback`.
    ///
    /// Returns `None` for an empty batch.
    ///
    /// # Examples
    ///
    /// ```
    /// use accessory_coalescer::command::{LightCommand, WhiteMode};
    /// use accessory_coalescer::field::{Field, FieldSet, FieldId, PendingBatch};
    /// use accessory_coalescer::state::CharacteristicState;
    /// use accessory_coalescer::types::Brightness;
    ///
    /// let batch: PendingBatch = [
    ///     Field::Brightness(Brightness::new(80).unwrap()),
    ///     Field::Power(false),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let derived = LightCommand::derive(
    ///     &batch,
    ///     &CharacteristicState::new(),
    ///     FieldSet::of(&[FieldId::Power, FieldId::Brightness]),
    ///     WhiteMode::ColorTemperature,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(derived.command, LightCommand::TurnOff);
    /// assert_eq!(derived.description, "Set state to off");
    /// ```
    #[must_use]
    pub fn derive(
        batch: &PendingBatch,
        fallback: &CharacteristicState,
        off_triggers: FieldSet,
        white_mode: WhiteMode,
    ) -> Option<DerivedCommand> {
        if batch.is_empty() {
            return None;
        }

        let mut changes = Vec::new();

        if batch.power() == Some(false) || batch.requests_off(off_triggers) {
            changes.push("Set state to off".to_string());
            if batch.power() != Some(false) && batch.brightness().is_some_and(|b| b.is_off()) {
                changes.push(format!("brightness at {}", Brightness::OFF));
            }
            return Some(DerivedCommand {
                command: Self::TurnOff,
                description: changes.join(", "),
            });
        }

        if batch.power() == Some(true) {
            changes.push("Set state to on".to_string());
        }

        let brightness = batch.brightness();
        if let Some(brightness) = brightness {
            changes.push(format!("brightness at {brightness}"));
        }

        let color = if let Some(temperature) = batch.color_temperature() {
            Some(match white_mode {
                WhiteMode::ColorTemperature => {
                    changes.push(format!("color temperature at {}", temperature.value()));
                    ColorSetting::Temperature(temperature)
                }
                WhiteMode::WhiteLevel => {
                    let level = brightness.unwrap_or_else(|| fallback.brightness()).to_level();
                    changes.push(format!("white level at {level}"));
                    ColorSetting::White { level }
                }
            })
        } else if batch.hue().is_some() || batch.saturation().is_some() {
            let hue = batch.hue().unwrap_or_else(|| fallback.hue());
            let saturation = batch.saturation().unwrap_or_else(|| fallback.saturation());
            changes.push(format!(
                "set color at ({}, {})",
                hue.value(),
                saturation.value()
            ));
            Some(ColorSetting::HueSaturation { hue, saturation })
        } else {
            None
        };

        Some(DerivedCommand {
            command: Self::TurnOn(TurnOn { brightness, color }),
            description: changes.join(", "),
        })
    }

    /// Returns `true` for [`LightCommand::TurnOff`].
    #[must_use]
    pub const fn is_off(&self) -> bool {
        matches!(self, Self::TurnOff)
    }
}

impl Command for LightCommand {
    fn service(&self) -> &'static str {
        match self {
            Self::TurnOff => "turn_off",
            Self::TurnOn(_) => "turn_on",
        }
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        let Self::TurnOn(turn_on) = self else {
            return params;
        };

        if let Some(brightness) = turn_on.brightness {
            params.insert("brightness_pct".to_string(), json!(brightness.value()));
        }
        match turn_on.color {
            Some(ColorSetting::Temperature(temperature)) => {
                params.insert("color_temp".to_string(), json!(temperature.value()));
            }
            Some(ColorSetting::HueSaturation { hue, saturation }) => {
                params.insert(
                    "hs_color".to_string(),
                    json!([hue.value(), saturation.value()]),
                );
            }
            Some(ColorSetting::White { level }) => {
                params.insert("white".to_string(), json!(level));
            }
            None => {}
        }
        params
    }
}

impl fmt::Display for LightCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.service())?;
        let params = self.params();
        if !params.is_empty() {
            write!(f, " {}", Value::Object(params))?;
        }
        Ok(())
    }
}
