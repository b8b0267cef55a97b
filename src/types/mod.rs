// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for light characteristics.
//!
//! Each type ensures values are within their valid ranges at construction
//! time, so a [`Field`](crate::field::Field) can never carry an out-of-range
//! value into a batch.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off state reported by the platform
//! - [`Brightness`] - Brightness level (0-100%)
//! - [`Hue`] - Hue in degrees (0-360)
//! - [`Saturation`] - Saturation (0-100%)
//! - [`ColorTemperature`] - Color temperature in mireds (140-500)

mod brightness;
mod color;
mod power;

pub use brightness::Brightness;
pub use color::{ColorTemperature, Hue, Saturation, kelvin_to_hue_saturation};
pub use power::PowerState;
