// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light state tracking.
//!
//! The platform reports light state as a [`LightState`] snapshot. The
//! coalescer keeps the matching accessory-side [`CharacteristicState`], which
//! supplies fallback values when a batch only carries half of a color (hue
//! without saturation, or color temperature without brightness).
//!
//! # Examples
//!
//! ```
//! use accessory_coalescer::state::{CharacteristicState, LightState};
//!
//! let snapshot = LightState::from_json(
//!     r#"{"state": "on", "attributes": {"brightness": 0, "hs_color": [120.0, 50.0]}}"#,
//! ).unwrap();
//!
//! let mut chars = CharacteristicState::new();
//! chars.apply(&snapshot);
//!
//! // A light that is on never reports 0% brightness.
//! assert_eq!(chars.brightness().value(), 1);
//! assert_eq!(chars.hue().value(), 120);
//! ```

mod characteristic_state;
mod light_state;

pub use characteristic_state::{CharacteristicState, CharacteristicUpdate};
pub use light_state::{ColorMode, LightAttributes, LightState};
