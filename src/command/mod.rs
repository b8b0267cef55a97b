// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Downstream command definitions.
//!
//! A flushed batch becomes exactly one [`LightCommand`]. Commands map onto the
//! platform's light service call: a service name plus a parameter object.
//!
//! | Command | Service | Parameters |
//! |---------|---------|------------|
//! | [`LightCommand::TurnOff`] | `turn_off` | none |
//! | [`LightCommand::TurnOn`] | `turn_on` | `brightness_pct`, `hs_color`, `color_temp`, `white` |
//!
//! # Examples
//!
//! ```
//! use accessory_coalescer::command::{ColorSetting, Command, LightCommand, TurnOn};
//! use accessory_coalescer::types::{Brightness, Hue, Saturation};
//! use serde_json::json;
//!
//! let cmd = LightCommand::TurnOn(TurnOn {
//!     brightness: Some(Brightness::new(80).unwrap()),
//!     color: Some(ColorSetting::HueSaturation {
//!         hue: Hue::new(120).unwrap(),
//!         saturation: Saturation::new(50).unwrap(),
//!     }),
//! });
//!
//! let call = cmd.to_service_call(Some("light.nightlight"));
//! assert_eq!(call.service, "turn_on");
//! assert_eq!(
//!     call.params,
//!     json!({"entity_id": "light.nightlight", "brightness_pct": 80, "hs_color": [120, 50]})
//! );
//! ```

mod light;

use serde::Serialize;
use serde_json::{Map, Value};

pub use light::{ColorSetting, DerivedCommand, LightCommand, TurnOn, WhiteMode};

/// Service domain for light commands.
pub const LIGHT_DOMAIN: &str = "light";

/// A command that can be dispatched as a platform service call.
pub trait Command {
    /// Returns the service name, e.g. `"turn_on"`.
    fn service(&self) -> &'static str;

    /// Returns the service parameters, without the target entity.
    fn params(&self) -> Map<String, Value>;

    /// Returns the service domain.
    fn domain(&self) -> &'static str {
        LIGHT_DOMAIN
    }

    /// Builds the full service call, targeting `entity_id` when given.
    fn to_service_call(&self, entity_id: Option<&str>) -> ServiceCall {
        let mut params = Map::new();
        if let Some(entity_id) = entity_id {
            params.insert("entity_id".to_string(), Value::from(entity_id));
        }
        params.extend(self.params());
        ServiceCall {
            domain: self.domain(),
            service: self.service(),
            params: Value::Object(params),
        }
    }
}

/// A fully formed platform service call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCall {
    /// Service domain, e.g. `"light"`.
    pub domain: &'static str,
    /// Service name, e.g. `"turn_on"`.
    pub service: &'static str,
    /// Parameter object.
    pub params: Value,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn service_call_without_target() {
        let call = LightCommand::TurnOff.to_service_call(None);
        assert_eq!(call.domain, "light");
        assert_eq!(call.service, "turn_off");
        assert_eq!(call.params, json!({}));
    }

    #[test]
    fn service_call_serializes() {
        let call = LightCommand::TurnOff.to_service_call(Some("light.laser"));
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({
                "domain": "light",
                "service": "turn_off",
                "params": {"entity_id": "light.laser"}
            })
        );
    }
}
