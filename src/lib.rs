// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory Coalescer - debounced light commands for accessory bridges.
//!
//! Smart-home accessory protocols expose a light as independent
//! characteristics (`On`, `Brightness`, `Hue`, `Saturation`,
//! `ColorTemperature`) and controllers write them one at a time. This crate
//! buffers those writes and turns each burst into one merged light service
//! call, so the physical light changes once instead of flickering through
//! intermediate states.
//!
//! # Features
//!
//! - **Debouncing**: writes within the quiet window become one command
//! - **Conflict groups**: color temperature and hue/saturation never mix
//! - **Off dominance**: a pending power-off suppresses every other write
//! - **State sync**: platform light state mapped back to characteristic values
//! - **Events**: flush outcomes broadcast over a tokio channel
//!
//! # Quick Start
//!
//! ```
//! use accessory_coalescer::{CoalescerConfig, CommandCoalescer, LightCommand};
//! use accessory_coalescer::command::Command;
//! use accessory_coalescer::error::ActionError;
//! use accessory_coalescer::field::Field;
//! use accessory_coalescer::types::Brightness;
//!
//! #[tokio::main]
//! async fn main() -> accessory_coalescer::Result<()> {
//!     let config = CoalescerConfig::light().with_entity_id("light.desk");
//!     let action = |command: LightCommand, _description: Option<String>| async move {
//!         let call = command.to_service_call(Some("light.desk"));
//!         println!("{}.{} {}", call.domain, call.service, call.params);
//!         Ok::<(), ActionError>(())
//!     };
//!
//!     let coalescer = CommandCoalescer::new(config, action)?;
//!     coalescer.submit([Field::Power(true)]);
//!     coalescer.submit([Field::Brightness(Brightness::new(60)?)]);
//!
//!     // Dispatch right away instead of waiting for the window
//!     coalescer.flush_now();
//!     Ok(())
//! }
//! ```
//!
//! # Feeding platform state back
//!
//! ```
//! use accessory_coalescer::state::{CharacteristicState, LightState};
//!
//! let state = LightState::from_json(
//!     r#"{"state": "on", "attributes": {"brightness": 255, "color_mode": "white"}}"#,
//! ).unwrap();
//!
//! let mut chars = CharacteristicState::new();
//! let update = chars.apply(&state);
//! assert!(update.force_notify);
//! ```

pub mod coalescer;
pub mod command;
pub mod error;
pub mod event;
pub mod field;
pub mod state;
pub mod types;

pub use coalescer::{CoalescerConfig, CommandCoalescer, DownstreamAction, Phase, WhiteMode};
pub use command::{ColorSetting, Command, LightCommand, ServiceCall, TurnOn};
pub use error::{ActionError, ConfigError, Error, ParseError, Result, ValueError};
pub use event::{CoalescerEvent, EventBus};
pub use field::{ConflictGroups, Field, FieldId, FieldSet, PendingBatch};
pub use state::{CharacteristicState, CharacteristicUpdate, LightState};
pub use types::{Brightness, ColorTemperature, Hue, PowerState, Saturation};
