// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Debounced command coalescing.
//!
//! Accessory controllers write one characteristic at a time: dragging a color
//! wheel produces a hue write, a saturation write, and often a brightness
//! write within a few milliseconds. A [`CommandCoalescer`] buffers those
//! writes and, once no write has arrived for the configured window, emits a
//! single merged [`LightCommand`](crate::command::LightCommand) through a
//! [`DownstreamAction`].
//!
//! # Flush rules
//!
//! - The last write per field wins.
//! - A write evicts pending writes from conflicting groups (by default color
//!   temperature and hue/saturation).
//! - A pending power-off, or brightness 0, turns the light off and drops
//!   every other write.
//! - Nothing is carried over between flushes.

mod action;
mod command_coalescer;
mod config;

pub use action::DownstreamAction;
pub use command_coalescer::{CommandCoalescer, Phase};
pub use config::{CoalescerConfig, DEFAULT_OFF_TRIGGERS, DEFAULT_WINDOW};
pub use crate::command::WhiteMode;
