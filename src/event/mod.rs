// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flush outcome events.
//!
//! The coalescer never returns downstream results to the caller of `submit`.
//! Instead every flush, action failure, and discarded batch is published on
//! an [`EventBus`] backed by tokio's broadcast channel.

mod coalescer_event;
mod event_bus;

pub use coalescer_event::CoalescerEvent;
pub use event_bus::{DEFAULT_EVENT_CAPACITY, EventBus};
