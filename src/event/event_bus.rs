// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast bus for coalescer events.

use tokio::sync::broadcast;

use super::CoalescerEvent;

/// Default channel capacity for the event bus.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Broadcasts [`CoalescerEvent`]s to any number of subscribers.
///
/// Each subscriber gets its own copy of every event published after it
/// subscribed. A subscriber that falls more than `capacity` events behind
/// loses the oldest ones and sees `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use accessory_coalescer::command::LightCommand;
/// use accessory_coalescer::event::{CoalescerEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(CoalescerEvent::flushed(LightCommand::TurnOff, "Set state to off"));
///
/// assert_eq!(
///     rx.try_recv().unwrap().command(),
///     Some(&LightCommand::TurnOff)
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoalescerEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a new event bus buffering up to `capacity` events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. `CoalescerConfig::validate` rejects a
    /// zero capacity before a bus is built from it.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoalescerEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// Without subscribers the event is dropped.
    pub fn publish(&self, event: CoalescerEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
