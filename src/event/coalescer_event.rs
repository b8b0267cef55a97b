// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coalescer event types.

use std::fmt;

use crate::command::LightCommand;
use crate::field::FieldSet;

/// Outcome of a flush or teardown, published on the [`EventBus`](super::EventBus).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoalescerEvent {
    /// A batch was flushed and its command is being dispatched.
    Flushed {
        /// The dispatched command.
        command: LightCommand,
        /// Summary of the changes.
        description: String,
    },

    /// The downstream action rejected or failed to apply a command.
    ///
    /// The batch is not retried.
    ActionFailed {
        /// The command that failed.
        command: LightCommand,
        /// Error message from the action.
        error: String,
    },

    /// A pending batch was dropped at teardown without being flushed.
    Discarded {
        /// Fields that were pending.
        fields: FieldSet,
    },
}

impl CoalescerEvent {
    /// Creates a flushed event.
    #[must_use]
    pub fn flushed(command: LightCommand, description: impl Into<String>) -> Self {
        Self::Flushed {
            command,
            description: description.into(),
        }
    }

    /// Creates an action failure event.
    #[must_use]
    pub fn action_failed(command: LightCommand, error: impl fmt::Display) -> Self {
        Self::ActionFailed {
            command,
            error: error.to_string(),
        }
    }

    /// Returns the command this event refers to, if any.
    #[must_use]
    pub const fn command(&self) -> Option<&LightCommand> {
        match self {
            Self::Flushed { command, .. } | Self::ActionFailed { command, .. } => Some(command),
            Self::Discarded { .. } => None,
        }
    }

    /// Returns `true` for [`CoalescerEvent::ActionFailed`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::ActionFailed { .. })
    }
}

impl fmt::Display for CoalescerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flushed { description, .. } => write!(f, "flushed: {description}"),
            Self::ActionFailed { command, error } => write!(f, "{command} failed: {error}"),
            Self::Discarded { fields } => write!(f, "discarded {fields}"),
        }
    }
}
